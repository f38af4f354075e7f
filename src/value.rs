//! The decoded value tree: atoms, typed vectors, lists, dictionaries,
//! tables, and the callable shapes (lambdas, projections, function
//! references) that the wire format can carry.

use crate::temporal::UniversalTemporal;

/// A vector's sort/uniqueness hint. Preserved but never validated: the
/// decoder trusts neither the claim nor its absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    None,
    Sorted,
    Unique,
    Parted,
    Grouped,
    /// An attribute byte outside the documented set, kept verbatim.
    Unknown(u8),
}

impl From<u8> for Attribute {
    fn from(b: u8) -> Self {
        match b {
            0 => Attribute::None,
            1 => Attribute::Sorted,
            2 => Attribute::Unique,
            3 => Attribute::Parted,
            4 => Attribute::Grouped,
            other => Attribute::Unknown(other),
        }
    }
}

/// A single q scalar, tagged by its wire type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Atom {
    Boolean(bool),
    Guid([u8; 16]),
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Real(f32),
    Float(f64),
    Char(u8),
    Symbol(String),
    Timestamp(i64),
    Month(i32),
    Date(i32),
    Datetime(f64),
    Timespan(i64),
    Minute(i32),
    Second(i32),
    Time(i32),
}

impl Atom {
    /// The q type code this atom was decoded from, expressed as the
    /// (positive) vector code it is the atomic form of.
    pub fn qtype(&self) -> i8 {
        match self {
            Atom::Boolean(_) => 1,
            Atom::Guid(_) => 2,
            Atom::Byte(_) => 4,
            Atom::Short(_) => 5,
            Atom::Int(_) => 6,
            Atom::Long(_) => 7,
            Atom::Real(_) => 8,
            Atom::Float(_) => 9,
            Atom::Char(_) => 10,
            Atom::Symbol(_) => 11,
            Atom::Timestamp(_) => 12,
            Atom::Month(_) => 13,
            Atom::Date(_) => 14,
            Atom::Datetime(_) => 15,
            Atom::Timespan(_) => 16,
            Atom::Minute(_) => 17,
            Atom::Second(_) => 18,
            Atom::Time(_) => 19,
        }
    }

    /// Whether this atom is the q-null of its type.
    pub fn is_null(&self) -> bool {
        use crate::registry::*;
        match self {
            Atom::Short(v) => *v == NULL_I16,
            Atom::Int(v) | Atom::Month(v) | Atom::Date(v) | Atom::Minute(v) | Atom::Second(v)
            | Atom::Time(v) => *v == NULL_I32,
            Atom::Long(v) | Atom::Timestamp(v) | Atom::Timespan(v) => *v == NULL_I64,
            Atom::Real(v) => is_null_f32(*v),
            Atom::Float(v) | Atom::Datetime(v) => is_null_f64(*v),
            Atom::Char(v) => *v == NULL_CHAR,
            Atom::Symbol(v) => v.is_empty(),
            Atom::Guid(v) => v.iter().all(|b| *b == 0),
            Atom::Boolean(_) | Atom::Byte(_) => false,
        }
    }
}

/// A homogeneous run of elements, tagged by its wire type. Char and byte
/// vectors are kept as raw bytes; a char vector is q's string type, so
/// [`Vector::Char`] carries a dedicated accessor in downstream code rather
/// than forcing premature UTF-8 validation here (q source text is not
/// guaranteed to be valid UTF-8 byte-for-byte, only ASCII-compatible).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Vector {
    Boolean(Vec<bool>),
    Guid(Vec<[u8; 16]>),
    Byte(Vec<u8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Real(Vec<f32>),
    Float(Vec<f64>),
    Char(Vec<u8>),
    Symbol(Vec<String>),
    Timestamp(Vec<i64>),
    Month(Vec<i32>),
    Date(Vec<i32>),
    Datetime(Vec<f64>),
    Timespan(Vec<i64>),
    Minute(Vec<i32>),
    Second(Vec<i32>),
    Time(Vec<i32>),
}

impl Vector {
    pub fn qtype(&self) -> i8 {
        match self {
            Vector::Boolean(_) => 1,
            Vector::Guid(_) => 2,
            Vector::Byte(_) => 4,
            Vector::Short(_) => 5,
            Vector::Int(_) => 6,
            Vector::Long(_) => 7,
            Vector::Real(_) => 8,
            Vector::Float(_) => 9,
            Vector::Char(_) => 10,
            Vector::Symbol(_) => 11,
            Vector::Timestamp(_) => 12,
            Vector::Month(_) => 13,
            Vector::Date(_) => 14,
            Vector::Datetime(_) => 15,
            Vector::Timespan(_) => 16,
            Vector::Minute(_) => 17,
            Vector::Second(_) => 18,
            Vector::Time(_) => 19,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Vector::Boolean(v) => v.len(),
            Vector::Guid(v) => v.len(),
            Vector::Byte(v) => v.len(),
            Vector::Short(v) => v.len(),
            Vector::Int(v) => v.len(),
            Vector::Long(v) => v.len(),
            Vector::Real(v) => v.len(),
            Vector::Float(v) => v.len(),
            Vector::Char(v) => v.len(),
            Vector::Symbol(v) => v.len(),
            Vector::Timestamp(v) => v.len(),
            Vector::Month(v) => v.len(),
            Vector::Date(v) => v.len(),
            Vector::Datetime(v) => v.len(),
            Vector::Timespan(v) => v.len(),
            Vector::Minute(v) => v.len(),
            Vector::Second(v) => v.len(),
            Vector::Time(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A char vector read as a lossy UTF-8 string, q's usual string type.
    pub fn as_char_str(&self) -> Option<String> {
        match self {
            Vector::Char(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
    }
}

/// A compiled q function body: its definition namespace and source text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lambda {
    pub namespace: String,
    pub body: String,
}

/// A reference to a q built-in, identified by its opcode. The opcode is
/// preserved verbatim; no attempt is made to resolve it to a name, since
/// the set of builtins is open-ended and version-dependent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FunctionRef {
    Unary(u8),
    Operator(u8),
    Ternary(u8),
}

/// An adverb (each, over, scan, prior, each-right, each-left) applied to
/// a single bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdverbKind {
    Each,
    Over,
    Scan,
    Prior,
    EachRight,
    EachLeft,
}

/// The full decoded value tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Atom(Atom),
    Vector {
        attribute: Attribute,
        data: Vector,
    },
    /// A temporal atom converted to its universal (calendar) form; only
    /// produced when a read is performed with universal temporal mode
    /// enabled. Raw-mode temporal atoms are plain [`Value::Atom`]s.
    Temporal(UniversalTemporal),
    /// A temporal vector converted to its universal form, one entry per
    /// element; see [`Value::Temporal`].
    TemporalVector {
        attribute: Attribute,
        qtype: i8,
        data: Vec<UniversalTemporal>,
    },
    List(Vec<Value>),
    Dict {
        keys: Box<Value>,
        values: Box<Value>,
    },
    /// `columns[i]` names `data[i]`; every entry in `data` has equal length.
    Table {
        columns: Vec<String>,
        data: Vec<Value>,
    },
    /// A dictionary whose key and value sides are both tables.
    KeyedTable {
        keys: Box<Value>,
        values: Box<Value>,
    },
    Lambda(Lambda),
    FunctionRef(FunctionRef),
    Projection(Vec<Value>),
    Composition(Vec<Value>),
    Adverb {
        kind: AdverbKind,
        value: Box<Value>,
    },
    /// The generic null `::`, also used as the unbound-slot placeholder
    /// inside a projection.
    Null,
}

impl Value {
    /// Convenience constructor for a table built from parallel column
    /// name/value lists, used by the table and keyed-table decode paths.
    pub(crate) fn table(columns: Vec<String>, data: Vec<Value>) -> Self {
        Value::Table { columns, data }
    }
}
