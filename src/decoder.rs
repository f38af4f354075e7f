//! Recursive value decoding: dispatches on a type code and reconstructs
//! atoms, vectors, lists, dictionaries, tables, keyed tables, and the
//! callable shapes the wire format can carry.

use crate::error::DecodeErrorInt;
use crate::reader::Cursor;
use crate::registry::is_temporal;
use crate::temporal::{
    date_to_universal, datetime_to_universal, minute_to_universal, month_to_universal,
    second_to_universal, time_to_universal, timespan_to_universal, timestamp_to_universal,
    UniversalTemporal,
};
use crate::value::{AdverbKind, Atom, Attribute, FunctionRef, Lambda, Value, Vector};

/// Options governing a single `read`/`read_data` call.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Skip value decoding and return the frame body as raw bytes.
    pub raw: bool,
    /// Convert temporal atoms/vectors to their universal (calendar) form
    /// rather than leaving them as raw q-epoch integers. Named to match
    /// the convention this format's client libraries commonly use for
    /// the same switch.
    pub numpy_temporals: bool,
    /// Read exactly one frame. Always `true` for [`crate::read`]; present
    /// so embedders composing their own read loop can express intent.
    pub single: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            raw: false,
            numpy_temporals: false,
            single: true,
        }
    }
}

pub(crate) fn decode_value(cur: &mut Cursor, opts: &ReadOptions) -> Result<Value, DecodeErrorInt> {
    let t = cur.i8()?;
    match t {
        -128 => {
            let msg = cur.cstr()?;
            Err(DecodeErrorInt::QException(msg))
        }
        t if t < 0 => decode_atom(cur, -t, opts),
        0 => decode_general_list(cur, opts),
        1..=19 => decode_vector(cur, t, opts),
        98 => decode_table(cur, opts),
        99 => decode_dict(cur, opts),
        100 => decode_lambda(cur, opts),
        101 => decode_unary(cur),
        102 => Ok(Value::FunctionRef(FunctionRef::Operator(cur.u8()?))),
        103 => Ok(Value::FunctionRef(FunctionRef::Ternary(cur.u8()?))),
        104 => decode_grouped(cur, opts, Value::Projection as fn(Vec<Value>) -> Value),
        105 => decode_grouped(cur, opts, Value::Composition as fn(Vec<Value>) -> Value),
        106..=111 => decode_adverb(cur, t, opts),
        other => Err(DecodeErrorInt::UnsupportedTypeCode(other)),
    }
}

/// Reads a wire element count and checks it against the bytes actually left
/// in the frame before the caller allocates anything sized by it.
/// `min_element_bytes` is the fewest bytes each of the `n` elements can
/// possibly occupy (the fixed width for fixed-width vectors, 1 for a
/// general list/projection item or a NUL-terminated symbol), so a tiny
/// frame claiming billions of elements fails as *truncated payload* instead
/// of driving a multi-gigabyte allocation.
fn read_count(cur: &mut Cursor, min_element_bytes: usize) -> Result<usize, DecodeErrorInt> {
    let n = cur.i32()?;
    if n < 0 {
        return Err(DecodeErrorInt::MalformedHeader(format!(
            "negative element count {}",
            n
        )));
    }
    let n = n as usize;
    let remaining = cur.remaining();
    let needed = n.checked_mul(min_element_bytes).filter(|&needed| needed <= remaining);
    if needed.is_none() {
        return Err(DecodeErrorInt::TruncatedPayload {
            expected: n.saturating_mul(min_element_bytes),
            available: remaining,
        });
    }
    Ok(n)
}

fn decode_atom(cur: &mut Cursor, qtype: i8, opts: &ReadOptions) -> Result<Value, DecodeErrorInt> {
    if opts.numpy_temporals && is_temporal(qtype) {
        return Ok(Value::Temporal(decode_temporal_scalar(cur, qtype)?));
    }
    Ok(Value::Atom(decode_raw_atom(cur, qtype)?))
}

fn decode_raw_atom(cur: &mut Cursor, qtype: i8) -> Result<Atom, DecodeErrorInt> {
    Ok(match qtype {
        1 => Atom::Boolean(cur.u8()? != 0),
        2 => Atom::Guid(cur.guid()?),
        4 => Atom::Byte(cur.u8()?),
        5 => Atom::Short(cur.i16()?),
        6 => Atom::Int(cur.i32()?),
        7 => Atom::Long(cur.i64()?),
        8 => Atom::Real(cur.f32()?),
        9 => Atom::Float(cur.f64()?),
        10 => Atom::Char(cur.u8()?),
        11 => Atom::Symbol(cur.cstr()?),
        12 => Atom::Timestamp(cur.i64()?),
        13 => Atom::Month(cur.i32()?),
        14 => Atom::Date(cur.i32()?),
        15 => Atom::Datetime(cur.f64()?),
        16 => Atom::Timespan(cur.i64()?),
        17 => Atom::Minute(cur.i32()?),
        18 => Atom::Second(cur.i32()?),
        19 => Atom::Time(cur.i32()?),
        other => return Err(DecodeErrorInt::UnsupportedTypeCode(-other)),
    })
}

fn decode_temporal_scalar(
    cur: &mut Cursor,
    qtype: i8,
) -> Result<UniversalTemporal, DecodeErrorInt> {
    Ok(match qtype {
        12 => UniversalTemporal::Timestamp(timestamp_to_universal(cur.i64()?)),
        13 => UniversalTemporal::Month(month_to_universal(cur.i32()?)),
        14 => UniversalTemporal::Date(date_to_universal(cur.i32()?)),
        15 => UniversalTemporal::Datetime(datetime_to_universal(cur.f64()?)),
        16 => UniversalTemporal::Timespan(timespan_to_universal(cur.i64()?)),
        17 => UniversalTemporal::Minute(minute_to_universal(cur.i32()?)),
        18 => UniversalTemporal::Second(second_to_universal(cur.i32()?)),
        19 => UniversalTemporal::Time(time_to_universal(cur.i32()?)),
        other => return Err(DecodeErrorInt::UnsupportedTypeCode(-other)),
    })
}

fn decode_vector(cur: &mut Cursor, t: i8, opts: &ReadOptions) -> Result<Value, DecodeErrorInt> {
    let attribute = Attribute::from(cur.u8()?);
    // Symbols are variable-width; each still costs at least one byte (its
    // NUL terminator), so `unwrap_or(1)` is a safe lower bound for them too.
    let min_element_bytes = crate::registry::element_width(t).unwrap_or(1);
    let n = read_count(cur, min_element_bytes)?;

    if opts.numpy_temporals && is_temporal(t) {
        let mut data = Vec::with_capacity(n);
        for _ in 0..n {
            data.push(decode_temporal_scalar(cur, t)?);
        }
        return Ok(Value::TemporalVector {
            attribute,
            qtype: t,
            data,
        });
    }

    let data = decode_vector_data(cur, t, n)?;
    Ok(Value::Vector { attribute, data })
}

fn decode_vector_data(cur: &mut Cursor, t: i8, n: usize) -> Result<Vector, DecodeErrorInt> {
    Ok(match t {
        1 => Vector::Boolean(
            (0..n)
                .map(|_| cur.u8().map(|b| b != 0))
                .collect::<Result<_, _>>()?,
        ),
        2 => Vector::Guid((0..n).map(|_| cur.guid()).collect::<Result<_, _>>()?),
        4 => Vector::Byte(cur.bytes(n)?),
        5 => Vector::Short((0..n).map(|_| cur.i16()).collect::<Result<_, _>>()?),
        6 => Vector::Int((0..n).map(|_| cur.i32()).collect::<Result<_, _>>()?),
        7 => Vector::Long((0..n).map(|_| cur.i64()).collect::<Result<_, _>>()?),
        8 => Vector::Real((0..n).map(|_| cur.f32()).collect::<Result<_, _>>()?),
        9 => Vector::Float((0..n).map(|_| cur.f64()).collect::<Result<_, _>>()?),
        10 => Vector::Char(cur.bytes(n)?),
        11 => Vector::Symbol((0..n).map(|_| cur.cstr()).collect::<Result<_, _>>()?),
        12 => Vector::Timestamp((0..n).map(|_| cur.i64()).collect::<Result<_, _>>()?),
        13 => Vector::Month((0..n).map(|_| cur.i32()).collect::<Result<_, _>>()?),
        14 => Vector::Date((0..n).map(|_| cur.i32()).collect::<Result<_, _>>()?),
        15 => Vector::Datetime((0..n).map(|_| cur.f64()).collect::<Result<_, _>>()?),
        16 => Vector::Timespan((0..n).map(|_| cur.i64()).collect::<Result<_, _>>()?),
        17 => Vector::Minute((0..n).map(|_| cur.i32()).collect::<Result<_, _>>()?),
        18 => Vector::Second((0..n).map(|_| cur.i32()).collect::<Result<_, _>>()?),
        19 => Vector::Time((0..n).map(|_| cur.i32()).collect::<Result<_, _>>()?),
        other => return Err(DecodeErrorInt::UnsupportedTypeCode(other)),
    })
}

fn decode_general_list(cur: &mut Cursor, opts: &ReadOptions) -> Result<Value, DecodeErrorInt> {
    let _attribute = cur.u8()?;
    // Every list item is at least a one-byte type code.
    let n = read_count(cur, 1)?;
    let mut items = Vec::with_capacity(n);
    for _ in 0..n {
        items.push(decode_value(cur, opts)?);
    }
    Ok(Value::List(items))
}

fn decode_table(cur: &mut Cursor, opts: &ReadOptions) -> Result<Value, DecodeErrorInt> {
    let _reserved = cur.u8()?;
    let dict = decode_value(cur, opts)?;
    table_from_dict(dict)
}

fn table_from_dict(dict: Value) -> Result<Value, DecodeErrorInt> {
    match dict {
        Value::Dict { keys, values } => {
            let columns = symbol_names(*keys)?;
            let data = match *values {
                Value::List(items) => items,
                other => vec![other],
            };
            if columns.len() != data.len() {
                return Err(DecodeErrorInt::MalformedHeader(format!(
                    "table has {} column name(s) but {} column(s)",
                    columns.len(),
                    data.len()
                )));
            }
            Ok(Value::table(columns, data))
        }
        other => Err(DecodeErrorInt::MalformedHeader(format!(
            "table body is not a dictionary: {:?}",
            other
        ))),
    }
}

fn symbol_names(v: Value) -> Result<Vec<String>, DecodeErrorInt> {
    match v {
        Value::Vector {
            data: Vector::Symbol(names),
            ..
        } => Ok(names),
        other => Err(DecodeErrorInt::MalformedHeader(format!(
            "table column names are not a symbol vector: {:?}",
            other
        ))),
    }
}

fn decode_dict(cur: &mut Cursor, opts: &ReadOptions) -> Result<Value, DecodeErrorInt> {
    let keys = decode_value(cur, opts)?;
    let values = decode_value(cur, opts)?;
    if matches!(keys, Value::Table { .. }) && matches!(values, Value::Table { .. }) {
        Ok(Value::KeyedTable {
            keys: Box::new(keys),
            values: Box::new(values),
        })
    } else {
        Ok(Value::Dict {
            keys: Box::new(keys),
            values: Box::new(values),
        })
    }
}

fn decode_lambda(cur: &mut Cursor, opts: &ReadOptions) -> Result<Value, DecodeErrorInt> {
    let namespace = cur.cstr()?;
    let body_value = decode_value(cur, opts)?;
    let body = match body_value {
        Value::Vector {
            data: Vector::Char(bytes),
            ..
        } => String::from_utf8_lossy(&bytes).into_owned(),
        other => {
            return Err(DecodeErrorInt::MalformedHeader(format!(
                "lambda body is not a char vector: {:?}",
                other
            )))
        }
    };
    Ok(Value::Lambda(Lambda { namespace, body }))
}

fn decode_unary(cur: &mut Cursor) -> Result<Value, DecodeErrorInt> {
    let opcode = cur.u8()?;
    if opcode == 0 {
        Ok(Value::Null)
    } else {
        Ok(Value::FunctionRef(FunctionRef::Unary(opcode)))
    }
}

fn decode_grouped(
    cur: &mut Cursor,
    opts: &ReadOptions,
    build: fn(Vec<Value>) -> Value,
) -> Result<Value, DecodeErrorInt> {
    // Every bound value is at least a one-byte type code.
    let n = read_count(cur, 1)?;
    let mut items = Vec::with_capacity(n);
    for _ in 0..n {
        items.push(decode_value(cur, opts)?);
    }
    Ok(build(items))
}

fn decode_adverb(cur: &mut Cursor, t: i8, opts: &ReadOptions) -> Result<Value, DecodeErrorInt> {
    let kind = match t {
        106 => AdverbKind::Each,
        107 => AdverbKind::Over,
        108 => AdverbKind::Scan,
        109 => AdverbKind::Prior,
        110 => AdverbKind::EachRight,
        111 => AdverbKind::EachLeft,
        _ => unreachable!("decode_adverb called with non-adverb type code"),
    };
    let value = Box::new(decode_value(cur, opts)?);
    Ok(Value::Adverb { kind, value })
}
