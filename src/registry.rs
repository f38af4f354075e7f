//! Static mapping from q type codes to their wire shape.
//!
//! Every fixed-width element type is described here once: its width in
//! bytes, whether it carries q-epoch temporal semantics, and how a null of
//! that type is spelled on the wire. The value decoder consults this table
//! instead of hard-coding widths at each call site.

/// Element width, in bytes, of the fixed-width vector/atom type `t`
/// (`t` given as its positive vector code, e.g. `6` for int). Returns
/// `None` for variable-width types (symbol) and non-data type codes
/// (table, dict, lambda, ...).
pub(crate) fn element_width(t: i8) -> Option<usize> {
    match t.unsigned_abs() {
        1 => Some(1),  // boolean
        2 => Some(16), // guid
        4 => Some(1),  // byte
        5 => Some(2),  // short
        6 => Some(4),  // int
        7 => Some(8),  // long
        8 => Some(4),  // real (float32)
        9 => Some(8),  // double
        10 => Some(1), // char
        12 => Some(8), // timestamp
        13 => Some(4), // month
        14 => Some(4), // date
        15 => Some(8), // datetime (f64 day count)
        16 => Some(8), // timespan
        17 => Some(4), // minute
        18 => Some(4), // second
        19 => Some(4), // time
        _ => None,
    }
}

/// Whether `t` (positive vector code) carries q-epoch temporal semantics
/// and is therefore a candidate for [`crate::temporal`] conversion.
pub(crate) fn is_temporal(t: i8) -> bool {
    matches!(t.unsigned_abs(), 12..=19)
}

pub(crate) const NULL_I16: i16 = i16::MIN;
pub(crate) const NULL_I32: i32 = i32::MIN;
pub(crate) const NULL_I64: i64 = i64::MIN;
pub(crate) const NULL_CHAR: u8 = b' ';

pub(crate) fn is_null_f32(v: f32) -> bool {
    v.is_nan()
}

pub(crate) fn is_null_f64(v: f64) -> bool {
    v.is_nan()
}

/// Canonical q-null bit pattern for a 32-bit float, used when constructing
/// (rather than merely detecting) a null so that round-tripping preserves
/// the exact bits a q process would have sent.
pub(crate) fn null_f32_bits() -> f32 {
    f32::from_bits(0x7FC0_0000)
}

/// Canonical q-null bit pattern for a 64-bit float.
pub(crate) fn null_f64_bits() -> f64 {
    f64::from_bits(0x7FF8_0000_0000_0000)
}
