//! Expander for the q IPC compressed-body format: a byte-literal /
//! back-reference scheme with a one-byte control word covering every
//! eight operations, and a 256-entry hash table of recent output
//! positions keyed by a cheap hash of adjacent output bytes.

use bitvec::prelude::*;

use crate::error::DecodeErrorInt;

fn next_byte(src: &[u8], d: &mut usize) -> Result<u8, DecodeErrorInt> {
    let b = *src.get(*d).ok_or_else(|| {
        DecodeErrorInt::DecompressionError("compressed stream ended early".to_string())
    })?;
    *d += 1;
    Ok(b)
}

fn checked_get(dst: &[u8], i: usize) -> Result<u8, DecodeErrorInt> {
    dst.get(i).copied().ok_or_else(|| {
        DecodeErrorInt::DecompressionError(format!("back-reference to out-of-range offset {}", i))
    })
}

/// Control word for one run of up to eight literal-or-back-reference
/// operations. Refilled from the next input byte whenever it runs dry;
/// bits are consumed least-significant first, so a freshly loaded byte is
/// reversed before reads start, letting `pop()` yield them in wire order.
fn next_op_is_backreference(src: &[u8], d: &mut usize, bits: &mut BitVec<Lsb0, u8>) -> Result<bool, DecodeErrorInt> {
    if bits.is_empty() {
        let f = next_byte(src, d)?;
        *bits = BitVec::from_element(f);
        bits.reverse();
    }
    Ok(bits.pop().expect("just refilled"))
}

/// Decompresses `src` into exactly `out_len` bytes.
///
/// `src` holds only the compressed bytes (the 4-byte uncompressed-length
/// prefix that precedes it on the wire has already been consumed by the
/// frame reader).
pub(crate) fn decompress(src: &[u8], out_len: usize) -> Result<Vec<u8>, DecodeErrorInt> {
    let mut dst = vec![0u8; out_len];
    let mut aa = [0usize; 256];
    let mut d: usize = 0;
    let mut s: usize = 0;
    let mut p: usize = 0;
    let mut control: BitVec<Lsb0, u8> = BitVec::new();

    while s < out_len {
        if next_op_is_backreference(src, &mut d, &mut control)? {
            let idx = next_byte(src, &mut d)? as usize;
            let mut r = aa[idx];
            if s + 1 >= dst.len() {
                return Err(DecodeErrorInt::DecompressionError(
                    "back-reference copy overruns output buffer".to_string(),
                ));
            }
            dst[s] = checked_get(&dst, r)?;
            s += 1;
            r += 1;
            dst[s] = checked_get(&dst, r)?;
            s += 1;
            r += 1;

            // Hash the two mandatory bytes just written before extending
            // the run, matching the reference decompressor: the run's
            // extra bytes never feed the hash table, only the pair that
            // ends the copy once `p` catches up to it below.
            while p + 1 < s {
                let h = (dst[p] ^ dst[p + 1]) as usize;
                aa[h] = p;
                p += 1;
            }

            let n = next_byte(src, &mut d)? as usize;
            if s + n > dst.len() {
                return Err(DecodeErrorInt::DecompressionError(
                    "back-reference run overruns output buffer".to_string(),
                ));
            }
            for m in 0..n {
                dst[s + m] = checked_get(&dst, r + m)?;
            }
            s += n;
            p = s;
        } else {
            let b = next_byte(src, &mut d)?;
            dst[s] = b;
            s += 1;

            while p + 1 < s {
                let h = (dst[p] ^ dst[p + 1]) as usize;
                aa[h] = p;
                p += 1;
            }
        }
    }

    Ok(dst)
}
