//! Bit-range extraction for sub-byte header fields.
//!
//! Bits are numbered in network order: bit 0 is the most significant bit of
//! byte 0. Extracted values are right-aligned into the smallest whole number of
//! bytes, so the result reads directly as a big-endian unsigned integer.

/// Extract the half-open bit range `[start, end)` from `buf`.
///
/// Returns `ceil((end - start) / 8)` bytes. Bits past the end of `buf` are
/// never read; `end` is clamped to the buffer's bit length. An empty or
/// inverted range yields an empty vector.
///
/// # Examples
/// ```
/// use framescope_core::bits::extract;
///
/// assert_eq!(extract(&[0x45], 0, 4), vec![0x04]);
/// assert_eq!(extract(&[0x45], 4, 8), vec![0x05]);
/// ```
pub fn extract(buf: &[u8], start: usize, end: usize) -> Vec<u8> {
    let end = end.min(buf.len() * 8);
    if start >= end {
        return Vec::new();
    }

    let width = end - start;
    let mut out = vec![0u8; width.div_ceil(8)];
    let pad = out.len() * 8 - width;
    for i in 0..width {
        let src = start + i;
        if (buf[src / 8] >> (7 - src % 8)) & 1 == 1 {
            let dst = pad + i;
            out[dst / 8] |= 0x80 >> (dst % 8);
        }
    }
    out
}

/// Fold big-endian bytes into an integer. Only the trailing eight bytes
/// contribute.
pub fn to_u64(bytes: &[u8]) -> u64 {
    let tail = &bytes[bytes.len().saturating_sub(8)..];
    tail.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

/// Extract a bit range and read it as an unsigned integer.
pub fn extract_uint(buf: &[u8], start: usize, end: usize) -> u64 {
    to_u64(&extract(buf, start, end))
}
