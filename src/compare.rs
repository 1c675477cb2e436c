//! Word-wise buffer comparison
//!
//! Pixels are compared four at a time as one `u64`. Only the word
//! granularity matters to callers; the loops are plain iterator chains and
//! left to the auto-vectorizer.

/// Pixels per comparison word
pub const WORD_PIXELS: usize = 4;

/// Pack up to four pixels into a word, pixel `i` in bits `16*i ..`
#[inline]
pub fn pack(px: &[u16]) -> u64 {
    debug_assert!(px.len() <= WORD_PIXELS);
    px.iter().enumerate()
        .fold(0, |w, (i, &p)| w | (u64::from(p) << (16 * i)))
}

/// Pack two pixels into a `u32`
#[inline]
pub fn pack2(px: &[u16]) -> u32 {
    debug_assert!(px.len() <= 2);
    px.iter().enumerate()
        .fold(0, |w, (i, &p)| w | (u32::from(p) << (16 * i)))
}

/// First differing pixel of a non-zero word XOR
#[inline]
pub fn first_pixel(xor: u64) -> usize {
    debug_assert!(xor != 0);
    (xor.trailing_zeros() / 16) as usize
}

/// Last differing pixel of a non-zero word XOR
#[inline]
pub fn last_pixel(xor: u64) -> usize {
    debug_assert!(xor != 0);
    ((63 - xor.leading_zeros()) / 16) as usize
}

/// Word pairs of `a` and `b`; a partial last word is padded with zeros
pub fn words<'a>(a: &'a [u16], b: &'a [u16]) -> impl DoubleEndedIterator<Item = (u64, u64)> + ExactSizeIterator + 'a {
    a.chunks(WORD_PIXELS).zip(b.chunks(WORD_PIXELS))
        .map(|(x, y)| (pack(x), pack(y)))
}

/// Start of the first word where `a` and `b` differ, aligned down to
/// [`WORD_PIXELS`]
///
///     use panel_raster::compare::find_first_diff;
///     let a = [0u16; 10];
///     let mut b = a;
///     assert_eq!(find_first_diff(&a, &b), None);
///     b[6] = 1;
///     assert_eq!(find_first_diff(&a, &b), Some(4));
///
pub fn find_first_diff(a: &[u16], b: &[u16]) -> Option<usize> {
    let n = a.len().min(b.len());
    words(&a[..n], &b[..n])
        .position(|(x, y)| x != y)
        .map(|w| w * WORD_PIXELS)
}

/// End (exclusive) of the last word where `a` and `b` differ, aligned up to
/// [`WORD_PIXELS`] and clamped to the slice length
///
///     use panel_raster::compare::find_last_diff;
///     let a = [0u16; 10];
///     let mut b = a;
///     b[5] = 1;
///     assert_eq!(find_last_diff(&a, &b), Some(8));
///     b[9] = 1;
///     assert_eq!(find_last_diff(&a, &b), Some(10));
///
pub fn find_last_diff(a: &[u16], b: &[u16]) -> Option<usize> {
    let n = a.len().min(b.len());
    words(&a[..n], &b[..n])
        .rposition(|(x, y)| x != y)
        .map(|w| ((w + 1) * WORD_PIXELS).min(n))
}

/// Exact index of the first differing pixel at or after `from`
pub fn first_diff_pixel(a: &[u16], b: &[u16], from: usize) -> Option<usize> {
    let n = a.len().min(b.len());
    if from >= n {
        return None;
    }
    a[from..n].iter().zip(&b[from..n])
        .position(|(x, y)| x != y)
        .map(|p| p + from)
}

/// Exact index of the last differing pixel before `end`
pub fn last_diff_pixel(a: &[u16], b: &[u16], end: usize) -> Option<usize> {
    let end = end.min(a.len()).min(b.len());
    a[..end].iter().zip(&b[..end])
        .rposition(|(x, y)| x != y)
}
