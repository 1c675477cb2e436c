//! Frame difference
//!
//! Compares the current frame against the previous one and lists the
//! rectangles a panel transport has to resend. Spans are kept in a flat,
//! preallocated array and chained in row order through `next` indices so the
//! merger can splice them out without moving anything.

use crate::buffer::PixelBuffer;
use crate::compare::{self, WORD_PIXELS};
use crate::error::DiffError;
use crate::merge::merge;

/// Default span budget
pub const MAX_SPANS: usize = 10000;
/// Unchanged pixels an exact span may bridge before closing
pub const SPAN_EXACT_THRESHOLD: usize = 8;
/// Default merge waste threshold in pixels
pub const MERGE_THRESHOLD: u32 = 16;

/// `[left,right) x [top,bottom)`
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq,Hash)]
pub struct Rect {
    pub left: u16,
    pub right: u16,
    pub top: u16,
    pub bottom: u16,
}

impl Rect {
    pub fn new(left: u16, right: u16, top: u16, bottom: u16) -> Self {
        Rect { left, right, top, bottom }
    }
    pub fn width(&self) -> u32 {
        u32::from(self.right.saturating_sub(self.left))
    }
    pub fn height(&self) -> u32 {
        u32::from(self.bottom.saturating_sub(self.top))
    }
    pub fn area(&self) -> u32 {
        self.width() * self.height()
    }
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }
    pub fn union(&self, other: &Rect) -> Rect {
        Rect { left: self.left.min(other.left),
               right: self.right.max(other.right),
               top: self.top.min(other.top),
               bottom: self.bottom.max(other.bottom) }
    }
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// A dirty region: a rectangle whose last row may stop at `last_scan_right`
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct DiffSpan {
    pub rect: Rect,
    /// End (exclusive) of the final row, `bottom - 1`
    pub last_scan_right: u16,
    /// Exact pixel count of the region
    pub size: u32,
    pub(crate) next: Option<u32>,
}

impl DiffSpan {
    /// Full rectangle
    pub fn new(rect: Rect) -> Self {
        Self::with_last_scan(rect, rect.right)
    }
    /// Single row from `left` to `right`
    pub fn row(y: u16, left: u16, right: u16) -> Self {
        Self::new(Rect::new(left, right, y, y + 1))
    }
    pub fn with_last_scan(rect: Rect, last_scan_right: u16) -> Self {
        DiffSpan { rect, last_scan_right,
                   size: Self::exact_size(&rect, last_scan_right),
                   next: None }
    }
    /// Pixels in `rect` when its last row ends at `last_scan_right`
    pub fn exact_size(rect: &Rect, last_scan_right: u16) -> u32 {
        if rect.is_empty() {
            return 0;
        }
        rect.width() * (rect.height() - 1)
            + u32::from(last_scan_right.saturating_sub(rect.left))
    }
    pub fn left(&self) -> u16 { self.rect.left }
    pub fn right(&self) -> u16 { self.rect.right }
    pub fn top(&self) -> u16 { self.rect.top }
    pub fn bottom(&self) -> u16 { self.rect.bottom }
    /// Index of the following span in its [`SpanList`]
    pub fn next(&self) -> Option<u32> {
        self.next
    }
    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.rect.contains(x, y)
            && (y + 1 < self.rect.bottom || x < self.last_scan_right)
    }
    /// Row segments `(y, x0, x1)` covered by the span, top to bottom
    ///
    ///     use panel_raster::{DiffSpan, Rect};
    ///     let s = DiffSpan::with_last_scan(Rect::new(2, 6, 0, 2), 4);
    ///     let rows: Vec<_> = s.rows().collect();
    ///     assert_eq!(rows, vec![(0, 2, 6), (1, 2, 4)]);
    ///     assert_eq!(s.size, 6);
    ///
    pub fn rows(&self) -> impl Iterator<Item = (u16, u16, u16)> {
        let r = self.rect;
        let last = self.last_scan_right;
        (r.top .. r.bottom).map(move |y| {
            let right = if y + 1 == r.bottom { last } else { r.right };
            (y, r.left, right)
        })
    }
}

/// Row ordered, singly linked list of spans over a preallocated array
#[derive(Debug,Clone)]
pub struct SpanList {
    pub(crate) spans: Vec<DiffSpan>,
    pub(crate) head: Option<u32>,
    pub(crate) tail: Option<u32>,
    pub(crate) count: usize,
    max_spans: usize,
    truncated: bool,
}

impl Default for SpanList {
    fn default() -> Self {
        Self::with_capacity(MAX_SPANS)
    }
}

impl SpanList {
    pub fn with_capacity(max_spans: usize) -> Self {
        SpanList { spans: Vec::with_capacity(max_spans),
                   head: None, tail: None, count: 0,
                   max_spans, truncated: false }
    }
    /// Invalidate every span; storage is kept
    pub fn clear(&mut self) {
        self.spans.clear();
        self.head = None;
        self.tail = None;
        self.count = 0;
        self.truncated = false;
    }
    /// Number of linked spans
    pub fn len(&self) -> usize {
        self.count
    }
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
    pub fn capacity(&self) -> usize {
        self.max_spans
    }
    /// A span did not fit and was dropped
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
    pub(crate) fn set_truncated(&mut self) {
        self.truncated = true;
    }
    pub fn head(&self) -> Option<u32> {
        self.head
    }
    pub fn get(&self, idx: u32) -> Option<&DiffSpan> {
        self.spans.get(idx as usize)
    }
    /// Append a span; returns false and marks the list truncated when full
    pub fn push(&mut self, span: DiffSpan) -> bool {
        if self.spans.len() >= self.max_spans {
            self.truncated = true;
            return false;
        }
        debug_assert!(self.tail.map_or(true, |t| self.spans[t as usize].rect.top <= span.rect.top));
        let idx = self.spans.len() as u32;
        self.spans.push(DiffSpan { next: None, ..span });
        match self.tail {
            Some(t) => self.spans[t as usize].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.count += 1;
        true
    }
    /// Spans in list order
    pub fn iter(&self) -> SpanIter<'_> {
        SpanIter { list: self, cur: self.head }
    }
    /// Total pixels to resend
    pub fn pixels(&self) -> u64 {
        self.iter().map(|s| u64::from(s.size)).sum()
    }
    pub fn to_vec(&self) -> Vec<DiffSpan> {
        self.iter().copied().collect()
    }
}

pub struct SpanIter<'a> {
    list: &'a SpanList,
    cur: Option<u32>,
}

impl<'a> Iterator for SpanIter<'a> {
    type Item = &'a DiffSpan;
    fn next(&mut self) -> Option<&'a DiffSpan> {
        let span = self.list.spans.get(self.cur? as usize)?;
        self.cur = span.next;
        Some(span)
    }
}

impl<'a> IntoIterator for &'a SpanList {
    type Item = &'a DiffSpan;
    type IntoIter = SpanIter<'a>;
    fn into_iter(self) -> SpanIter<'a> {
        self.iter()
    }
}

#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum DiffMode {
    /// One bounding box around every change
    Single,
    /// Word granular runs per row
    Coarse,
    /// Pixel exact runs per row, bridging short unchanged gaps
    Exact,
}
impl Default for DiffMode {
    fn default() -> DiffMode {
        DiffMode::Exact
    }
}

/// What a diff does when the span budget runs out
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum OverflowPolicy {
    /// Replace the list with a single full frame span
    FullFrame,
    /// Keep the spans that fit; later changes are missed for this frame
    Truncate,
}
impl Default for OverflowPolicy {
    fn default() -> OverflowPolicy {
        OverflowPolicy::FullFrame
    }
}

#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct DiffOptions {
    pub mode: DiffMode,
    pub max_spans: usize,
    pub exact_gap: usize,
    pub overflow: OverflowPolicy,
    pub merge_threshold: u32,
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions { mode: DiffMode::default(),
                      max_spans: MAX_SPANS,
                      exact_gap: SPAN_EXACT_THRESHOLD,
                      overflow: OverflowPolicy::default(),
                      merge_threshold: MERGE_THRESHOLD }
    }
}

impl DiffOptions {
    pub fn with_mode(mut self, mode: DiffMode) -> Self {
        self.mode = mode;
        self
    }
    /// Span budget; at least one span is always kept for a full frame update
    pub fn with_max_spans(mut self, max_spans: usize) -> Self {
        self.max_spans = max_spans.max(1);
        self
    }
    pub fn with_exact_gap(mut self, gap: usize) -> Self {
        self.exact_gap = gap;
        self
    }
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }
    pub fn with_merge_threshold(mut self, threshold: u32) -> Self {
        self.merge_threshold = threshold;
        self
    }
}

/// Summary of one diff pass
#[derive(Debug,Copy,Clone,PartialEq,Eq,Default)]
pub struct DiffReport {
    /// Spans in the list
    pub spans: usize,
    /// Pixels the spans cover
    pub pixels: u64,
    /// The span budget overflowed
    pub degraded: bool,
}

/// Diff context for one display surface
#[derive(Debug,Clone)]
pub struct DiffEngine {
    options: DiffOptions,
    list: SpanList,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new(DiffOptions::default())
    }
}

impl DiffEngine {
    pub fn new(mut options: DiffOptions) -> Self {
        options.max_spans = options.max_spans.max(1);
        DiffEngine { list: SpanList::with_capacity(options.max_spans), options }
    }
    pub fn options(&self) -> &DiffOptions {
        &self.options
    }
    pub fn set_mode(&mut self, mode: DiffMode) {
        self.options.mode = mode;
    }
    /// Spans of the last diff; valid until the next one
    pub fn spans(&self) -> &SpanList {
        &self.list
    }

    /// Find the regions of `current` that differ from `previous`
    pub fn diff(&mut self, current: &PixelBuffer, previous: &PixelBuffer)
                -> Result<DiffReport, DiffError> {
        let (w, h) = (current.width(), current.height());
        if (w, h) != (previous.width(), previous.height()) {
            return Err(DiffError::SizeMismatch {
                current: (w, h),
                previous: (previous.width(), previous.height()),
            });
        }
        if w > usize::from(u16::MAX) || h > usize::from(u16::MAX) {
            return Err(DiffError::TooLarge { width: w, height: h });
        }
        self.list.clear();
        if w == 0 || h == 0 {
            return Ok(self.report());
        }
        let (cur, prev) = (current.as_slice(), previous.as_slice());
        match self.options.mode {
            DiffMode::Single => diff_single(cur, prev, w, h, &mut self.list),
            DiffMode::Coarse => diff_coarse(cur, prev, w, h, &mut self.list),
            DiffMode::Exact  => diff_exact(cur, prev, w, h, self.options.exact_gap, &mut self.list),
        }
        if self.list.is_truncated() {
            log::warn!("diff exceeded {} spans, {:?} update", self.list.capacity(), self.options.overflow);
            if self.options.overflow == OverflowPolicy::FullFrame {
                self.list.clear();
                self.list.push(DiffSpan::new(Rect::new(0, w as u16, 0, h as u16)));
                self.list.set_truncated();
            }
        }
        let report = self.report();
        log::debug!("DIFF {:?}: {} spans, {} pixels", self.options.mode, report.spans, report.pixels);
        Ok(report)
    }

    /// Diff, then merge with the configured waste threshold
    pub fn diff_and_merge(&mut self, current: &PixelBuffer, previous: &PixelBuffer)
                          -> Result<DiffReport, DiffError> {
        self.diff(current, previous)?;
        let removed = merge(&mut self.list, self.options.merge_threshold);
        log::debug!("MERGE: removed {} spans", removed);
        Ok(self.report())
    }

    fn report(&self) -> DiffReport {
        DiffReport { spans: self.list.len(),
                     pixels: self.list.pixels(),
                     degraded: self.list.is_truncated() }
    }
}

/// One bounding rectangle around every changed pixel
pub fn diff_single(cur: &[u16], prev: &[u16], w: usize, h: usize, list: &mut SpanList) {
    let n = (w * h).min(cur.len()).min(prev.len());
    let (cur, prev) = (&cur[..n], &prev[..n]);
    let first = match compare::find_first_diff(cur, prev)
        .and_then(|i| compare::first_diff_pixel(cur, prev, i)) {
        Some(i) => i,
        None => return,
    };
    let last = match compare::find_last_diff(cur, prev)
        .and_then(|i| compare::last_diff_pixel(cur, prev, i)) {
        Some(i) => i,
        None => return,
    };
    let (min_y, max_y) = (first / w, last / w);
    let mut left = first % w;
    let mut right = last % w + 1;
    // narrow the columns only where the current bounds are not yet known
    for y in min_y ..= max_y {
        let row = y * w;
        let (a, b) = (&cur[row .. row + w], &prev[row .. row + w]);
        if let Some(x) = compare::first_diff_pixel(&a[..left], &b[..left], 0) {
            left = x;
        }
        if let Some(x) = compare::last_diff_pixel(&a[right..], &b[right..], w - right) {
            right += x + 1;
        }
    }
    list.push(DiffSpan::new(Rect::new(left as u16, right as u16,
                                      min_y as u16, (max_y + 1) as u16)));
}

/// Whole rows of `w` pixels available in both buffers, at most `h`
fn full_rows(cur: &[u16], prev: &[u16], w: usize, h: usize) -> usize {
    if w == 0 {
        return 0;
    }
    h.min(cur.len().min(prev.len()) / w)
}

/// Runs of mismatching 4-pixel words, trimmed to the differing pixels at
/// each end
///
/// Rows past the end of either buffer are ignored.
pub fn diff_coarse(cur: &[u16], prev: &[u16], w: usize, h: usize, list: &mut SpanList) {
    for y in 0 .. full_rows(cur, prev, w, h) {
        let row = y * w;
        let (a, b) = (&cur[row .. row + w], &prev[row .. row + w]);
        let mut run: Option<(usize, usize)> = None;
        for (i, (x, z)) in compare::words(a, b).enumerate() {
            let xor = x ^ z;
            let base = i * WORD_PIXELS;
            if xor != 0 {
                let end = base + compare::last_pixel(xor) + 1;
                run = Some(match run {
                    Some((start, _)) => (start, end),
                    None => (base + compare::first_pixel(xor), end),
                });
            } else if let Some((start, end)) = run.take() {
                if !list.push(DiffSpan::row(y as u16, start as u16, end as u16)) {
                    return;
                }
            }
        }
        if let Some((start, end)) = run {
            if !list.push(DiffSpan::row(y as u16, start as u16, end as u16)) {
                return;
            }
        }
    }
}

/// Pixel exact runs; a run survives up to `gap` unchanged pixels
///
/// Rows past the end of either buffer are ignored.
pub fn diff_exact(cur: &[u16], prev: &[u16], w: usize, h: usize, gap: usize,
                  list: &mut SpanList) {
    for y in 0 .. full_rows(cur, prev, w, h) {
        let row = y * w;
        let (a, b) = (&cur[row .. row + w], &prev[row .. row + w]);
        let mut x = 0;
        while x < w {
            // skip unchanged pairs
            while x + 2 <= w && compare::pack2(&a[x .. x + 2]) == compare::pack2(&b[x .. x + 2]) {
                x += 2;
            }
            if x >= w {
                break;
            }
            let start = if a[x] != b[x] {
                x
            } else if x + 1 < w && a[x + 1] != b[x + 1] {
                x + 1
            } else {
                x += 1;
                continue;
            };
            let mut last = start;
            let mut unchanged = 0;
            x = start + 1;
            while x < w {
                if a[x] != b[x] {
                    last = x;
                    unchanged = 0;
                } else {
                    unchanged += 1;
                    if unchanged > gap {
                        break;
                    }
                }
                x += 1;
            }
            if !list.push(DiffSpan::row(y as u16, start as u16, (last + 1) as u16)) {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_links_in_push_order() {
        let mut l = SpanList::with_capacity(2);
        assert!(l.push(DiffSpan::row(0, 0, 4)));
        assert!(l.push(DiffSpan::row(1, 2, 3)));
        assert!(!l.push(DiffSpan::row(2, 0, 1)));
        assert!(l.is_truncated());
        let tops: Vec<_> = l.iter().map(|s| s.top()).collect();
        assert_eq!(tops, vec![0, 1]);
        assert_eq!(l.pixels(), 5);
        l.clear();
        assert!(l.is_empty());
        assert!(!l.is_truncated());
        assert_eq!(l.iter().count(), 0);
    }

    #[test]
    fn partial_last_row() {
        let s = DiffSpan::with_last_scan(Rect::new(0, 10, 3, 6), 4);
        assert_eq!(s.size, 24);
        assert!(s.contains(9, 4));
        assert!(s.contains(3, 5));
        assert!(!s.contains(4, 5));
    }

    #[test]
    fn exact_bridges_short_gaps() {
        let w = 40;
        let prev = vec![0u16; w];
        let mut cur = prev.clone();
        cur[2] = 1;
        cur[11] = 1; // 8 unchanged between
        cur[21] = 1; // 9 unchanged between
        let mut list = SpanList::with_capacity(8);
        diff_exact(&cur, &prev, w, 1, SPAN_EXACT_THRESHOLD, &mut list);
        let spans: Vec<_> = list.iter().map(|s| (s.left(), s.right())).collect();
        assert_eq!(spans, vec![(2, 12), (21, 22)]);
    }

    #[test]
    fn coarse_trims_word_edges() {
        let w = 20;
        let prev = vec![0u16; w];
        let mut cur = prev.clone();
        cur[5] = 1;
        cur[9] = 1;
        cur[18] = 1;
        let mut list = SpanList::with_capacity(8);
        diff_coarse(&cur, &prev, w, 1, &mut list);
        let spans: Vec<_> = list.iter().map(|s| (s.left(), s.right())).collect();
        assert_eq!(spans, vec![(5, 10), (18, 19)]);
    }

    #[test]
    fn short_buffers_stop_at_last_full_row() {
        let w = 8;
        let prev = vec![0u16; w * 2 + 3];
        let mut cur = prev.clone();
        cur[w + 2] = 1;
        cur[2 * w + 1] = 1;
        let mut list = SpanList::with_capacity(8);
        diff_coarse(&cur, &prev, w, 4, &mut list);
        let rows: Vec<_> = list.iter().map(|s| (s.top(), s.left(), s.right())).collect();
        assert_eq!(rows, vec![(1, 2, 3)]);
        list.clear();
        diff_exact(&cur, &prev, w, 4, SPAN_EXACT_THRESHOLD, &mut list);
        let rows: Vec<_> = list.iter().map(|s| (s.top(), s.left(), s.right())).collect();
        assert_eq!(rows, vec![(1, 2, 3)]);
        list.clear();
        diff_exact(&cur, &prev, 0, 4, SPAN_EXACT_THRESHOLD, &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn single_narrows_columns() {
        let (w, h) = (8, 6);
        let prev = vec![0u16; w * h];
        let mut cur = prev.clone();
        cur[1 * w + 5] = 1;
        cur[2 * w + 1] = 1;
        cur[4 * w + 6] = 1;
        cur[4 * w + 3] = 1;
        let mut list = SpanList::with_capacity(1);
        diff_single(&cur, &prev, w, h, &mut list);
        let s = list.iter().next().unwrap();
        assert_eq!(s.rect, Rect::new(1, 7, 1, 5));
        assert_eq!(list.len(), 1);
    }
}
