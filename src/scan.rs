//! Scanline coverage accumulator
//!
//! Holds the run-length encoded coverage of one pixel row. Coverage bytes
//! live in a buffer indexed by `x - min_x`; spans only record where their
//! run starts and how long it is.

const LAST_X: i32 = 0x7FFF_FFF0;

#[derive(Debug,Default,Copy,Clone,PartialEq,Eq)]
struct Span {
    /// Start, relative to `min_x`
    offset: u16,
    len: u16,
}

/// One run of a finished row
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct ScanSpan<'a> {
    /// First pixel of the run
    pub x: i32,
    /// Number of pixels
    pub len: usize,
    /// One coverage byte per pixel
    pub covers: &'a [u8],
}

#[derive(Debug)]
pub struct ScanLine {
    min_x: i32,
    last_x: i32,
    y: i32,
    covers: Vec<u8>,
    spans: Vec<Span>,
}

impl Default for ScanLine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanLine {
    pub fn new() -> Self {
        Self { min_x: 0, last_x: LAST_X, y: 0,
               covers: vec![], spans: vec![] }
    }
    /// Prepare for a path spanning pixels `min_x ..= max_x`
    ///
    /// The coverage buffer only grows; a narrower path reuses it.
    pub fn reset(&mut self, min_x: i32, max_x: i32) {
        let need = (max_x - min_x + 2).max(0) as usize;
        if self.covers.len() < need {
            self.covers.resize(need, 0);
        }
        self.min_x = min_x;
        self.reset_spans();
    }
    /// Forget the current row's spans, keeping all buffers
    pub fn reset_spans(&mut self) {
        self.last_x = LAST_X;
        self.spans.clear();
    }
    /// Row the buffered spans belong to
    pub fn y(&self) -> i32 {
        self.y
    }
    pub fn min_x(&self) -> i32 {
        self.min_x
    }
    pub fn num_spans(&self) -> usize {
        self.spans.len()
    }
    /// Spans are buffered for a row other than `y`
    pub fn is_ready(&self, y: i32) -> bool {
        !self.spans.is_empty() && y != self.y
    }
    pub fn add_cell(&mut self, x: i32, y: i32, cover: u8) {
        self.add_span(x, y, 1, cover);
    }
    /// Add `len` pixels of equal coverage starting at `x`
    pub fn add_span(&mut self, x: i32, y: i32, len: usize, cover: u8) {
        if len == 0 {
            return;
        }
        let off = x - self.min_x;
        debug_assert!(off >= 0 && off as usize + len <= self.covers.len(),
                      "span {}+{} outside of scanline [{}, {})", x, len,
                      self.min_x, self.min_x + self.covers.len() as i32);
        let start = off as usize;
        self.covers[start .. start + len].iter_mut().for_each(|c| *c = cover);
        self.y = y;
        match self.spans.last_mut() {
            Some(cur) if off == self.last_x + 1 => {
                cur.len += len as u16;
            }
            _ => {
                self.spans.push(Span { offset: off as u16, len: len as u16 });
            }
        }
        self.last_x = off + len as i32 - 1;
    }
    /// Spans of the buffered row in the order they were added
    pub fn spans(&self) -> impl Iterator<Item = ScanSpan<'_>> + '_ {
        let min_x = self.min_x;
        let covers = &self.covers;
        self.spans.iter().map(move |s| {
            let start = usize::from(s.offset);
            let len = usize::from(s.len);
            ScanSpan { x: min_x + i32::from(s.offset), len,
                       covers: &covers[start .. start + len] }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_runs_coalesce() {
        let mut sl = ScanLine::new();
        sl.reset(10, 30);
        sl.add_cell(12, 4, 100);
        sl.add_span(13, 4, 3, 255);
        sl.add_cell(16, 4, 50);
        sl.add_cell(20, 4, 7);
        let spans: Vec<_> = sl.spans().collect();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].x, 12);
        assert_eq!(spans[0].covers, &[100, 255, 255, 255, 50]);
        assert_eq!(spans[1].x, 20);
        assert_eq!(spans[1].covers, &[7]);
        assert!(sl.is_ready(5));
        assert!(!sl.is_ready(4));
    }

    #[test]
    fn reset_spans_keeps_buffer() {
        let mut sl = ScanLine::new();
        sl.reset(0, 100);
        sl.add_span(0, 0, 50, 9);
        sl.reset_spans();
        assert_eq!(sl.num_spans(), 0);
        assert!(!sl.is_ready(1));
        sl.reset(0, 10);
        assert!(sl.covers.len() >= 102);
    }
}
