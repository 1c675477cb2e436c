//! Pixel buffer
//!
//! Data is stored as row-major order (C-format), one RGB565 value per pixel
//! with `stride == width`.

use crate::color::{blend, Rgb565};
use crate::diff::DiffSpan;

use std::ops::Index;
use std::ops::IndexMut;

#[derive(Debug,Clone,Default,PartialEq,Eq)]
pub struct PixelBuffer {
    /// Pixel data
    data: Vec<u16>,
    /// Image Width in pixels
    width: usize,
    /// Image Height in pixels
    height: usize,
}

impl PixelBuffer {
    /// Create a new buffer of width * height pixels, all black
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Rgb565::BLACK)
    }
    pub fn filled(width: usize, height: usize, color: Rgb565) -> Self {
        PixelBuffer { width, height, data: vec![color.0; width * height] }
    }
    /// Wrap existing pixel data; `None` when the length does not match
    pub fn from_vec(width: usize, height: usize, data: Vec<u16>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(PixelBuffer { width, height, data })
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    pub fn as_slice(&self) -> &[u16] {
        &self.data
    }
    pub fn as_mut_slice(&mut self) -> &mut [u16] {
        &mut self.data
    }
    pub fn into_vec(self) -> Vec<u16> {
        self.data
    }
    pub fn row(&self, y: usize) -> &[u16] {
        debug_assert!(y < self.height);
        &self.data[y * self.width .. (y + 1) * self.width]
    }
    pub fn row_mut(&mut self, y: usize) -> &mut [u16] {
        debug_assert!(y < self.height);
        &mut self.data[y * self.width .. (y + 1) * self.width]
    }
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb565> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Rgb565(self.data[y * self.width + x]))
    }
    /// Set one pixel; locations outside of the buffer are ignored
    pub fn set(&mut self, x: usize, y: usize, c: Rgb565) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.data[y * self.width + x] = c.0;
    }
    pub fn clear(&mut self, c: Rgb565) {
        self.data.iter_mut().for_each(|v| *v = c.0);
    }
    /// Fill pixels from (`x`,`y`) to (`x+n-1`,`y`), clipped to the buffer
    pub fn copy_hline(&mut self, x: i32, y: i32, n: usize, c: Rgb565) {
        if let Some((x, n)) = self.clip_hspan(x, y, n) {
            let y = y as usize;
            self.row_mut(y)[x .. x + n].iter_mut().for_each(|v| *v = c.0);
        }
    }

    /// Blend `c` into `covers.len()` pixels starting at (`x`,`y`)
    ///
    /// Parts outside the buffer are clipped. A coverage of 255 stores the
    /// color directly.
    pub fn blend_solid_hspan(&mut self, x: i32, y: i32, c: Rgb565, covers: &[u8]) {
        let (xs, n) = match self.clip_hspan(x, y, covers.len()) {
            Some(v) => v,
            None => return,
        };
        let off = (xs as i64 - i64::from(x)) as usize;
        let row = self.row_mut(y as usize);
        for (p, &cover) in row[xs .. xs + n].iter_mut().zip(&covers[off .. off + n]) {
            *p = match cover {
                0xFF => c.0,
                0 => *p,
                _ => blend(c.0, cover, *p),
            };
        }
    }

    /// Copy the pixels covered by `span` from `src`
    ///
    /// Used to bring a previous frame up to date after a span was sent.
    /// Both buffers must have the same dimensions.
    pub fn copy_span(&mut self, src: &PixelBuffer, span: &DiffSpan) {
        debug_assert_eq!((self.width, self.height), (src.width, src.height));
        for (y, x0, x1) in span.rows() {
            let (y, x0, x1) = (usize::from(y), usize::from(x0), usize::from(x1));
            if y >= self.height || x1 > self.width || x0 >= x1 {
                continue;
            }
            let w = self.width;
            self.data[y * w + x0 .. y * w + x1]
                .copy_from_slice(&src.data[y * w + x0 .. y * w + x1]);
        }
    }

    /// Clip a horizontal run to the buffer, returning (x, len)
    fn clip_hspan(&self, x: i32, y: i32, len: usize) -> Option<(usize, usize)> {
        if y < 0 || y as usize >= self.height || len == 0 {
            return None;
        }
        let x0 = i64::from(x);
        let x1 = x0 + len as i64;
        let x0 = x0.max(0);
        let x1 = x1.min(self.width as i64);
        if x0 >= x1 {
            return None;
        }
        Some((x0 as usize, (x1 - x0) as usize))
    }
}

impl Index<(usize,usize)> for PixelBuffer {
    type Output = u16;
    fn index(&self, index: (usize, usize)) -> &u16 {
        assert!(index.0 < self.width, "request {} >= {} width :: index", index.0, self.width);
        assert!(index.1 < self.height, "request {} >= {} height :: index", index.1, self.height);
        &self.data[index.1 * self.width + index.0]
    }
}
impl IndexMut<(usize,usize)> for PixelBuffer {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut u16 {
        assert!(index.0 < self.width, "request {} >= {} width :: index_mut", index.0, self.width);
        assert!(index.1 < self.height, "request {} >= {} height :: index_mut", index.1, self.height);
        &mut self.data[index.1 * self.width + index.0]
    }
}
