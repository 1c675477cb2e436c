//! Scanline rasterizer
//!
//! Owns the outline and scanline for one drawing surface. [`Rasterizer::render`]
//! sweeps the sorted cells row by row, turning the running cover and area
//! into alpha values and blending finished rows into a [`PixelBuffer`].

use crate::buffer::PixelBuffer;
use crate::cell::{SortedCells, CELL_BLOCK_LIMIT};
use crate::color::Rgb565;
use crate::error::RasterError;
use crate::fixed::{Fixed, POLY_SUBPIXEL_SHIFT};
use crate::outline::Outline;
use crate::path_storage::{PathCommand, VertexSource};
use crate::render::render_scanline_aa_solid;
use crate::scan::ScanLine;

const AA_SHIFT: i32 = 8;
const AA_SCALE: i32 = 1 << AA_SHIFT;
const AA_MASK: i32 = AA_SCALE - 1;
const AA_SCALE2: i32 = AA_SCALE * 2;
const AA_MASK2: i32 = AA_SCALE2 - 1;

/// Default gamma exponent for the alpha lookup table
pub const DEFAULT_GAMMA: f64 = 1.6;

#[derive(Debug,PartialEq,Copy,Clone)]
pub enum FillingRule {
    NonZero,
    EvenOdd,
}
impl Default for FillingRule {
    fn default() -> FillingRule {
        FillingRule::NonZero
    }
}

/// Alpha lookup table applied to coverage before blending
#[derive(Clone)]
pub struct Gamma {
    table: [u8; 256],
}

impl Gamma {
    /// `gamma[i] = round(255 * (i/255)^g)`
    ///
    ///     use panel_raster::Gamma;
    ///     let g = Gamma::power(1.6);
    ///     assert_eq!(g.get(0), 0);
    ///     assert_eq!(g.get(255), 255);
    ///     assert_eq!(g.get(128), 85);
    ///
    pub fn power(g: f64) -> Self {
        Self::from_fn(|v| v.powf(g))
    }
    pub fn linear() -> Self {
        Self::from_fn(|v| v)
    }
    /// Build a table from a function mapping `[0,1]` to `[0,1]`
    pub fn from_fn<F>(gfunc: F) -> Self
        where F: Fn(f64) -> f64
    {
        let aa_mask = f64::from(AA_MASK);
        let mut table = [0u8; 256];
        for (i, v) in table.iter_mut().enumerate() {
            let g = gfunc(i as f64 / aa_mask);
            *v = (g * aa_mask).round().max(0.0).min(aa_mask) as u8;
        }
        Gamma { table }
    }
    pub fn get(&self, i: u8) -> u8 {
        self.table[usize::from(i)]
    }
    pub fn table(&self) -> &[u8; 256] {
        &self.table
    }
}

impl Default for Gamma {
    fn default() -> Self {
        Self::power(DEFAULT_GAMMA)
    }
}

impl std::fmt::Debug for Gamma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gamma").field("mid", &self.table[128]).finish()
    }
}

/// Rasterizer configuration
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct RasterOptions {
    /// Exponent of the alpha gamma table
    pub gamma: f64,
    /// Cell blocks a single path may allocate before failing
    pub cell_block_limit: usize,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { gamma: DEFAULT_GAMMA, cell_block_limit: CELL_BLOCK_LIMIT }
    }
}

impl RasterOptions {
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }
    pub fn with_cell_block_limit(mut self, limit: usize) -> Self {
        self.cell_block_limit = limit;
        self
    }
}

/// Map accumulated area to an 8-bit alpha
pub fn calculate_alpha(gamma: &Gamma, area: i32, rule: FillingRule) -> u8 {
    let mut cover = area >> (POLY_SUBPIXEL_SHIFT * 2 + 1 - AA_SHIFT);
    cover = cover.abs();
    if rule == FillingRule::EvenOdd {
        cover &= AA_MASK2;
        if cover > AA_SCALE {
            cover = AA_SCALE2 - cover;
        }
    }
    cover = cover.max(0).min(AA_MASK);
    gamma.get(cover as u8)
}

#[derive(Debug, Default)]
pub struct Rasterizer {
    outline: Outline,
    scanline: ScanLine,
    gamma: Gamma,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::with_options(RasterOptions::default())
    }
    pub fn with_options(opts: RasterOptions) -> Self {
        Self { outline: Outline::with_block_limit(opts.cell_block_limit),
               scanline: ScanLine::new(),
               gamma: Gamma::power(opts.gamma),
        }
    }
    pub fn new_with_gamma<F>(gfunc: F) -> Self
        where F: Fn(f64) -> f64
    {
        let mut new = Self::new();
        new.gamma(gfunc);
        new
    }
    /// Replace the gamma table
    pub fn gamma<F>(&mut self, gfunc: F)
        where F: Fn(f64) -> f64
    {
        self.gamma = Gamma::from_fn(gfunc);
    }
    pub fn gamma_table(&self) -> &Gamma {
        &self.gamma
    }
    pub fn outline(&self) -> &Outline {
        &self.outline
    }
    pub fn reset(&mut self) {
        self.outline.reset();
    }
    pub fn move_to(&mut self, x: Fixed, y: Fixed) -> Result<(), RasterError> {
        self.outline.move_to(x, y)
    }
    pub fn line_to(&mut self, x: Fixed, y: Fixed) -> Result<(), RasterError> {
        self.outline.line_to(x, y)
    }
    pub fn move_to_d(&mut self, x: f64, y: f64) -> Result<(), RasterError> {
        self.outline.move_to(Fixed::from_f64(x), Fixed::from_f64(y))
    }
    pub fn line_to_d(&mut self, x: f64, y: f64) -> Result<(), RasterError> {
        self.outline.line_to(Fixed::from_f64(x), Fixed::from_f64(y))
    }
    pub fn close_polygon(&mut self) -> Result<(), RasterError> {
        self.outline.close_polygon()
    }
    /// Close the path and sort its cells
    pub fn sorted_cells(&mut self) -> Result<SortedCells<'_>, RasterError> {
        self.outline.sorted_cells()
    }
    /// Append all vertices of `path`
    pub fn add_path<VS: VertexSource>(&mut self, path: &VS) -> Result<(), RasterError> {
        if self.outline.arena().is_sorted() {
            self.reset();
        }
        for v in path.vertices() {
            match v.cmd {
                PathCommand::MoveTo => self.move_to_d(v.x, v.y)?,
                PathCommand::LineTo => self.line_to_d(v.x, v.y)?,
                PathCommand::Close  => self.close_polygon()?,
            }
        }
        Ok(())
    }
    pub fn calculate_alpha(&self, area: i32, rule: FillingRule) -> u8 {
        calculate_alpha(&self.gamma, area, rule)
    }

    /// Fill the current path into `buf` with `color`
    ///
    /// An empty path draws nothing.
    pub fn render(&mut self, buf: &mut PixelBuffer, color: Rgb565, rule: FillingRule)
                  -> Result<(), RasterError> {
        let Self { outline, scanline, gamma } = self;
        let (min_x, max_x) = (outline.min_x(), outline.max_x());
        let cells = outline.sorted_cells()?;
        if cells.is_empty() {
            return Ok(());
        }
        scanline.reset(min_x, max_x);

        let mut cover = 0;
        let mut row = i32::MIN;
        let mut iter = cells.iter().peekable();
        while let Some(cell) = iter.next() {
            let key = cell.packed;
            let mut area = cell.area;
            let mut cell_cover = cell.cover;
            // accumulate all cells with the same coordinate
            while let Some(next) = iter.peek() {
                if next.packed != key {
                    break;
                }
                area += next.area;
                cell_cover += next.cover;
                iter.next();
            }
            let (mut x, y) = key.xy();
            if y != row {
                if scanline.is_ready(y) {
                    render_scanline_aa_solid(scanline, buf, color);
                }
                scanline.reset_spans();
                cover = 0;
                row = y;
            }
            cover += cell_cover;
            log::trace!("SWEEP: x {} y {} cover {} area {}", x, y, cover, area);

            if area != 0 {
                let alpha = calculate_alpha(gamma, (cover << (POLY_SUBPIXEL_SHIFT + 1)) - area, rule);
                if alpha > 0 {
                    scanline.add_cell(x, y, alpha);
                }
                x += 1;
            }
            if let Some(next) = iter.peek() {
                let (nx, ny) = next.packed.xy();
                if ny == y && nx > x {
                    let alpha = calculate_alpha(gamma, cover << (POLY_SUBPIXEL_SHIFT + 1), rule);
                    if alpha > 0 {
                        scanline.add_span(x, y, (nx - x) as usize, alpha);
                    }
                }
            }
        }
        if scanline.num_spans() > 0 {
            render_scanline_aa_solid(scanline, buf, color);
        }
        scanline.reset_spans();
        Ok(())
    }
}
