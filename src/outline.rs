//! Path outline
//!
//! Traces move/line operations into coverage cells. Each edge is walked
//! across pixel rows and, inside a row, across pixel columns; the signed
//! vertical extent (cover) and cover weighted by horizontal position (area)
//! are added to every cell the edge passes through.

use crate::cell::{Cell, CellArena, SortedCells, CELL_BLOCK_LIMIT};
use crate::error::RasterError;
use crate::fixed::{Fixed, PackedCoord};
use crate::fixed::{POLY_SUBPIXEL_MASK, POLY_SUBPIXEL_SCALE, POLY_SUBPIXEL_SHIFT};

/// Edges at least this wide are split in half to keep products within i32
const DX_LIMIT: i32 = 16384 << POLY_SUBPIXEL_SHIFT;

#[derive(Debug,PartialEq,Copy,Clone)]
pub enum PathStatus {
    Initial,
    Closed,
    MoveTo,
    LineTo
}
impl Default for PathStatus {
    fn default() -> PathStatus {
        PathStatus::Initial
    }
}

#[derive(Debug)]
pub struct Outline {
    cells: CellArena,
    curr_cell: Cell,
    status: PathStatus,
    start_x: i32,
    start_y: i32,
    cur_x: i32,
    cur_y: i32,
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl Default for Outline {
    fn default() -> Self {
        Self::new()
    }
}

impl Outline {
    pub fn new() -> Self {
        Self::with_block_limit(CELL_BLOCK_LIMIT)
    }
    pub fn with_block_limit(limit: usize) -> Self {
        Self { cells: CellArena::with_block_limit(limit),
               curr_cell: Cell::default(),
               status: PathStatus::Initial,
               start_x: 0, start_y: 0, cur_x: 0, cur_y: 0,
               min_x: i32::MAX, min_y: i32::MAX,
               max_x: i32::MIN, max_y: i32::MIN,
        }
    }
    /// Drop all cells and start an empty path; cell blocks are kept
    pub fn reset(&mut self) {
        self.cells.reset();
        self.curr_cell = Cell::default();
        self.status = PathStatus::Initial;
        self.min_x = i32::MAX;
        self.min_y = i32::MAX;
        self.max_x = i32::MIN;
        self.max_y = i32::MIN;
    }
    pub fn status(&self) -> PathStatus {
        self.status
    }
    pub fn min_x(&self) -> i32 { self.min_x }
    pub fn min_y(&self) -> i32 { self.min_y }
    pub fn max_x(&self) -> i32 { self.max_x }
    pub fn max_y(&self) -> i32 { self.max_y }
    /// True once any edge has been traced since the last reset
    pub fn has_bounds(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }
    /// Committed cells; the cell being accumulated is not included
    pub fn arena(&self) -> &CellArena {
        &self.cells
    }

    /// Start a new sub-path at (`x`,`y`), closing any open one
    pub fn move_to(&mut self, x: Fixed, y: Fixed) -> Result<(), RasterError> {
        if self.cells.is_sorted() {
            self.reset();
        }
        self.close_polygon()?;
        let (x, y) = (x.clamped(), y.clamped());
        log::trace!("MOVE_TO: {} {}", x.raw(), y.raw());
        self.start_x = x.raw();
        self.start_y = y.raw();
        self.cur_x = x.raw();
        self.cur_y = y.raw();
        self.set_curr_cell(x.pixel(), y.pixel())?;
        self.status = PathStatus::MoveTo;
        Ok(())
    }

    /// Add an edge from the current position to (`x`,`y`)
    pub fn line_to(&mut self, x: Fixed, y: Fixed) -> Result<(), RasterError> {
        if self.status == PathStatus::Initial {
            return self.move_to(x, y);
        }
        if self.cells.is_sorted() {
            // Already handed out; continue from the same point in a fresh path
            let (cx, cy) = (Fixed::from_raw(self.cur_x), Fixed::from_raw(self.cur_y));
            self.reset();
            self.move_to(cx, cy)?;
        }
        let (x, y) = (x.clamped().raw(), y.clamped().raw());
        self.line(self.cur_x, self.cur_y, x, y)?;
        self.cur_x = x;
        self.cur_y = y;
        self.status = PathStatus::LineTo;
        Ok(())
    }

    /// Emit the closing edge back to the sub-path start, if open
    pub fn close_polygon(&mut self) -> Result<(), RasterError> {
        if self.status == PathStatus::LineTo {
            log::trace!("CLOSE POLYGON: {} {}", self.start_x >> POLY_SUBPIXEL_SHIFT,
                        self.start_y >> POLY_SUBPIXEL_SHIFT);
            self.line(self.cur_x, self.cur_y, self.start_x, self.start_y)?;
            self.cur_x = self.start_x;
            self.cur_y = self.start_y;
            self.status = PathStatus::Closed;
        }
        Ok(())
    }

    /// Close the path and return its cells ordered by packed coordinate
    ///
    /// Sorting happens once per path; later calls return the same view.
    pub fn sorted_cells(&mut self) -> Result<SortedCells<'_>, RasterError> {
        self.close_polygon()?;
        if !self.cells.is_sorted() {
            if !self.curr_cell.is_empty() {
                self.cells.push(self.curr_cell)?;
            }
            self.curr_cell = Cell::default();
            self.cells.sort_cells()?;
        }
        Ok(self.cells.sorted_cells())
    }

    /// Commit the current cell if (`x`,`y`) is a different, non-empty pixel
    fn set_curr_cell(&mut self, x: i32, y: i32) -> Result<(), RasterError> {
        let key = PackedCoord::new(x, y);
        if self.curr_cell.packed != key {
            if !self.curr_cell.is_empty() {
                self.cells.push(self.curr_cell)?;
            }
            self.curr_cell = Cell { packed: key, cover: 0, area: 0 };
        }
        Ok(())
    }

    fn add_curr_cell(&mut self, cover: i32, area: i32) {
        self.curr_cell.cover += cover;
        self.curr_cell.area += area;
    }

    /// Walk an edge within pixel row `ey`; `y1`,`y2` are the sub-pixel
    /// positions inside that row
    fn render_hline(&mut self, ey: i32, x1: i32, y1: i32, x2: i32, y2: i32)
                    -> Result<(), RasterError> {
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let fx1 = x1 & POLY_SUBPIXEL_MASK;
        let fx2 = x2 & POLY_SUBPIXEL_MASK;

        // Horizontal Line
        if y1 == y2 {
            return self.set_curr_cell(ex2, ey);
        }

        // Single Cell
        if ex1 == ex2 {
            let delta = y2 - y1;
            self.add_curr_cell(delta, (fx1 + fx2) * delta);
            return Ok(());
        }

        // Adjacent Cells on Same Line
        let (p, first, incr, dx) = if x2 - x1 < 0 {
            (fx1 * (y2 - y1), 0, -1, x1 - x2)
        } else {
            ((POLY_SUBPIXEL_SCALE - fx1) * (y2 - y1), POLY_SUBPIXEL_SCALE, 1, x2 - x1)
        };
        let mut delta = p / dx;
        let mut xmod = p % dx;
        if xmod < 0 {
            delta -= 1;
            xmod += dx;
        }
        self.add_curr_cell(delta, (fx1 + first) * delta);

        let mut ex1 = ex1 + incr;
        self.set_curr_cell(ex1, ey)?;
        let mut y1 = y1 + delta;

        if ex1 != ex2 {
            let p = POLY_SUBPIXEL_SCALE * (y2 - y1 + delta);
            let mut lift = p / dx;
            let mut rem = p % dx;
            if rem < 0 {
                lift -= 1;
                rem += dx;
            }
            xmod -= dx;

            while ex1 != ex2 {
                delta = lift;
                xmod += rem;
                if xmod >= 0 {
                    xmod -= dx;
                    delta += 1;
                }
                self.add_curr_cell(delta, POLY_SUBPIXEL_SCALE * delta);
                y1 += delta;
                ex1 += incr;
                self.set_curr_cell(ex1, ey)?;
            }
        }
        let delta = y2 - y1;
        self.add_curr_cell(delta, (fx2 + POLY_SUBPIXEL_SCALE - first) * delta);
        Ok(())
    }

    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<(), RasterError> {
        log::trace!("LINE: {} {} -> {} {}", x1, y1, x2, y2);
        let dx = x2 - x1;
        // Split long lines in half
        if dx >= DX_LIMIT || dx <= -DX_LIMIT {
            let cx = (x1 + x2) / 2;
            let cy = (y1 + y2) / 2;
            self.line(x1, y1, cx, cy)?;
            return self.line(cx, cy, x2, y2);
        }
        let dy = y2 - y1;
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let ey1 = y1 >> POLY_SUBPIXEL_SHIFT;
        let ey2 = y2 >> POLY_SUBPIXEL_SHIFT;
        let fy1 = y1 & POLY_SUBPIXEL_MASK;
        let fy2 = y2 & POLY_SUBPIXEL_MASK;

        self.min_x = self.min_x.min(ex1).min(ex2);
        self.min_y = self.min_y.min(ey1).min(ey2);
        self.max_x = self.max_x.max(ex1).max(ex2);
        self.max_y = self.max_y.max(ey1).max(ey2);

        self.set_curr_cell(ex1, ey1)?;

        // Everything on a single row
        if ey1 == ey2 {
            return self.render_hline(ey1, x1, fy1, x2, fy2);
        }

        // Vertical line: every row in between gets the same cover and area
        if dx == 0 {
            let two_fx = (x1 - (ex1 << POLY_SUBPIXEL_SHIFT)) << 1;
            let (first, incr) = if dy < 0 {
                (0, -1)
            } else {
                (POLY_SUBPIXEL_SCALE, 1)
            };
            let delta = first - fy1;
            self.add_curr_cell(delta, two_fx * delta);

            let mut ey = ey1 + incr;
            self.set_curr_cell(ex1, ey)?;
            let delta = first + first - POLY_SUBPIXEL_SCALE;
            let area = two_fx * delta;
            while ey != ey2 {
                self.add_curr_cell(delta, area);
                ey += incr;
                self.set_curr_cell(ex1, ey)?;
            }
            let delta = fy2 - POLY_SUBPIXEL_SCALE + first;
            self.add_curr_cell(delta, two_fx * delta);
            return Ok(());
        }

        // Several rows
        let (p, first, incr, dy) = if dy < 0 {
            (fy1 * dx, 0, -1, -dy)
        } else {
            ((POLY_SUBPIXEL_SCALE - fy1) * dx, POLY_SUBPIXEL_SCALE, 1, dy)
        };
        let mut delta = p / dy;
        let mut xmod = p % dy;
        if xmod < 0 {
            delta -= 1;
            xmod += dy;
        }
        let mut x_from = x1 + delta;
        self.render_hline(ey1, x1, fy1, x_from, first)?;
        let mut ey = ey1 + incr;
        self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey)?;
        if ey != ey2 {
            let p = POLY_SUBPIXEL_SCALE * dx;
            let mut lift = p / dy;
            let mut rem = p % dy;
            if rem < 0 {
                lift -= 1;
                rem += dy;
            }
            xmod -= dy;
            while ey != ey2 {
                delta = lift;
                xmod += rem;
                if xmod >= 0 {
                    xmod -= dy;
                    delta += 1;
                }
                let x_to = x_from + delta;
                self.render_hline(ey, x_from, POLY_SUBPIXEL_SCALE - first, x_to, first)?;
                x_from = x_to;
                ey += incr;
                self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey)?;
            }
        }
        self.render_hline(ey, x_from, POLY_SUBPIXEL_SCALE - first, x2, fy2)
    }
}
