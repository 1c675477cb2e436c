//! Anti-aliased polygon rasterizer and frame differ for RGB565 panels
//!
//! How does this work
//!
//!    ras = Rasterizer::new()
//!    buf = PixelBuffer::new(w, h)
//!  Raster Operations
//!    move_to, line_to, add_path
//!     Outline::line()
//!       render_hline()
//!        set_curr_cell()
//!     Output: Cells with packed X/Y, Cover, and Area
//!  Render to Buffer
//!   ras.render(buf, color, rule)
//!     sorted_cells()
//!       close_polygon()
//!       sort_cells()  -- by packed y*65536+x
//!     sweep
//!       calculate_alpha()
//!       ScanLine::add_cell / add_span
//!       render_scanline_aa_solid()
//!         blend_solid_hspan
//!           blend (RGB565, Q1.5 alpha)
//!  Send to Panel
//!   engine.diff(current, previous)  -- Single, Coarse or Exact
//!   merge(spans, threshold)
//!   for span in engine.spans() { .. }
//!
//! A complete frame:
//!
//!     use panel_raster::*;
//!     let previous = PixelBuffer::new(32, 32);
//!     let mut current = previous.clone();
//!     let mut ras = Rasterizer::new();
//!     let square = Path::rect(4.0, 4.0, 12.0, 12.0);
//!     render_path(&mut ras, &mut current, &square, Rgb565::RED, FillingRule::NonZero).unwrap();
//!     assert_eq!(current[(5, 5)], Rgb565::RED.0);
//!
//!     let mut engine = DiffEngine::default();
//!     let report = engine.diff_and_merge(&current, &previous).unwrap();
//!     assert_eq!(report.spans, 1);
//!     assert_eq!(report.pixels, 64);
//!

pub mod fixed;
pub mod error;
pub mod cell;
pub mod outline;
pub mod scan;
pub mod color;
pub mod buffer;
pub mod path_storage;
pub mod raster;
pub mod render;
pub mod compare;
pub mod diff;
pub mod merge;
pub mod ppm;

pub use fixed::*;
pub use error::*;
pub use cell::*;
pub use outline::*;
pub use scan::*;
pub use color::*;
pub use buffer::*;
pub use path_storage::*;
pub use raster::*;
pub use render::*;
pub use diff::*;
pub use merge::merge;
