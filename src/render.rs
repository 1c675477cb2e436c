//! Renderer

use crate::buffer::PixelBuffer;
use crate::color::Rgb565;
use crate::error::RasterError;
use crate::path_storage::VertexSource;
use crate::raster::{FillingRule, Rasterizer};
use crate::scan::ScanLine;

/// Render a single Scanline (y-row) with Anti Aliasing
pub fn render_scanline_aa_solid(sl: &ScanLine, buf: &mut PixelBuffer, color: Rgb565) {
    let y = sl.y();
    for span in sl.spans() {
        log::trace!("RENDER SCANLINE AA SOLID: Span x,y,len {} {} {}", span.x, y, span.len);
        buf.blend_solid_hspan(span.x, y, color, span.covers);
    }
}

/// Rasterize `path` and fill it into `buf`
pub fn render_path<VS>(ras: &mut Rasterizer,
                       buf: &mut PixelBuffer,
                       path: &VS,
                       color: Rgb565,
                       rule: FillingRule) -> Result<(), RasterError>
    where VS: VertexSource
{
    ras.reset();
    ras.add_path(path)?;
    ras.render(buf, color, rule)
}

/// Render paths after rasterizing to an image using a set of colors
pub fn render_all_paths<VS>(ras: &mut Rasterizer,
                            buf: &mut PixelBuffer,
                            paths: &[VS],
                            colors: &[Rgb565],
                            rule: FillingRule) -> Result<(), RasterError>
    where VS: VertexSource
{
    debug_assert!(paths.len() == colors.len());
    for (path, &color) in paths.iter().zip(colors.iter()) {
        render_path(ras, buf, path, color, rule)?;
    }
    Ok(())
}
