//! Reading and writing of image files
//!
//! Frames are expanded from RGB565 to 8 bit RGB and written through the
//! `image` crate; the format follows the file extension.
//!
use std::path::Path;

use crate::buffer::PixelBuffer;
use crate::color::Rgb565;
use crate::error::Error;

/// Read an image file as packed RGB8
pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<(Vec<u8>,usize,usize),Error> {
    let img = image::open(filename)?.to_rgb8();
    let (w, h) = img.dimensions();
    let buf = img.into_raw();
    Ok((buf, w as usize, h as usize))
}

/// Write packed RGB8 data
pub fn write_file<P: AsRef<Path>>(buf: &[u8], width: usize, height: usize, filename: P) -> Result<(), Error> {
    image::save_buffer(filename, buf, width as u32, height as u32,
                       image::ExtendedColorType::Rgb8)?;
    Ok(())
}

/// Compare two image files pixel by pixel
pub fn img_diff<P: AsRef<Path>>(f1: P, f2: P) -> Result<bool,Error> {
    let (d1,w1,h1) = read_file(f1)?;
    let (d2,w2,h2) = read_file(f2)?;
    if w1 != w2 || h1 != h2 {
        log::warn!("image sizes differ: {}x{} vs {}x{}", w1, h1, w2, h2);
        return Ok(false);
    }
    let mut flag = true;
    for (i,(v1,v2)) in d1.iter().zip(d2.iter()).enumerate() {
        if v1 != v2 {
            log::debug!("{} [{},{},{}]: {} {}", i, (i/3)%w1,(i/3)/w1,i%3, v1,v2);
            flag = false;
        }
    }
    Ok(flag)
}

impl PixelBuffer {
    /// Frame as packed RGB8
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.as_slice().iter()
            .flat_map(|&p| Rgb565(p).to_rgb8().to_vec())
            .collect()
    }
    /// Write the frame to `filename`
    pub fn to_file<P: AsRef<Path>>(&self, filename: P) -> Result<(), Error> {
        write_file(&self.to_rgb8(), self.width(), self.height(), filename)
    }
    /// Read `filename`, rounding every pixel down to RGB565
    pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<Self, Error> {
        let (data, w, h) = read_file(filename)?;
        let mut buf = PixelBuffer::new(w, h);
        for (dst, px) in buf.as_mut_slice().iter_mut().zip(data.chunks_exact(3)) {
            *dst = Rgb565::new(px[0], px[1], px[2]).0;
        }
        Ok(buf)
    }
}
