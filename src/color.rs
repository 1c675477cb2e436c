//! Colors
//!
//! Pixels are 16-bit RGB565: red in bits 15..11, green in 10..5, blue in 4..0.

/// Spreads the three RGB565 fields of `c | c << 16` apart: green moves to
/// bits 26..21, red and blue stay in place with a gap between them.
pub const RGB565_WIDE_MASK: u32 = 0x07E0_F81F;

/// RGB565 color
///
///     use panel_raster::Rgb565;
///     assert_eq!(Rgb565::RED.0, 0xF800);
///     assert_eq!(Rgb565::new(255, 0, 0), Rgb565::RED);
///     assert_eq!(Rgb565::WHITE.to_rgb8(), [255, 255, 255]);
///
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq,Hash)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Rgb565 = Rgb565(0x0000);
    pub const NAVY: Rgb565 = Rgb565(0x000F);
    pub const DARKGREEN: Rgb565 = Rgb565(0x03E0);
    pub const DARKCYAN: Rgb565 = Rgb565(0x03EF);
    pub const MAROON: Rgb565 = Rgb565(0x7800);
    pub const PURPLE: Rgb565 = Rgb565(0x780F);
    pub const OLIVE: Rgb565 = Rgb565(0x7BE0);
    pub const LIGHTGREY: Rgb565 = Rgb565(0xC618);
    pub const DARKGREY: Rgb565 = Rgb565(0x7BEF);
    pub const BLUE: Rgb565 = Rgb565(0x001F);
    pub const GREEN: Rgb565 = Rgb565(0x07E0);
    pub const CYAN: Rgb565 = Rgb565(0x07FF);
    pub const RED: Rgb565 = Rgb565(0xF800);
    pub const MAGENTA: Rgb565 = Rgb565(0xF81F);
    pub const YELLOW: Rgb565 = Rgb565(0xFFE0);
    pub const WHITE: Rgb565 = Rgb565(0xFFFF);
    pub const ORANGE: Rgb565 = Rgb565(0xFD20);
    pub const GREENYELLOW: Rgb565 = Rgb565(0xAFE5);
    pub const PINK: Rgb565 = Rgb565(0xF81F);

    /// Pack 8-bit components, dropping the low bits
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb565(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }
    pub const fn red5(self) -> u8 {
        (self.0 >> 11) as u8
    }
    pub const fn green6(self) -> u8 {
        ((self.0 >> 5) & 0x3F) as u8
    }
    pub const fn blue5(self) -> u8 {
        (self.0 & 0x1F) as u8
    }
    /// Expand to 8-bit components by replicating the high bits
    pub fn to_rgb8(self) -> [u8; 3] {
        let (r, g, b) = (self.red5(), self.green6(), self.blue5());
        [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
    }
}

impl From<u16> for Rgb565 {
    fn from(v: u16) -> Self {
        Rgb565(v)
    }
}
impl From<Rgb565> for u16 {
    fn from(c: Rgb565) -> u16 {
        c.0
    }
}

/// Spread an RGB565 value so all three fields can be scaled by one multiply
#[inline]
pub fn widen(c: u16) -> u32 {
    let c = u32::from(c);
    (c | (c << 16)) & RGB565_WIDE_MASK
}

/// Fold a widened value back into RGB565
#[inline]
pub fn narrow(w: u32) -> u16 {
    (w | (w >> 16)) as u16
}

/// Blend `fg` over `bg` with 8-bit coverage `alpha`
///
/// Alpha is reduced to 0..=32 steps, `(alpha + 4) >> 3`, and applied to all
/// three fields of the widened colors at once.
///
///     use panel_raster::blend;
///     assert_eq!(blend(0xF800, 0xFF, 0x001F), 0xF800);
///     assert_eq!(blend(0xF800, 0, 0x001F), 0x001F);
///
#[inline]
pub fn blend(fg: u16, alpha: u8, bg: u16) -> u16 {
    let a = (u32::from(alpha) + 4) >> 3;
    let src = widen(fg);
    let dst = widen(bg);
    let step = (src.wrapping_sub(dst).wrapping_mul(a)) >> 5;
    narrow(dst.wrapping_add(step) & RGB565_WIDE_MASK)
}
