//! Fixed point coordinates
//!
//! Path coordinates are 24.8 signed fixed point; the low 8 bits are the
//! sub-pixel fraction.

/// Number of fractional bits in a [`Fixed`] coordinate
pub const POLY_SUBPIXEL_SHIFT: i32 = 8;
/// One pixel in sub-pixel units
pub const POLY_SUBPIXEL_SCALE: i32 = 1 << POLY_SUBPIXEL_SHIFT;
/// Mask for the sub-pixel fraction
pub const POLY_SUBPIXEL_MASK: i32 = POLY_SUBPIXEL_SCALE - 1;

/// Largest pixel coordinate that fits in a packed cell key
pub const MAX_PIXEL_COORD: i32 = 0x7FFF;
/// Largest fixed point coordinate accepted by the outline
pub const MAX_FIXED_COORD: i32 = MAX_PIXEL_COORD << POLY_SUBPIXEL_SHIFT;

/// Signed 24.8 fixed point value
///
///     use panel_raster::Fixed;
///     let v = Fixed::from_f64(1.5);
///     assert_eq!(v.raw(), 384);
///     assert_eq!(v.pixel(), 1);
///     assert_eq!(v.frac(), 128);
///
#[derive(Debug,Copy,Clone,PartialEq,Eq,PartialOrd,Ord,Hash,Default)]
pub struct Fixed(i32);

impl Fixed {
    /// Wrap a raw 24.8 value
    pub const fn from_raw(v: i32) -> Self {
        Fixed(v)
    }
    /// Whole pixel value
    pub const fn from_int(v: i32) -> Self {
        Fixed(v << POLY_SUBPIXEL_SHIFT)
    }
    /// Convert floating point geometry, `round(v * 256)`
    pub fn from_f64(v: f64) -> Self {
        Fixed((v * f64::from(POLY_SUBPIXEL_SCALE)).round() as i32)
    }
    pub const fn raw(self) -> i32 {
        self.0
    }
    /// Pixel containing this coordinate (floor)
    pub const fn pixel(self) -> i32 {
        self.0 >> POLY_SUBPIXEL_SHIFT
    }
    /// Sub-pixel fraction in `[0,256)`
    pub const fn frac(self) -> i32 {
        self.0 & POLY_SUBPIXEL_MASK
    }
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / f64::from(POLY_SUBPIXEL_SCALE)
    }
    /// Clamp into the range representable by a packed cell key
    pub fn clamped(self) -> Self {
        Fixed(self.0.max(-MAX_FIXED_COORD).min(MAX_FIXED_COORD))
    }
}

impl From<i32> for Fixed {
    fn from(v: i32) -> Self {
        Fixed(v)
    }
}
impl From<Fixed> for i32 {
    fn from(v: Fixed) -> Self {
        v.0
    }
}

/// Cell key, `(y << 16) | x` in pixel units
///
/// The key is formed as `y * 65536 + x` so negative x values still sort
/// y-major; for `x >= 0` this is the same bit pattern as `(y << 16) | x`.
///
///     use panel_raster::PackedCoord;
///     let p = PackedCoord::new(3, 7);
///     assert_eq!(p.raw(), (7 << 16) | 3);
///     assert_eq!(p.x(), 3);
///     assert_eq!(p.y(), 7);
///     let n = PackedCoord::new(-2, 7);
///     assert_eq!((n.x(), n.y()), (-2, 7));
///     assert!(n < p);
///
#[derive(Debug,Copy,Clone,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub struct PackedCoord(i32);

impl PackedCoord {
    /// Key that no reachable cell produces
    pub const NONE: PackedCoord = PackedCoord(i32::MAX);

    pub fn new(x: i32, y: i32) -> Self {
        debug_assert!(x.abs() <= MAX_PIXEL_COORD && y.abs() <= MAX_PIXEL_COORD);
        PackedCoord((y << 16) + x)
    }
    pub const fn from_raw(v: i32) -> Self {
        PackedCoord(v)
    }
    pub const fn raw(self) -> i32 {
        self.0
    }
    /// Decoded row; [`NONE`](PackedCoord::NONE) decodes to an arbitrary
    /// pixel without overflowing
    pub fn y(self) -> i32 {
        self.0.wrapping_add(0x8000) >> 16
    }
    pub fn x(self) -> i32 {
        self.xy().0
    }
    pub fn xy(self) -> (i32, i32) {
        let y = self.y();
        (self.0.wrapping_sub(y << 16), y)
    }
}
