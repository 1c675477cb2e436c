
extern crate panel_raster as pr;

use pr::{blend, Rgb565};

const BACKGROUNDS: [u16; 7] = [0x0000, 0xFFFF, 0x001F, 0x07E0, 0xF800, 0x1234, 0xA5A5];

#[test]
fn opaque_and_transparent_blends() {
    for c in 0 ..= u16::MAX {
        for &bg in BACKGROUNDS.iter() {
            assert_eq!(blend(c, 0xFF, bg), c, "opaque {:04x} over {:04x}", c, bg);
            assert_eq!(blend(c, 0, bg), bg, "clear {:04x} over {:04x}", c, bg);
        }
        assert_eq!(blend(0, 0xFF, c), 0);
        assert_eq!(blend(0xFFFF, 0, c), c);
    }
}

#[test]
fn half_blend_lands_between() {
    let mid = Rgb565(blend(Rgb565::WHITE.0, 0x80, Rgb565::BLACK.0));
    assert_eq!(mid, Rgb565::DARKGREY);

    let c = Rgb565(blend(Rgb565::RED.0, 0x80, Rgb565::BLUE.0));
    assert!(c.red5() > 0 && c.red5() < 31);
    assert_eq!(c.green6(), 0);
    assert!(c.blue5() > 0 && c.blue5() < 31);
}

#[test]
fn palette_bits() {
    assert_eq!(Rgb565::new(255, 0, 0), Rgb565::RED);
    assert_eq!(Rgb565::new(0, 255, 0), Rgb565::GREEN);
    assert_eq!(Rgb565::new(0, 0, 255), Rgb565::BLUE);
    assert_eq!(Rgb565::WHITE.to_rgb8(), [255, 255, 255]);
    assert_eq!(Rgb565::BLACK.to_rgb8(), [0, 0, 0]);
}
