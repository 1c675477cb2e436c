
extern crate panel_raster as pr;

use pr::{FillingRule, Path, PixelBuffer, Rasterizer, Rgb565};

fn tmp(name: &str) -> std::path::PathBuf {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("tmp");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn png_round_trip() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut buf = PixelBuffer::filled(40, 30, Rgb565::NAVY);
    let mut ras = Rasterizer::new();
    let tri = Path::polygon(&[(4.5, 3.0), (36.0, 12.25), (10.0, 27.5)]);
    pr::render_path(&mut ras, &mut buf, &tri, Rgb565::ORANGE, FillingRule::NonZero).unwrap();

    let file = tmp("triangle.png");
    buf.to_file(&file).unwrap();
    let back = PixelBuffer::from_file(&file).unwrap();
    assert_eq!((back.width(), back.height()), (40, 30));
    assert_eq!(back.as_slice(), buf.as_slice());
    assert!(pr::ppm::img_diff(&file, &file).unwrap());

    let other = tmp("triangle_navy.png");
    PixelBuffer::filled(40, 30, Rgb565::NAVY).to_file(&other).unwrap();
    assert!(!pr::ppm::img_diff(&file, &other).unwrap());
}

#[test]
fn missing_file_is_an_image_error() {
    let err = PixelBuffer::from_file(tmp("does_not_exist.png")).unwrap_err();
    assert!(matches!(err, pr::Error::Image(_)));
}
