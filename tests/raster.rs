
extern crate panel_raster as pr;

use pr::{FillingRule, Path, PixelBuffer, Rasterizer, RasterOptions, RasterError, Rgb565};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn triangle() -> Path {
    Path::polygon(&[(3.25, 1.5), (27.75, 9.125), (8.5, 30.875)])
}

#[test]
fn closed_path_rows_sum_to_zero_cover() {
    init();
    let mut ras = Rasterizer::new();
    ras.add_path(&triangle()).unwrap();
    let cells = ras.sorted_cells().unwrap();
    assert!(!cells.is_empty());

    let mut rows = std::collections::BTreeMap::new();
    for c in cells.iter() {
        *rows.entry(c.y()).or_insert(0) += c.cover;
    }
    assert!(rows.len() > 1);
    for (y, cover) in rows {
        assert_eq!(cover, 0, "row {}", y);
    }
}

#[test]
fn sorted_cells_are_row_major() {
    init();
    let mut ras = Rasterizer::new();
    ras.add_path(&triangle()).unwrap();
    ras.add_path(&Path::rect(20.5, 2.25, 30.0, 6.75)).unwrap();
    let cells = ras.sorted_cells().unwrap();
    let keys: Vec<_> = cells.iter().map(|c| (c.y(), c.x())).collect();
    assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    let packed: Vec<_> = cells.iter().map(|c| c.packed.raw()).collect();
    assert!(packed.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn square_interior_is_solid() {
    init();
    let mut buf = PixelBuffer::new(16, 16);
    let mut ras = Rasterizer::new();
    pr::render_path(&mut ras, &mut buf, &Path::rect(0.0, 0.0, 10.0, 10.0),
                    Rgb565::WHITE, FillingRule::NonZero).unwrap();
    for y in 0 .. 16 {
        for x in 0 .. 16 {
            let want = if x < 10 && y < 10 { Rgb565::WHITE } else { Rgb565::BLACK };
            assert_eq!(buf.get(x, y), Some(want), "pixel {} {}", x, y);
        }
    }
}

#[test]
fn offset_square_is_partial_only_on_boundary() {
    init();
    let mut buf = PixelBuffer::new(16, 16);
    let mut ras = Rasterizer::new();
    pr::render_path(&mut ras, &mut buf, &Path::rect(0.5, 0.5, 10.5, 10.5),
                    Rgb565::WHITE, FillingRule::NonZero).unwrap();
    for y in 0 .. 16 {
        for x in 0 .. 16 {
            let px = buf[(x, y)];
            if x > 10 || y > 10 {
                assert_eq!(px, Rgb565::BLACK.0, "outside {} {}", x, y);
            } else if x == 0 || y == 0 || x == 10 || y == 10 {
                assert!(px != Rgb565::BLACK.0 && px != Rgb565::WHITE.0,
                        "boundary {} {}: {:04x}", x, y, px);
            } else {
                assert_eq!(px, Rgb565::WHITE.0, "interior {} {}", x, y);
            }
        }
    }
    // half covered edge and quarter covered corner
    assert_eq!(ras.calculate_alpha(128 << 9, FillingRule::NonZero), 85);
    assert!(buf[(0, 0)] < buf[(0, 5)]);
}

#[test]
fn even_odd_leaves_overlap_empty() {
    init();
    let mut path = Path::rect(0.0, 0.0, 8.0, 8.0);
    path.vertices.extend(Path::rect(4.0, 4.0, 12.0, 12.0).vertices);

    let mut ras = Rasterizer::new();
    let mut eo = PixelBuffer::new(16, 16);
    pr::render_path(&mut ras, &mut eo, &path, Rgb565::RED, FillingRule::EvenOdd).unwrap();
    let mut nz = PixelBuffer::new(16, 16);
    pr::render_path(&mut ras, &mut nz, &path, Rgb565::RED, FillingRule::NonZero).unwrap();

    assert_eq!(eo[(2, 2)], Rgb565::RED.0);
    assert_eq!(eo[(10, 10)], Rgb565::RED.0);
    assert_eq!(eo[(6, 6)], Rgb565::BLACK.0);
    assert_eq!(nz[(6, 6)], Rgb565::RED.0);
    assert_eq!(nz[(13, 13)], Rgb565::BLACK.0);
}

#[test]
fn paths_clip_to_buffer() {
    init();
    let mut buf = PixelBuffer::new(8, 8);
    let mut ras = Rasterizer::new();
    pr::render_path(&mut ras, &mut buf, &Path::rect(-20.0, -20.0, 4.0, 40.0),
                    Rgb565::GREEN, FillingRule::NonZero).unwrap();
    for y in 0 .. 8 {
        assert_eq!(buf[(3, y)], Rgb565::GREEN.0);
        assert_eq!(buf[(4, y)], Rgb565::BLACK.0);
    }
}

#[test]
fn render_all_paths_in_order() {
    init();
    let paths = [Path::rect(0.0, 0.0, 6.0, 6.0), Path::rect(3.0, 3.0, 8.0, 8.0)];
    let colors = [Rgb565::BLUE, Rgb565::YELLOW];
    let mut buf = PixelBuffer::new(8, 8);
    let mut ras = Rasterizer::new();
    pr::render_all_paths(&mut ras, &mut buf, &paths, &colors, FillingRule::NonZero).unwrap();
    assert_eq!(buf[(1, 1)], Rgb565::BLUE.0);
    assert_eq!(buf[(4, 4)], Rgb565::YELLOW.0);
    assert_eq!(buf[(7, 0)], Rgb565::BLACK.0);
}

#[test]
fn empty_path_draws_nothing() {
    init();
    let mut buf = PixelBuffer::filled(4, 4, Rgb565::CYAN);
    let mut ras = Rasterizer::new();
    ras.render(&mut buf, Rgb565::RED, FillingRule::NonZero).unwrap();
    assert!(buf.as_slice().iter().all(|&p| p == Rgb565::CYAN.0));
}

#[test]
fn cell_limit_is_reported() {
    init();
    let opts = RasterOptions::default().with_cell_block_limit(1);
    let mut ras = Rasterizer::with_options(opts);
    let path = Path::polygon(&[(0.0, 0.0), (5000.0, 5000.0), (0.0, 5000.0)]);
    assert_eq!(ras.add_path(&path), Err(RasterError::CellLimit { limit: 1 }));

    // a reset rasterizer is usable again
    ras.reset();
    ras.add_path(&Path::rect(0.0, 0.0, 4.0, 4.0)).unwrap();
    let mut buf = PixelBuffer::new(4, 4);
    ras.render(&mut buf, Rgb565::WHITE, FillingRule::NonZero).unwrap();
    assert_eq!(buf[(3, 3)], Rgb565::WHITE.0);
}

#[test]
fn gamma_is_configurable() {
    init();
    let lin = Rasterizer::with_options(RasterOptions::default().with_gamma(1.0));
    assert_eq!(lin.calculate_alpha(128 << 9, FillingRule::NonZero), 128);
    let mut ras = Rasterizer::new();
    ras.gamma(|v| v);
    assert_eq!(ras.gamma_table().get(200), 200);
}
