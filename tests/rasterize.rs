use image::{Rgba, RgbaImage};
use launcher_icon_gen::density::DensityTable;
use launcher_icon_gen::glyph::{GlyphBox, GlyphSource};
use launcher_icon_gen::icon_gen::{fill_background, render, GlyphSpec};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn expected_background(i: u32, j: u32) -> [u8; 3] {
    let k = (i + j) as f64;
    let channel = |v: f64| (v as i64).clamp(0, 255) as u8;
    [
        channel(59.0 + k * 0.1),
        channel(130.0 + k * 0.05),
        channel(246.0 - k * 0.2),
    ]
}

#[test]
fn test_every_default_size_is_square() {
    let glyphs = GlyphSource::builtin();
    let spec = GlyphSpec::default();

    for density in DensityTable::default().entries() {
        let icon = render(density.size, &glyphs, &spec);
        assert_eq!(icon.width(), density.size, "{} width", density.folder);
        assert_eq!(icon.height(), density.size, "{} height", density.folder);
    }
}

#[test]
fn test_background_matches_ramp_at_every_pixel() {
    for size in [48, 72, 96, 144, 192] {
        let mut img = RgbaImage::new(size, size);
        fill_background(&mut img);

        for (i, j, pixel) in img.enumerate_pixels() {
            let [r, g, b] = expected_background(i, j);
            for (actual, expected) in [(pixel[0], r), (pixel[1], g), (pixel[2], b)] {
                assert!(
                    (actual as i32 - expected as i32).abs() <= 1,
                    "pixel ({i}, {j}) at size {size}: {actual} vs {expected}"
                );
            }
            assert_eq!(pixel[3], 255);
        }
    }
}

#[test]
fn test_size_48_corner_pixels() {
    let icon = render(48, &GlyphSource::builtin(), &GlyphSpec::default());

    assert_eq!(*icon.get_pixel(0, 0), Rgba([59, 130, 246, 255]));
    assert_eq!(*icon.get_pixel(47, 47), Rgba([68, 134, 227, 255]));
}

#[test]
fn test_render_is_deterministic() {
    let glyphs = GlyphSource::builtin();
    let spec = GlyphSpec::default();

    for size in [1, 2, 48, 192] {
        assert_eq!(render(size, &glyphs, &spec), render(size, &glyphs, &spec));
    }
}

#[test]
fn test_tiny_sizes_do_not_panic() {
    let glyphs = GlyphSource::builtin();
    let spec = GlyphSpec::default();

    let one = render(1, &glyphs, &spec);
    assert_eq!(one.dimensions(), (1, 1));
    assert_eq!(*one.get_pixel(0, 0), Rgba([59, 130, 246, 255]));

    for size in 2..16 {
        let icon = render(size, &glyphs, &spec);
        assert_eq!(icon.dimensions(), (size, size));
    }
}

#[test]
fn test_white_glyph_near_center() {
    let glyphs = GlyphSource::builtin();
    let spec = GlyphSpec::default();

    for size in [16, 24, 48, 72, 96, 144, 192] {
        let icon = render(size, &glyphs, &spec);
        let (lo, hi) = (size / 4, size * 3 / 4);

        let found = (lo..hi).any(|y| (lo..hi).any(|x| *icon.get_pixel(x, y) == WHITE));
        assert!(found, "no white glyph pixel near the centre at size {size}");
    }
}

#[test]
fn test_builtin_glyph_is_centered_on_ink_box() {
    // Size 48: font 24px, scale 2, "L" ink box is 10x14 at the origin
    let icon = render(48, &GlyphSource::builtin(), &GlyphSpec::default());
    let x = (48 - 10) / 2;
    let y = (48 - 14) / 2;

    // Stem top-left and base bottom-right are ink
    assert_eq!(*icon.get_pixel(x, y), WHITE);
    assert_eq!(*icon.get_pixel(x + 9, y + 13), WHITE);

    // Just outside the ink box is background
    let [r, g, b] = expected_background(x - 1, y);
    assert_eq!(*icon.get_pixel(x - 1, y), Rgba([r, g, b, 255]));
    let [r, g, b] = expected_background(x + 9, y);
    assert_eq!(*icon.get_pixel(x + 9, y), Rgba([r, g, b, 255]));
}

#[test]
fn test_glyph_only_touches_its_box() {
    let glyphs = GlyphSource::builtin();
    let icon = render(96, &glyphs, &GlyphSpec::default());

    let mut background = RgbaImage::new(96, 96);
    fill_background(&mut background);

    let changed: Vec<(u32, u32)> = icon
        .enumerate_pixels()
        .filter(|(x, y, p)| background.get_pixel(*x, *y) != *p)
        .map(|(x, y, _)| (x, y))
        .collect();

    assert!(!changed.is_empty());
    // Font 48px, scale 4: ink box 20x28 centred at (38, 34)
    assert!(changed
        .iter()
        .all(|&(x, y)| (38..58).contains(&x) && (34..62).contains(&y)));
}

#[test]
fn test_custom_glyph_color() {
    let spec = GlyphSpec {
        text: "L".to_string(),
        color: Rgba([255, 0, 0, 255]),
    };
    let icon = render(48, &GlyphSource::builtin(), &spec);
    assert!(icon.pixels().any(|p| *p == Rgba([255, 0, 0, 255])));
    assert!(!icon.pixels().any(|p| *p == WHITE));
}

fn dejavu_sans() -> GlyphSource {
    GlyphSource::from_font_data(include_bytes!("fonts/DejaVuSans.ttf").to_vec())
        .expect("Failed to parse DejaVuSans.ttf")
}

#[test]
fn test_outline_font_ink_box_has_origin_offset() {
    let font = dejavu_sans();
    assert!(!font.is_builtin());

    // Side bearing and ascender gap keep the box away from the line origin
    let bbox = font.measure("L", 24).unwrap();
    assert_eq!(
        bbox,
        GlyphBox {
            min_x: 2,
            min_y: 4,
            max_x: 12,
            max_y: 20
        }
    );
}

#[test]
fn test_outline_draw_covers_exactly_the_ink_box() {
    let font = dejavu_sans();
    let bbox = font.measure("L", 24).unwrap();

    let mut plotted = Vec::new();
    font.draw("L", 24, (0, 0), |x, y, coverage| {
        assert!((0.0..=1.0).contains(&coverage));
        plotted.push((x, y, coverage));
    });

    assert_eq!(plotted.iter().map(|p| p.0).min(), Some(bbox.min_x));
    assert_eq!(plotted.iter().map(|p| p.1).min(), Some(bbox.min_y));
    assert_eq!(plotted.iter().map(|p| p.0).max(), Some(bbox.max_x - 1));
    assert_eq!(plotted.iter().map(|p| p.1).max(), Some(bbox.max_y - 1));
    assert!(plotted.iter().any(|p| p.2 == 1.0));
}

#[test]
fn test_outline_ink_lands_at_origin_plus_box_offset() {
    let font = dejavu_sans();
    let size = 48;
    let bbox = font.measure("L", size / 2).unwrap();
    let x = (size as i32 - bbox.width()).div_euclid(2);
    let y = (size as i32 - bbox.height()).div_euclid(2);
    assert_eq!((x, y), (19, 16));

    let icon = render(size, &font, &GlyphSpec::default());
    let mut background = RgbaImage::new(size, size);
    fill_background(&mut background);

    let ink_x = (x + bbox.min_x) as u32..(x + bbox.max_x) as u32;
    let ink_y = (y + bbox.min_y) as u32..(y + bbox.max_y) as u32;

    let mut changed = 0;
    for (px, py, pixel) in icon.enumerate_pixels() {
        if pixel != background.get_pixel(px, py) {
            changed += 1;
            assert!(
                ink_x.contains(&px) && ink_y.contains(&py),
                "ink at ({px}, {py}) outside {ink_x:?} x {ink_y:?}"
            );
        }
    }
    assert!(changed > 0);
}

#[test]
fn test_outline_white_glyph_near_center() {
    let font = dejavu_sans();
    let spec = GlyphSpec::default();

    for size in [16, 20, 24, 48, 72, 96, 144, 192] {
        let icon = render(size, &font, &spec);
        let (lo, hi) = (size / 4, size * 3 / 4);

        let found = (lo..=hi).any(|y| (lo..=hi).any(|x| *icon.get_pixel(x, y) == WHITE));
        assert!(found, "no white glyph pixel near the centre at size {size}");
    }
}

#[test]
fn test_outline_render_is_deterministic() {
    let font = dejavu_sans();
    let spec = GlyphSpec::default();
    assert_eq!(render(16, &font, &spec), render(16, &font, &spec));
    assert_eq!(render(144, &font, &spec), render(144, &font, &spec));
}
