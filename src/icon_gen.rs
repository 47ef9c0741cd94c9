use crate::density::{DensityTable, RES_DIR};
use crate::glyph::GlyphSource;
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, Rgba, RgbaImage,
};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

/// Default letter drawn on the icon
pub const DEFAULT_TEXT: &str = "L";

/// Default glyph colour (CSS syntax)
pub const DEFAULT_COLOR: &str = "#ffffff";

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

// Per-channel (base, slope) over the anti-diagonal index i + j
const RED_RAMP: (f64, f64) = (59.0, 0.1);
const GREEN_RAMP: (f64, f64) = (130.0, 0.05);
const BLUE_RAMP: (f64, f64) = (246.0, -0.2);

// Library-facing options; main.rs maps the CLI onto this
#[derive(Debug)]
pub struct Options {
    pub output: PathBuf,
    pub text: String,
    pub color: String,
    pub font: Option<PathBuf>,
    pub densities: DensityTable,
    pub round_mask: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            output: PathBuf::from("."),
            text: DEFAULT_TEXT.to_string(),
            color: DEFAULT_COLOR.to_string(),
            font: None,
            densities: DensityTable::default(),
            round_mask: false,
        }
    }
}

/// What to draw on top of the background
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSpec {
    pub text: String,
    pub color: Rgba<u8>,
}

impl Default for GlyphSpec {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            color: WHITE,
        }
    }
}

/// The two launcher icon files written per density
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Standard,
    Round,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Standard, Variant::Round];

    pub fn file_name(self) -> &'static str {
        match self {
            Variant::Standard => "ic_launcher.png",
            Variant::Round => "ic_launcher_round.png",
        }
    }
}

/// Parse a CSS colour, falling back to opaque white
pub fn parse_color(color: &str) -> Rgba<u8> {
    css_color::Srgb::from_str(color)
        .map(|color| {
            Rgba([
                (color.red * 255.) as u8,
                (color.green * 255.) as u8,
                (color.blue * 255.) as u8,
                255,
            ])
        })
        .unwrap_or(WHITE)
}

fn ramp_channel((base, slope): (f64, f64), k: f64) -> u8 {
    // `as` truncates toward zero; clamp afterwards
    ((base + k * slope) as i64).clamp(0, 255) as u8
}

/// Background colour at pixel (i, j): an affine function of i + j per channel
pub fn background_pixel(i: u32, j: u32) -> Rgba<u8> {
    let k = (u64::from(i) + u64::from(j)) as f64;
    Rgba([
        ramp_channel(RED_RAMP, k),
        ramp_channel(GREEN_RAMP, k),
        ramp_channel(BLUE_RAMP, k),
        255,
    ])
}

/// Overwrite every pixel of `img` with the diagonal background ramp
pub fn fill_background(img: &mut RgbaImage) {
    for (i, j, pixel) in img.enumerate_pixels_mut() {
        *pixel = background_pixel(i, j);
    }
}

fn blend(bg: u8, fg: u8, coverage: f32) -> u8 {
    let c = coverage.clamp(0.0, 1.0);
    (bg as f32 * (1.0 - c) + fg as f32 * c)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Draw the glyph text centred on `img` at half the image width.
///
/// Centering uses the ink bounding box, and the text is drawn with its line
/// box origin at the computed offset, so glyphs with side bearings or an
/// ascender gap sit slightly right of and below the exact centre.
pub fn overlay_glyph(img: &mut RgbaImage, glyphs: &GlyphSource, spec: &GlyphSpec) {
    let px = img.width() / 2;
    let Some(bbox) = glyphs.measure(&spec.text, px) else {
        return;
    };

    let (width, height) = (img.width() as i32, img.height() as i32);
    let x = (width - bbox.width()).div_euclid(2);
    let y = (height - bbox.height()).div_euclid(2);
    let color = spec.color;

    glyphs.draw(&spec.text, px, (x, y), |gx, gy, coverage| {
        if gx < 0 || gy < 0 || gx >= width || gy >= height {
            return;
        }
        let pixel = img.get_pixel_mut(gx as u32, gy as u32);
        for channel in 0..4 {
            pixel[channel] = blend(pixel[channel], color[channel], coverage);
        }
    });
}

/// Render one square launcher icon of `size` pixels
pub fn render(size: u32, glyphs: &GlyphSource, spec: &GlyphSpec) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(size, size, TRANSPARENT);
    fill_background(&mut img);
    overlay_glyph(&mut img, glyphs, spec);
    img
}

/// Apply a circular mask to an image to create a round icon
pub fn apply_circular_mask(img: &mut RgbaImage) {
    let width = img.width();
    let height = img.height();
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let radius = width.min(height) as f32 / 2.0;

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        // Sample at the pixel centre
        let dx = x as f32 + 0.5 - center_x;
        let dy = y as f32 + 0.5 - center_y;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance > radius {
            *pixel = TRANSPARENT;
        } else if distance > radius - 1.0 {
            // Anti-aliasing edge
            let alpha_factor = radius - distance;
            pixel[3] = (pixel[3] as f32 * alpha_factor) as u8;
        }
    }
}

/// Write `img` as an RGBA8 PNG, creating parent directories as needed
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)
            .with_context(|| format!("Can't create directory {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    write_png(img.as_raw(), &mut out_file, img.width(), img.height())
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    out_file
        .flush()
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    Ok(())
}

// Encode image data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, width: u32, height: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, width, height, ColorType::Rgba8)?;
    Ok(())
}

/// Generate `ic_launcher.png` and `ic_launcher_round.png` for every density.
///
/// Returns the written paths in generation order. The first failure aborts
/// the run and leaves earlier files in place.
pub fn generate_launcher_icons(opts: &Options) -> Result<Vec<PathBuf>> {
    let glyphs = GlyphSource::resolve(opts.font.as_deref());
    let spec = GlyphSpec {
        text: opts.text.clone(),
        color: parse_color(&opts.color),
    };
    let res_dir = opts.output.join(RES_DIR);

    println!("Generating Android launcher icons...");
    let mut written = Vec::with_capacity(opts.densities.len() * Variant::ALL.len());

    for density in opts.densities.entries() {
        log::debug!("Rendering {} at {}px", density.folder, density.size);
        let folder = res_dir.join(&density.folder);

        for variant in Variant::ALL {
            let mut icon = render(density.size, &glyphs, &spec);
            if variant == Variant::Round && opts.round_mask {
                apply_circular_mask(&mut icon);
            }

            let output_path = folder.join(variant.file_name());
            save_png(&icon, &output_path)?;

            let shown = output_path
                .strip_prefix(&opts.output)
                .unwrap_or(&output_path);
            println!("  ✓ Generated {}", shown.display());
            written.push(output_path);
        }
    }

    println!("✓ Generated {} launcher icons", written.len());
    Ok(written)
}
