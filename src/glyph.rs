//! Glyph sources used to draw the icon letter
//!
//! A [`GlyphSource`] is either an outline font found on the host (preferred)
//! or the small bitmap font compiled into the binary. Resolution never fails:
//! anything that goes wrong while locating or parsing the outline font
//! collapses to the bitmap font.

use rusttype::{point, Font, PositionedGlyph, Scale};
use std::path::{Path, PathBuf};

/// File names tried, in order, when looking for the preferred typeface.
pub const PREFERRED_FONT_NAMES: [&str; 2] = ["arial.ttf", "Arial.ttf"];

const MAX_FONT_DIR_DEPTH: usize = 4;

/// Ink bounding box of laid-out text, in pixels relative to the line origin.
/// `min` is inclusive, `max` exclusive. The origin is the top-left corner of
/// the line box, so `min_y` is the distance from the ascender line to the ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl GlyphBox {
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    fn union(self, other: GlyphBox) -> GlyphBox {
        GlyphBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Something that can measure and rasterize a line of text
pub enum GlyphSource {
    /// A TrueType/OpenType font loaded from disk
    Outline(Font<'static>),
    /// The built-in 5x7 bitmap font
    Bitmap(BitmapFont),
}

impl GlyphSource {
    /// Resolve the font to draw with.
    ///
    /// An explicit path is tried first, then [`PREFERRED_FONT_NAMES`] in the
    /// platform font directories. Falls back to [`BitmapFont`].
    pub fn resolve(explicit: Option<&Path>) -> GlyphSource {
        if let Some(path) = explicit {
            match load_outline_font(path) {
                Some(font) => {
                    log::debug!("Using font {}", path.display());
                    return GlyphSource::Outline(font);
                }
                None => log::warn!(
                    "Could not load font {}, falling back to the built-in font",
                    path.display()
                ),
            }
        }

        let found = font_dirs()
            .iter()
            .find_map(|dir| find_font_file(dir, &PREFERRED_FONT_NAMES, MAX_FONT_DIR_DEPTH))
            .and_then(|path| load_outline_font(&path).map(|font| (path, font)));

        match found {
            Some((path, font)) => {
                log::debug!("Using font {}", path.display());
                GlyphSource::Outline(font)
            }
            None => {
                log::debug!("No outline font found, using the built-in bitmap font");
                GlyphSource::Bitmap(BitmapFont)
            }
        }
    }

    /// Outline font from raw TrueType/OpenType data
    pub fn from_font_data(data: Vec<u8>) -> Option<GlyphSource> {
        Font::try_from_vec(data).map(GlyphSource::Outline)
    }

    /// The built-in bitmap font, independent of the host
    pub fn builtin() -> GlyphSource {
        GlyphSource::Bitmap(BitmapFont)
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, GlyphSource::Bitmap(_))
    }

    /// Ink bounding box of `text` at `px` pixels, or `None` if nothing is drawn.
    pub fn measure(&self, text: &str, px: u32) -> Option<GlyphBox> {
        match self {
            GlyphSource::Outline(font) => layout(font, text, px)
                .iter()
                .filter_map(|glyph| glyph.pixel_bounding_box())
                .map(|bb| GlyphBox {
                    min_x: bb.min.x,
                    min_y: bb.min.y,
                    max_x: bb.max.x,
                    max_y: bb.max.y,
                })
                .reduce(GlyphBox::union),
            GlyphSource::Bitmap(font) => font.measure(text, px),
        }
    }

    /// Rasterize `text` with its line box origin at `origin`.
    ///
    /// `plot` receives absolute pixel coordinates (possibly negative or past
    /// the target) and a coverage value in `0.0..=1.0`. Outline coverage is
    /// scaled so the most covered pixel reaches 1.0.
    pub fn draw<F>(&self, text: &str, px: u32, origin: (i32, i32), mut plot: F)
    where
        F: FnMut(i32, i32, f32),
    {
        match self {
            GlyphSource::Outline(font) => {
                let mut cells = Vec::new();
                for glyph in layout(font, text, px) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        glyph.draw(|gx, gy, coverage| {
                            cells.push((
                                origin.0 + bb.min.x + gx as i32,
                                origin.1 + bb.min.y + gy as i32,
                                coverage,
                            ))
                        });
                    }
                }

                // Unhinted stems can straddle pixels at small sizes and never
                // reach full coverage; stretch so the densest pixel is solid.
                let peak = cells.iter().map(|&(_, _, c)| c).fold(0.0f32, f32::max);
                if peak <= 0.0 {
                    return;
                }
                for (x, y, coverage) in cells {
                    plot(x, y, (coverage / peak).min(1.0));
                }
            }
            GlyphSource::Bitmap(font) => font.draw(text, px, origin, plot),
        }
    }
}

fn layout<'a>(font: &'a Font<'static>, text: &str, px: u32) -> Vec<PositionedGlyph<'a>> {
    if px == 0 {
        return Vec::new();
    }
    let scale = Scale::uniform(px as f32);
    let ascent = font.v_metrics(scale).ascent;
    font.layout(text, scale, point(0.0, ascent)).collect()
}

fn load_outline_font(path: &Path) -> Option<Font<'static>> {
    let data = std::fs::read(path).ok()?;
    Font::try_from_vec(data)
}

/// Font directories for the current platform, most specific first
fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let home = std::env::var_os("HOME").map(PathBuf::from);

    if cfg!(target_os = "windows") {
        let windir = std::env::var_os("WINDIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(r"C:\Windows"));
        dirs.push(windir.join("Fonts"));
        if let Some(local) = std::env::var_os("LOCALAPPDATA") {
            dirs.push(PathBuf::from(local).join(r"Microsoft\Windows\Fonts"));
        }
    } else if cfg!(target_os = "macos") {
        if let Some(home) = &home {
            dirs.push(home.join("Library/Fonts"));
        }
        dirs.push(PathBuf::from("/Library/Fonts"));
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/System/Library/Fonts/Supplemental"));
    } else {
        if let Some(home) = &home {
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join(".fonts"));
        }
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        dirs.push(PathBuf::from("/usr/share/fonts"));
    }

    dirs
}

/// Depth-limited search for the first file whose name matches one of `names`
fn find_font_file(dir: &Path, names: &[&str], depth: usize) -> Option<PathBuf> {
    for name in names {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    if depth == 0 {
        return None;
    }

    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();

    subdirs
        .iter()
        .find_map(|sub| find_font_file(sub, names, depth - 1))
}

const BITMAP_COLS: i32 = 5;
const BITMAP_ROWS: i32 = 7;
const BITMAP_ADVANCE: i32 = BITMAP_COLS + 1;

/// Minimal 5x7 bitmap font covering A-Z and 0-9.
///
/// Lowercase letters are drawn as uppercase. Other characters advance the
/// pen without drawing anything. Cells are scaled by an integer factor.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFont;

impl BitmapFont {
    /// Integer scale factor for a requested pixel size
    pub fn scale_for(px: u32) -> i32 {
        (px / 10).max(1) as i32
    }

    fn rows(c: char) -> Option<[u8; 7]> {
        let rows = match c.to_ascii_uppercase() {
            'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
            'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
            'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
            'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
            'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
            'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
            'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
            'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
            'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
            'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
            'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
            'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
            'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
            'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
            'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
            'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
            'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
            'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
            'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
            'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
            'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
            'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
            'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
            'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
            'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
            'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
            '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
            '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
            '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
            '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
            '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
            '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
            '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
            '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
            '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
            '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
            _ => return None,
        };
        Some(rows)
    }

    /// Visit every lit cell of `text` as (column, row) in unscaled font units
    fn for_each_cell<F: FnMut(i32, i32)>(text: &str, mut visit: F) {
        for (index, c) in text.chars().enumerate() {
            let Some(rows) = Self::rows(c) else {
                continue;
            };
            let pen = index as i32 * BITMAP_ADVANCE;
            for (row, bits) in (0..BITMAP_ROWS).zip(rows) {
                for col in 0..BITMAP_COLS {
                    if bits & (0x10 >> col) != 0 {
                        visit(pen + col, row);
                    }
                }
            }
        }
    }

    pub fn measure(&self, text: &str, px: u32) -> Option<GlyphBox> {
        if px == 0 {
            return None;
        }
        let scale = Self::scale_for(px);
        let mut bbox: Option<GlyphBox> = None;
        Self::for_each_cell(text, |col, row| {
            let cell = GlyphBox {
                min_x: col * scale,
                min_y: row * scale,
                max_x: (col + 1) * scale,
                max_y: (row + 1) * scale,
            };
            bbox = Some(bbox.map_or(cell, |b| b.union(cell)));
        });
        bbox
    }

    pub fn draw<F>(&self, text: &str, px: u32, origin: (i32, i32), mut plot: F)
    where
        F: FnMut(i32, i32, f32),
    {
        if px == 0 {
            return;
        }
        let scale = Self::scale_for(px);
        Self::for_each_cell(text, |col, row| {
            for dy in 0..scale {
                for dx in 0..scale {
                    plot(
                        origin.0 + col * scale + dx,
                        origin.1 + row * scale + dy,
                        1.0,
                    );
                }
            }
        });
    }
}
