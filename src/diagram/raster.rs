//! SVG to half-block terminal cells.
//!
//! Each terminal cell shows two vertically stacked pixels with `▀`: the
//! foreground paints the top pixel, the background the bottom one.

use std::sync::{Arc, LazyLock};

use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{self, fontdb};
use thiserror::Error;

use crate::document::InlineColor;

static FONTDB: LazyLock<Arc<fontdb::Database>> = LazyLock::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
});

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("invalid svg: {0}")]
    Parse(#[from] usvg::Error),
    #[error("svg has no drawable area")]
    EmptySize,
    #[error("failed to allocate {0}x{1} pixmap")]
    Pixmap(u32, u32),
}

/// One terminal cell: top and bottom pixel colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfCell {
    pub top: InlineColor,
    pub bottom: InlineColor,
}

/// A rasterized diagram, one `Vec<HalfCell>` per terminal row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub rows: Vec<Vec<HalfCell>>,
}

impl Raster {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// Rasterize `svg` to fit `max_cols` columns and at most `max_rows` rows,
/// keeping the aspect ratio.
///
/// # Errors
///
/// Returns an error if the SVG cannot be parsed or has no area.
pub fn rasterize(svg: &str, max_cols: u16, max_rows: usize) -> Result<Raster, RasterError> {
    let svg = fix_svg_font_families(svg);
    let opts = usvg::Options {
        fontdb: Arc::clone(&FONTDB),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&svg, &opts)?;
    let size = tree.size();
    if size.width() <= 0.0 || size.height() <= 0.0 || max_cols == 0 || max_rows == 0 {
        return Err(RasterError::EmptySize);
    }

    #[allow(clippy::cast_precision_loss)]
    let max_height_px = (max_rows * 2) as f32;
    let scale = (f32::from(max_cols) / size.width()).min(max_height_px / size.height());

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let width = ((size.width() * scale).round() as u32).max(1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let height = ((size.height() * scale).round() as u32).max(1);
    // Even height so every row has a bottom pixel.
    let height = height + height % 2;

    let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::Pixmap(width, height))?;
    pixmap.fill(Color::WHITE);
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    let pixel = |x: u32, y: u32| {
        pixmap.pixel(x, y).map_or(
            InlineColor {
                r: 255,
                g: 255,
                b: 255,
            },
            |p| {
                let c = p.demultiply();
                InlineColor {
                    r: c.red(),
                    g: c.green(),
                    b: c.blue(),
                }
            },
        )
    };

    let rows = (0..height)
        .step_by(2)
        .map(|y| {
            (0..width)
                .map(|x| HalfCell {
                    top: pixel(x, y),
                    bottom: pixel(x, y + 1),
                })
                .collect()
        })
        .collect();

    Ok(Raster { rows })
}

/// Replace unescaped double quotes inside `font-family` attributes.
///
/// Some mermaid builds emit values like `font-family="Inter, "Segoe UI", sans"`
/// which is not valid XML. Inner quotes become single quotes.
fn fix_svg_font_families(svg: &str) -> String {
    const MARKER: &str = "font-family=\"";
    let mut result = String::with_capacity(svg.len());
    let mut rest = svg;

    while let Some(pos) = rest.find(MARKER) {
        result.push_str(&rest[..pos + MARKER.len()]);
        rest = &rest[pos + MARKER.len()..];

        // The closing quote is the one followed by `>`, ` `, `/` or the end.
        let mut end_offset = rest.len();
        for (i, ch) in rest.char_indices() {
            if ch != '"' {
                result.push(ch);
                continue;
            }
            let after = rest[i + 1..].chars().next();
            if matches!(after, None | Some('>' | ' ' | '/')) {
                result.push('"');
                end_offset = i + 1;
                break;
            }
            result.push('\'');
        }
        rest = &rest[end_offset..];
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20"><rect x="0" y="0" width="20" height="10" fill="#000000"/></svg>"##;

    #[test]
    fn test_fix_svg_font_families_handles_multibyte_after_inner_quote() {
        let input = r#"<text font-family="Noto, "字体", sans-serif" font-size="14">"#;
        assert_eq!(
            fix_svg_font_families(input),
            r#"<text font-family="Noto, '字体', sans-serif" font-size="14">"#
        );
    }

    #[test]
    fn test_fix_svg_font_families_replaces_inner_quotes() {
        let input = r#"<text font-family="Inter, "Segoe UI", sans-serif" font-size="14">"#;
        assert_eq!(
            fix_svg_font_families(input),
            r#"<text font-family="Inter, 'Segoe UI', sans-serif" font-size="14">"#
        );
    }

    #[test]
    fn test_fix_svg_font_families_no_op_when_clean() {
        let input = r#"<text font-family="Inter, sans-serif" font-size="14">"#;
        assert_eq!(fix_svg_font_families(input), input);
    }

    #[test]
    fn test_rasterize_fits_width_and_paints_halves() {
        let raster = rasterize(SQUARE, 10, 40).unwrap();
        assert_eq!(raster.width(), 10);
        assert_eq!(raster.height(), 5);

        let black = InlineColor { r: 0, g: 0, b: 0 };
        let white = InlineColor {
            r: 255,
            g: 255,
            b: 255,
        };
        assert_eq!(raster.rows[0][0].top, black);
        assert_eq!(raster.rows[4][0].bottom, white);
    }

    #[test]
    fn test_rasterize_respects_row_cap() {
        let raster = rasterize(SQUARE, 200, 4).unwrap();
        assert_eq!(raster.height(), 4);
        assert_eq!(raster.width(), 8);
    }

    #[test]
    fn test_rasterize_rejects_garbage() {
        assert!(matches!(
            rasterize("not an svg", 10, 10),
            Err(RasterError::Parse(_))
        ));
    }
}
