//! Colors for rendered markdown.
//!
//! Uses ANSI colors that adapt to the terminal's palette. Inline colors
//! carried by spans (diagram rasters) fall back to the xterm 256 cube when
//! the terminal lacks truecolor.

use ratatui::style::{Color, Modifier, Style};

use crate::document::{InlineColor, InlineStyle, LineType};

/// Get the style for a given line type.
pub fn style_for_line_type(line_type: &LineType) -> Style {
    match line_type {
        // Headings - bold with distinct colors per level
        LineType::Heading(1) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineType::Heading(2) => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        LineType::Heading(3) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        LineType::Heading(4) => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        LineType::Heading(5) => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        LineType::Heading(_) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),

        LineType::CodeBlock => Style::default()
            .fg(Color::Indexed(245))
            .add_modifier(Modifier::DIM),

        LineType::BlockQuote => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::ITALIC),

        LineType::HorizontalRule => Style::default()
            .fg(Color::Indexed(240))
            .add_modifier(Modifier::DIM),

        LineType::Image => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::ITALIC),

        // Placeholder and fallback text; raster cells bring their own colors
        LineType::Diagram => Style::default().fg(Color::Indexed(245)),

        LineType::DiagramError => Style::default().fg(Color::LightRed),

        LineType::ListItem(_) | LineType::Table | LineType::Paragraph | LineType::Empty => {
            Style::default()
        }
    }
}

/// Get the style for an inline span, merged with a base line style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let mut style = base;

    if let Some(fg) = inline.fg {
        style = style
            .fg(color_for_terminal(fg))
            .remove_modifier(Modifier::DIM);
    }
    if let Some(bg) = inline.bg {
        style = style.bg(color_for_terminal(bg));
    }

    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style.add_modifier(Modifier::UNDERLINED);
        if inline.fg.is_none() {
            style = style.fg(Color::LightBlue);
        }
    }
    if inline.code && inline.fg.is_none() {
        style = style.fg(Color::Red).add_modifier(Modifier::BOLD);
    }

    style
}

fn color_for_terminal(color: InlineColor) -> Color {
    if supports_truecolor() {
        Color::Rgb(color.r, color.g, color.b)
    } else {
        Color::Indexed(rgb_to_xterm_256(color.r, color.g, color.b))
    }
}

fn supports_truecolor() -> bool {
    if let Ok(force) = std::env::var("SPLITMARK_TRUECOLOR") {
        let value = force.to_ascii_lowercase();
        return matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    if let Some(ct) = colorterm {
        let lower = ct.to_ascii_lowercase();
        if lower.contains("truecolor") || lower.contains("24bit") {
            return true;
        }
    }
    if let Some(t) = term {
        let lower = t.to_ascii_lowercase();
        if lower.contains("direct") || lower.contains("truecolor") {
            return true;
        }
    }
    false
}

fn rgb_to_xterm_256(r: u8, g: u8, b: u8) -> u8 {
    // Result is always 0-5, fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let to_cube = |v: u8| ((u16::from(v) * 5) / 255) as u8;
    let ri = to_cube(r);
    let gi = to_cube(g);
    let bi = to_cube(b);
    16 + (36 * ri) + (6 * gi) + bi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_styles_are_bold() {
        for level in 1..=6 {
            let style = style_for_line_type(&LineType::Heading(level));
            assert!(style.add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn test_h1_is_underlined() {
        let style = style_for_line_type(&LineType::Heading(1));
        assert!(style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_diagram_error_is_red() {
        let style = style_for_line_type(&LineType::DiagramError);
        assert_eq!(style.fg, Some(Color::LightRed));
    }

    #[test]
    fn test_inline_color_removes_dim_modifier() {
        let base = Style::default().add_modifier(Modifier::DIM);
        let inline = InlineStyle {
            fg: Some(InlineColor { r: 255, g: 0, b: 0 }),
            ..InlineStyle::default()
        };

        let styled = style_for_inline(base, inline);
        assert!(!styled.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_inline_background_is_applied() {
        let inline = InlineStyle {
            bg: Some(InlineColor { r: 0, g: 0, b: 0 }),
            ..InlineStyle::default()
        };
        let styled = style_for_inline(Style::default(), inline);
        assert!(styled.bg.is_some());
    }

    #[test]
    fn test_truecolor_detection_without_colorterm() {
        assert!(!supports_truecolor_from_env(None, Some("xterm-256color")));
    }

    #[test]
    fn test_truecolor_detection_with_colorterm() {
        assert!(supports_truecolor_from_env(
            Some("truecolor"),
            Some("xterm-256color")
        ));
    }

    #[test]
    fn test_fallback_indexed_color_when_not_truecolor() {
        let idx = rgb_to_xterm_256(255, 0, 0);
        assert_eq!(idx, 196);
    }
}
