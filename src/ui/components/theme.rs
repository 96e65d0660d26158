//! Color palettes for the search bar and its suggestion panel.
//!
//! Neutral surfaces with a single teal accent for focus and the highlighted
//! row. Prices get their own green so they read apart from manufacturer text.

use ratatui::style::{Color, Modifier, Style};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemePalette {
    pub bg: Color,
    pub fg: Color,
    /// Suggestion panel background.
    pub surface: Color,
    /// Highlighted row background.
    pub row_highlight: Color,
    /// Manufacturer, salts, placeholders, recent entries.
    pub hint: Color,
    pub border: Color,
    /// Border of the focused input.
    pub focus: Color,
    pub accent: Color,
    pub price: Color,
    pub error: Color,
}

impl ThemePalette {
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(17, 24, 28),
            fg: Color::Rgb(221, 230, 232),
            surface: Color::Rgb(28, 38, 44),
            row_highlight: Color::Rgb(34, 58, 62),
            hint: Color::Rgb(128, 148, 156),
            border: Color::Rgb(52, 68, 76),
            focus: Color::Rgb(72, 184, 168),
            accent: Color::Rgb(86, 204, 186),
            price: Color::Rgb(132, 204, 120),
            error: Color::Rgb(240, 110, 110),
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(248, 250, 250),
            fg: Color::Rgb(28, 36, 40),
            surface: Color::Rgb(236, 242, 242),
            row_highlight: Color::Rgb(214, 236, 232),
            hint: Color::Rgb(96, 110, 116),
            border: Color::Rgb(200, 212, 214),
            focus: Color::Rgb(0, 128, 118),
            accent: Color::Rgb(0, 118, 108),
            price: Color::Rgb(30, 120, 60),
            error: Color::Rgb(190, 40, 50),
        }
    }

    /// The other palette, for the F2 toggle.
    pub fn toggled(self) -> Self {
        if self == Self::dark() {
            Self::light()
        } else {
            Self::dark()
        }
    }

    pub fn title(self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn hint_style(self) -> Style {
        Style::default().fg(self.hint)
    }

    pub fn border_style(self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focus_style(self) -> Style {
        Style::default().fg(self.focus)
    }

    pub fn surface_style(self) -> Style {
        Style::default().bg(self.surface).fg(self.fg)
    }

    pub fn selected_style(self) -> Style {
        Style::default()
            .bg(self.row_highlight)
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn price_style(self) -> Style {
        Style::default().fg(self.price)
    }
}

/// Footer legend style.
pub fn kbd_style(palette: ThemePalette) -> Style {
    Style::default().fg(palette.accent)
}

fn rgb(color: Color) -> (u8, u8, u8) {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Black => (0, 0, 0),
        Color::White => (255, 255, 255),
        Color::DarkGray => (64, 64, 64),
        _ => (128, 128, 128),
    }
}

/// WCAG 2.1 relative luminance in `0.0..=1.0`. Named terminal colors other
/// than black, white and dark gray count as mid gray.
pub fn relative_luminance(color: Color) -> f64 {
    let channel = |v: u8| {
        let s = f64::from(v) / 255.0;
        if s <= 0.04045 {
            s / 12.92
        } else {
            ((s + 0.055) / 1.055).powf(2.4)
        }
    };
    let (r, g, b) = rgb(color);
    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// WCAG contrast ratio between two colors, `1.0..=21.0`.
pub fn contrast_ratio(a: Color, b: Color) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}
