//! Parrot/neon theme tokens for the breadth dashboard.
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (primary highlights, focus)
//! - **Positive**: Neon green (strong breadth)
//! - **Negative**: Hot pink (weak breadth, errors)
//! - **Warning**: Neon orange (alerts, fallback lists)
//! - **Neutral**: Cool purple (secondary info)
//! - **Muted**: Steel blue (disabled, secondary text)

use breadth_core::domain::{BreadthLevel, MaWindow};
use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_PRIMARY: Color = Color::White;

/// Palette bundle, for code that wants to pass the colours around.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: BACKGROUND,
            accent: ACCENT,
            positive: POSITIVE,
            negative: NEGATIVE,
            warning: WARNING,
            neutral: NEUTRAL,
            muted: MUTED,
            text_primary: TEXT_PRIMARY,
        }
    }

    /// Cell colour for a breadth level: strong green, weak pink.
    pub fn level_color(&self, level: BreadthLevel) -> Color {
        match level {
            BreadthLevel::Strong => self.positive,
            BreadthLevel::Weak => self.negative,
            BreadthLevel::Neutral => self.text_primary,
        }
    }

    /// Line colour per moving-average window.
    pub fn series_color(&self, window: MaWindow) -> Color {
        match window {
            MaWindow::Ma20 => self.accent,
            MaWindow::Ma50 => self.warning,
            MaWindow::Ma200 => self.neutral,
        }
    }
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn text() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn header() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn selected_row() -> Style {
    Style::default().bg(Color::Rgb(40, 40, 48)).add_modifier(Modifier::BOLD)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT)
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

pub fn level_style(level: BreadthLevel) -> Style {
    let theme = Theme::default();
    let style = Style::default().fg(theme.level_color(level));
    match level {
        BreadthLevel::Neutral => style,
        _ => style.add_modifier(Modifier::BOLD),
    }
}

pub fn series_style(window: MaWindow) -> Style {
    Style::default().fg(Theme::default().series_color(window))
}
