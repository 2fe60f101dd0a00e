//! Colors and text styles for the form and result screens.
//!
//! The palette is built around the two prediction outcomes: rose marks a
//! positive result (and form errors), emerald a negative one. Everything else
//! is teal accents on slate text so the outcome color stands out.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::Outcome;

const fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Medical theme color palette.
pub struct MedicalTheme;

impl MedicalTheme {
    /// Positive outcome and errors (#F43F5E)
    pub const POSITIVE: Color = rgb(Outcome::Positive.color());
    /// Negative outcome (#10B981)
    pub const NEGATIVE: Color = rgb(Outcome::Negative.color());

    /// Teal accent for focus and key hints (#2DD4BF)
    pub const ACCENT: Color = Color::Rgb(45, 212, 191);
    /// Darker teal for the focused border (#0D9488)
    pub const ACCENT_DARK: Color = Color::Rgb(13, 148, 136);

    /// Slate shades, lightest first
    pub const INK: Color = Color::Rgb(248, 250, 252);
    pub const INK_SOFT: Color = Color::Rgb(148, 163, 184);
    pub const INK_FAINT: Color = Color::Rgb(100, 116, 139);

    fn fg(color: Color) -> Style {
        Style::default().fg(color)
    }

    /// Style for one prediction outcome.
    #[must_use]
    pub fn outcome(outcome: Outcome) -> Style {
        match outcome {
            Outcome::Positive => Self::fg(Self::POSITIVE),
            Outcome::Negative => Self::fg(Self::NEGATIVE),
        }
    }

    /// Form errors share the positive-outcome color.
    #[must_use]
    pub fn danger() -> Style {
        Self::outcome(Outcome::Positive)
    }

    #[must_use]
    pub fn title() -> Style {
        Self::fg(Self::INK).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Self::fg(Self::ACCENT).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Self::fg(Self::INK)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Self::fg(Self::INK_SOFT)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Self::fg(Self::INK_FAINT)
    }

    /// Focused field title
    #[must_use]
    pub fn focused() -> Style {
        Self::subtitle()
    }

    /// Input cursor in the focused field
    #[must_use]
    pub fn cursor() -> Style {
        Self::fg(Self::ACCENT).add_modifier(Modifier::SLOW_BLINK)
    }

    #[must_use]
    pub fn border() -> Style {
        Self::fg(Self::INK_SOFT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Self::fg(Self::ACCENT_DARK)
    }

    /// `[Key]` part of a footer hint
    #[must_use]
    pub fn key_hint() -> Style {
        Self::subtitle()
    }

    /// Description part of a footer hint
    #[must_use]
    pub fn key_desc() -> Style {
        Self::text_secondary()
    }
}
