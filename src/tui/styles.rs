//! Dark cardiology theme.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::RiskCategory;

const fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Color palette and preset styles.
pub struct CardioTheme;

impl CardioTheme {
    // === Accent ===

    /// Signal red - primary accent (action button, selected tab)
    pub const ACCENT: Color = Color::Rgb(230, 57, 70); // #E63946

    /// Lighter red for highlights
    pub const ACCENT_LIGHT: Color = Color::Rgb(255, 77, 77); // #FF4D4D

    /// Gradient end of the title
    pub const ACCENT_PINK: Color = Color::Rgb(255, 65, 108); // #FF416C

    // === Outcome ===

    pub const CRITICAL: Color = rgb(RiskCategory::Critical.color());
    pub const STABLE: Color = rgb(RiskCategory::Stable.color());
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24
    pub const INFO: Color = Color::Rgb(88, 166, 255); // #58A6FF

    // === Surfaces ===

    pub const BG_SIDEBAR: Color = Color::Rgb(10, 12, 16); // #0A0C10
    pub const BG_CARD: Color = Color::Rgb(22, 27, 34); // #161B22
    pub const BORDER: Color = Color::Rgb(48, 54, 61); // #30363D

    // === Text ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(255, 255, 255);
    pub const TEXT_SECONDARY: Color = Color::Rgb(201, 209, 217); // #C9D1D9
    pub const TEXT_MUTED: Color = Color::Rgb(139, 148, 158); // #8B949E
    pub const TEXT_DIM: Color = Color::Rgb(72, 79, 88); // #484F58

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT_PINK)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn text_dim() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::STABLE)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::CRITICAL)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Selected tab
    #[must_use]
    pub fn tab_selected() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Focused field label
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::ACCENT_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    #[must_use]
    pub fn card() -> Style {
        Style::default().bg(Self::BG_CARD)
    }

    #[must_use]
    pub fn sidebar() -> Style {
        Style::default().bg(Self::BG_SIDEBAR)
    }

    /// Analyze call-to-action
    #[must_use]
    pub fn button() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::ACCENT_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    /// Outcome color of a risk category.
    #[must_use]
    pub fn category(category: RiskCategory) -> Style {
        Style::default().fg(rgb(category.color()))
    }

    /// Recommendation banner for a risk category.
    #[must_use]
    pub fn recommendation(category: RiskCategory) -> Style {
        match category {
            RiskCategory::Critical => Self::warning(),
            RiskCategory::Stable => Self::success(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_styles_share_outcome_colors() {
        assert_eq!(
            CardioTheme::category(RiskCategory::Critical),
            CardioTheme::danger()
        );
        assert_eq!(
            CardioTheme::category(RiskCategory::Stable),
            CardioTheme::success()
        );
        assert_eq!(CardioTheme::CRITICAL, Color::Rgb(255, 75, 43));
    }
}
