//! Colour roles for the table UI.
//! Defaults are a Catppuccin-like palette; any role can be overridden from
//! the `[theme]` section of the config with a hex colour.

use ratatui::style::Color;

use crate::config::ThemeConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub accent: Color,       // Focused borders, key hints, sort indicator
    pub danger: Color,       // Delete prompts, errors
    pub success: Color,      // Checked boxes
    pub text: Color,
    pub text_dim: Color,
    pub bg_selected: Color,  // Cursor row background
    pub inactive: Color,     // Unfocused borders
    pub header: Color,       // Column headers
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(243, 139, 168),
        }
    }
}

impl Theme {
    /// Defaults with the configured overrides applied.
    /// A value that isn't a valid hex colour keeps the default for that role.
    pub fn from_config(config: &ThemeConfig) -> Self {
        let base = Self::default();
        let pick = |value: &Option<String>, fallback: Color| {
            value
                .as_deref()
                .and_then(|s| {
                    let color = parse_hex_color(s);
                    if color.is_none() {
                        tracing::warn!("Ignoring invalid theme colour {:?}", s);
                    }
                    color
                })
                .unwrap_or(fallback)
        };

        Self {
            accent: pick(&config.accent, base.accent),
            danger: pick(&config.danger, base.danger),
            success: pick(&config.success, base.success),
            text: pick(&config.text, base.text),
            text_dim: pick(&config.text_dim, base.text_dim),
            bg_selected: pick(&config.bg_selected, base.bg_selected),
            inactive: pick(&config.inactive, base.inactive),
            header: pick(&config.header, base.header),
        }
    }
}

/// Parse a hex color string (#RRGGBB or #RGB)
fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim().trim_start_matches('#');
    if !s.is_ascii() {
        return None;
    }

    if s.len() == 6 {
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
        let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
        let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
        Some(Color::Rgb(r, g, b))
    } else {
        None
    }
}
