use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownTheme;
use crate::pdf::Color;

/// Visual style of a rendered document.
///
/// Themes differ only in layout and colors; every theme shows the same
/// [`DocumentView`](crate::contract::DocumentView).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Purple and pink accents.
    #[default]
    Classic,
    /// Teal header band, parties side by side.
    Modern,
    /// Amber and orange, serif type.
    Elegant,
    /// Indigo background, light text.
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Classic, Theme::Modern, Theme::Elegant, Theme::Dark];

    /// Stable identifier (`"classic"`, …).
    pub fn id(&self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Modern => "modern",
            Theme::Elegant => "elegant",
            Theme::Dark => "dark",
        }
    }

    /// Name shown in the theme picker.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Classic => "Classique",
            Theme::Modern => "Moderne",
            Theme::Elegant => "Élégant",
            Theme::Dark => "Personnalisé",
        }
    }

    /// Colors used by both the preview and the exporter.
    pub fn palette(&self) -> Palette {
        match self {
            Theme::Classic => Palette {
                accent: Color::from_rgb8(128, 0, 128),
                accent_alt: Color::from_rgb8(219, 39, 119),
                tint: Color::from_rgb8(245, 240, 255),
                page: Color::from_rgb8(255, 255, 255),
                text: Color::from_rgb8(0, 0, 0),
                muted: Color::from_rgb8(100, 100, 100),
                header_text: Color::from_rgb8(255, 255, 255),
            },
            Theme::Modern => Palette {
                accent: Color::from_rgb8(0, 128, 128),
                accent_alt: Color::from_rgb8(16, 150, 72),
                tint: Color::from_rgb8(240, 255, 240),
                page: Color::from_rgb8(255, 255, 255),
                text: Color::from_rgb8(0, 0, 0),
                muted: Color::from_rgb8(100, 100, 100),
                header_text: Color::from_rgb8(255, 255, 255),
            },
            Theme::Elegant => Palette {
                accent: Color::from_rgb8(255, 191, 0),
                accent_alt: Color::from_rgb8(255, 69, 0),
                tint: Color::from_rgb8(255, 248, 225),
                page: Color::from_rgb8(255, 255, 255),
                text: Color::from_rgb8(0, 0, 0),
                muted: Color::from_rgb8(100, 100, 100),
                header_text: Color::from_rgb8(0, 0, 0),
            },
            Theme::Dark => Palette {
                accent: Color::from_rgb8(65, 105, 225),
                accent_alt: Color::from_rgb8(135, 206, 250),
                tint: Color::from_rgb8(25, 25, 150),
                page: Color::from_rgb8(25, 25, 112),
                text: Color::from_rgb8(255, 255, 255),
                muted: Color::from_rgb8(200, 200, 255),
                header_text: Color::from_rgb8(255, 255, 255),
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Theme {
    type Err = UnknownTheme;

    /// Accepts theme ids and the legacy `template1`..`template4` names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" | "template1" => Ok(Theme::Classic),
            "modern" | "template2" => Ok(Theme::Modern),
            "elegant" | "template3" => Ok(Theme::Elegant),
            "dark" | "template4" => Ok(Theme::Dark),
            _ => Err(UnknownTheme(s.to_string())),
        }
    }
}

/// A theme's colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Titles, header bands, table headers.
    pub accent: Color,
    /// Secondary highlights.
    pub accent_alt: Color,
    /// Light fill behind blocks and alternate table rows.
    pub tint: Color,
    /// Page background.
    pub page: Color,
    /// Body text.
    pub text: Color,
    /// Secondary text (dates, labels).
    pub muted: Color,
    /// Text drawn on `accent` fills.
    pub header_text: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_and_legacy_names() {
        assert_eq!("classic".parse::<Theme>().unwrap(), Theme::Classic);
        assert_eq!("template2".parse::<Theme>().unwrap(), Theme::Modern);
        assert_eq!(" Elegant ".parse::<Theme>().unwrap(), Theme::Elegant);
        assert_eq!("template4".parse::<Theme>().unwrap(), Theme::Dark);
        let err = "neon".parse::<Theme>().unwrap_err();
        assert_eq!(err, UnknownTheme("neon".to_string()));
        assert_eq!(err.to_string(), "unknown theme: neon");
    }

    #[test]
    fn id_round_trips() {
        for theme in Theme::ALL {
            assert_eq!(theme.id().parse::<Theme>().unwrap(), theme);
        }
    }
}
