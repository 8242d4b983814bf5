//! Light and dark colour palettes

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Composites this colour at `alpha` over `background`.
    pub fn blend(self, background: Rgb, alpha: f64) -> Rgb {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f64 * alpha + bg as f64 * (1.0 - alpha)).round() as u8;
        Rgb(
            mix(self.0, background.0),
            mix(self.1, background.1),
            mix(self.2, background.2),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub success: Rgb,
    pub error: Rgb,
    pub background: Rgb,
    pub surface: Rgb,
    pub text: Rgb,
    pub text_secondary: Rgb,
    pub chart_line: Rgb,
    pub chart_fill: Rgb,
    pub grid: Rgb,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn palette(self) -> Palette {
        let primary = Rgb(0x19, 0x76, 0xd2);
        let secondary = Rgb(0xdc, 0x00, 0x4e);
        match self {
            Theme::Light => {
                let background = Rgb(0xff, 0xff, 0xff);
                let chart_line = Rgb(75, 192, 192);
                Palette {
                    primary,
                    secondary,
                    success: Rgb(0x2e, 0x7d, 0x32),
                    error: Rgb(0xd3, 0x2f, 0x2f),
                    background,
                    surface: Rgb(0xff, 0xff, 0xff),
                    text: Rgb(0x00, 0x00, 0x00),
                    text_secondary: Rgb(0x66, 0x66, 0x66),
                    chart_line,
                    chart_fill: chart_line.blend(background, 0.2),
                    grid: Rgb(0, 0, 0).blend(background, 0.1),
                }
            }
            Theme::Dark => {
                let background = Rgb(0x12, 0x12, 0x12);
                let chart_line = Rgb(0, 255, 255);
                Palette {
                    primary,
                    secondary,
                    success: Rgb(0x66, 0xbb, 0x6a),
                    error: Rgb(0xf4, 0x43, 0x36),
                    background,
                    surface: Rgb(0x1e, 0x1e, 0x1e),
                    text: Rgb(0xff, 0xff, 0xff),
                    text_secondary: Rgb(0xb3, 0xb3, 0xb3),
                    chart_line,
                    chart_fill: chart_line.blend(background, 0.2),
                    grid: Rgb(255, 255, 255).blend(background, 0.1),
                }
            }
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Theme::Light => "light",
                Theme::Dark => "dark",
            }
        )
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow::anyhow!("Invalid theme: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle().toggle(), Theme::Dark);
    }

    #[test]
    fn test_from_str_and_display() {
        assert_eq!("DARK".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Light.to_string(), "light");
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_chart_colours_follow_theme() {
        assert_eq!(Theme::Light.palette().chart_line, Rgb(75, 192, 192));
        assert_eq!(Theme::Dark.palette().chart_line, Rgb(0, 255, 255));
        assert_eq!(Theme::Light.palette().text, Rgb(0, 0, 0));
        assert_eq!(Theme::Dark.palette().text, Rgb(255, 255, 255));
    }

    #[test]
    fn test_blend() {
        let fill = Rgb(75, 192, 192).blend(Rgb(255, 255, 255), 0.2);
        assert_eq!(fill, Rgb(219, 242, 242));
        assert_eq!(Rgb(1, 2, 3).blend(Rgb(9, 9, 9), 1.0), Rgb(1, 2, 3));
    }
}
