//! Label-to-display mapping for pressure trends and comfort levels

use crate::model::{ComfortIndex, PressureTrend};

/// Terminal color of an indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Orange,
    Green,
    Blue,
    Cyan,
    Yellow,
    Gray,
}

impl Color {
    /// ANSI SGR foreground code
    pub fn ansi_code(&self) -> &'static str {
        match self {
            Color::Red => "31",
            Color::Orange => "38;5;208",
            Color::Green => "32",
            Color::Blue => "34",
            Color::Cyan => "36",
            Color::Yellow => "33",
            Color::Gray => "90",
        }
    }

    /// Wrap `text` in this color's escape sequence
    pub fn paint(&self, text: &str) -> String {
        format!("\x1b[{}m{}\x1b[0m", self.ansi_code(), text)
    }
}

/// Icon + color + text shown for a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub icon: &'static str,
    pub color: Color,
    pub text: &'static str,
}

impl Indicator {
    /// Neutral placeholder for unknown, absent or still-calculating labels
    pub const NEUTRAL: Indicator = Indicator {
        icon: "·",
        color: Color::Gray,
        text: "--",
    };

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// `icon text`, colored when `ansi` is set
    pub fn display(&self, ansi: bool) -> String {
        let plain = format!("{} {}", self.icon, self.text);
        if ansi {
            self.color.paint(&plain)
        } else {
            plain
        }
    }
}

impl From<PressureTrend> for Indicator {
    fn from(trend: PressureTrend) -> Self {
        let (icon, color, text) = match trend {
            PressureTrend::RapidlyRising => ("⇈", Color::Green, "Rising rapidly"),
            PressureTrend::Rising => ("↑", Color::Green, "Rising"),
            PressureTrend::Steady => ("→", Color::Blue, "Steady"),
            PressureTrend::Falling => ("↓", Color::Orange, "Falling"),
            PressureTrend::RapidlyFalling => ("⇊", Color::Red, "Falling rapidly"),
        };
        Indicator { icon, color, text }
    }
}

impl From<ComfortIndex> for Indicator {
    fn from(comfort: ComfortIndex) -> Self {
        let (icon, color, text) = match comfort {
            ComfortIndex::Comfortable => ("✓", Color::Green, "Comfortable"),
            ComfortIndex::TooHot => ("▲", Color::Red, "Too hot"),
            ComfortIndex::TooCold => ("▼", Color::Cyan, "Too cold"),
            ComfortIndex::TooHumid => ("≈", Color::Blue, "Too humid"),
            ComfortIndex::TooDry => ("○", Color::Yellow, "Too dry"),
        };
        Indicator { icon, color, text }
    }
}

/// Indicator for a raw pressure trend label
pub fn trend_indicator(label: Option<&str>) -> Indicator {
    label
        .and_then(|l| l.parse::<PressureTrend>().ok())
        .map(Indicator::from)
        .unwrap_or(Indicator::NEUTRAL)
}

/// Indicator for a raw comfort label
pub fn comfort_indicator(label: Option<&str>) -> Indicator {
    label
        .and_then(|l| l.parse::<ComfortIndex>().ok())
        .map(Indicator::from)
        .unwrap_or(Indicator::NEUTRAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_trends() {
        let rising = trend_indicator(Some("rising"));
        assert_eq!(rising.icon, "↑");
        assert_eq!(rising.color, Color::Green);

        let falling = trend_indicator(Some("rapidly_falling"));
        assert_eq!(falling.text, "Falling rapidly");
        assert_eq!(falling.color, Color::Red);

        assert!(!trend_indicator(Some("steady")).is_neutral());
    }

    #[test]
    fn test_unknown_labels_are_neutral() {
        for label in [None, Some("unknown"), Some("calculating"), Some(""), Some("sideways")] {
            assert!(trend_indicator(label).is_neutral(), "{:?}", label);
            assert!(comfort_indicator(label).is_neutral(), "{:?}", label);
        }
    }

    #[test]
    fn test_comfort_mapping() {
        assert_eq!(comfort_indicator(Some("too_hot")).text, "Too hot");
        assert_eq!(comfort_indicator(Some("too_dry")).color, Color::Yellow);
        assert_eq!(comfort_indicator(Some("comfortable")).icon, "✓");
    }

    #[test]
    fn test_display() {
        let steady = trend_indicator(Some("steady"));
        assert_eq!(steady.display(false), "→ Steady");
        assert_eq!(steady.display(true), "\x1b[34m→ Steady\x1b[0m");
        assert_eq!(Indicator::NEUTRAL.display(false), "· --");
    }
}
