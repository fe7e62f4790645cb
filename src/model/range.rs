//! Selectable history look-back windows

use std::fmt;

/// One of the fixed history ranges offered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HourRange {
    OneHour,
    SixHours,
    TwelveHours,
    #[default]
    OneDay,
    TwoDays,
    ThreeDays,
    OneWeek,
}

impl HourRange {
    /// All ranges in selector order
    pub const ALL: [HourRange; 7] = [
        HourRange::OneHour,
        HourRange::SixHours,
        HourRange::TwelveHours,
        HourRange::OneDay,
        HourRange::TwoDays,
        HourRange::ThreeDays,
        HourRange::OneWeek,
    ];

    /// Look-back in hours, as sent to `/history?hours=`
    pub fn hours(&self) -> u32 {
        match self {
            HourRange::OneHour => 1,
            HourRange::SixHours => 6,
            HourRange::TwelveHours => 12,
            HourRange::OneDay => 24,
            HourRange::TwoDays => 48,
            HourRange::ThreeDays => 72,
            HourRange::OneWeek => 168,
        }
    }

    /// Selector label
    pub fn label(&self) -> &'static str {
        match self {
            HourRange::OneHour => "1 hour",
            HourRange::SixHours => "6 hours",
            HourRange::TwelveHours => "12 hours",
            HourRange::OneDay => "24 hours",
            HourRange::TwoDays => "48 hours",
            HourRange::ThreeDays => "3 days",
            HourRange::OneWeek => "7 days",
        }
    }
}

impl TryFrom<u32> for HourRange {
    type Error = String;

    fn try_from(hours: u32) -> Result<Self, Self::Error> {
        HourRange::ALL
            .into_iter()
            .find(|range| range.hours() == hours)
            .ok_or_else(|| format!("Unsupported history range: {} hours", hours))
    }
}

impl fmt::Display for HourRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
