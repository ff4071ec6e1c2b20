// UI models module
// Calendar view kinds and the configured view set

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::date::TimeUnit;

/// Calendar view granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Day,
    Week,
    WorkWeek,
    #[default]
    Month,
    Year,
    Agenda,
}

impl ViewKind {
    pub const ALL: [ViewKind; 6] = [
        ViewKind::Day,
        ViewKind::Week,
        ViewKind::WorkWeek,
        ViewKind::Month,
        ViewKind::Year,
        ViewKind::Agenda,
    ];

    /// Calendar unit whose boundaries define this view's period.
    pub fn unit(self) -> TimeUnit {
        match self {
            ViewKind::Day => TimeUnit::Day,
            ViewKind::Week | ViewKind::WorkWeek => TimeUnit::Week,
            ViewKind::Month | ViewKind::Agenda => TimeUnit::Month,
            ViewKind::Year => TimeUnit::Year,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Day => "day",
            ViewKind::Week => "week",
            ViewKind::WorkWeek => "work_week",
            ViewKind::Month => "month",
            ViewKind::Year => "year",
            ViewKind::Agenda => "agenda",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ViewKind::ALL
            .into_iter()
            .find(|view| view.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("Unknown calendar view '{}'", value))
    }
}

/// Keep `current` if it is among the configured views, otherwise fall back
/// to the first configured view, or to month when none are configured.
pub fn resolve_view(current: ViewKind, configured: &[ViewKind]) -> ViewKind {
    if configured.contains(&current) {
        return current;
    }
    configured.first().copied().unwrap_or_default()
}
