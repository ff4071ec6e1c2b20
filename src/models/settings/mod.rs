// Settings module
// Panel options as stored in the TOML settings file

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::annotation::AnnotationType;
use crate::models::event::DEFAULT_EVENT_COLOR;
use crate::models::locale::{weekday_from_index, LocaleContext};
use crate::models::ui::ViewKind;

/// Slot assignment strategy for the alignment engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignStrategy {
    /// Lowest slot free on the start day; later days may collide.
    #[default]
    FirstFit,
    /// Lowest slot free on every day the event spans.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("first day of week must be between 0 (Sunday) and 6, got {0}")]
    InvalidFirstDayOfWeek(u8),
    #[error("default view '{0}' is not one of the configured views")]
    DefaultViewNotConfigured(ViewKind),
    #[error("invalid UTC offset '{0}', expected e.g. '+02:00' or 'UTC'")]
    InvalidOffset(String),
    #[error("annotation limit must be greater than 0")]
    ZeroAnnotationLimit,
    #[error("max entries per day must be greater than 0")]
    ZeroEntriesPerDay,
}

/// Which columns play which role. Names are column names; absent roles fall
/// back to the first column of the expected type where one exists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub text_field: Option<String>,
    pub time_field: Option<String>,
    pub end_time_field: Option<String>,
    pub description_field: Option<String>,
    pub label_fields: Vec<String>,
    pub color_field: Option<String>,
    pub location_field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationOptions {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: AnnotationType,
    pub limit: u32,
    pub tags: Vec<String>,
    /// Restrict the query to the host's time range
    pub only_in_time_range: bool,
    pub color: String,
}

impl Default for AnnotationOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: AnnotationType::All,
            limit: 100,
            tags: Vec::new(),
            only_in_time_range: true,
            color: "#F2CC0C".to_string(),
        }
    }
}

/// Names of the runtime variables holding a manually driven time range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_view: ViewKind,
    /// Views offered by the toolbar, in display order
    pub views: Vec<ViewKind>,
    /// 0 = Sunday; `None` follows the language convention
    pub first_day_of_week: Option<u8>,
    pub language: String,
    pub utc_offset: String,
    pub default_color: String,
    pub align_strategy: AlignStrategy,
    /// Row budget per day cell before "+N more"
    pub max_entries_per_day: usize,
    pub fields: FieldConfig,
    pub annotations: AnnotationOptions,
    pub time_range_variables: Option<VariableRange>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_view: ViewKind::Month,
            views: vec![ViewKind::Day, ViewKind::Week, ViewKind::Month],
            first_day_of_week: None,
            language: "en-US".to_string(),
            utc_offset: "UTC".to_string(),
            default_color: DEFAULT_EVENT_COLOR.to_string(),
            align_strategy: AlignStrategy::FirstFit,
            max_entries_per_day: 4,
            fields: FieldConfig::default(),
            annotations: AnnotationOptions::default(),
            time_range_variables: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(day) = self.first_day_of_week {
            if weekday_from_index(day).is_none() {
                return Err(SettingsError::InvalidFirstDayOfWeek(day));
            }
        }

        if !self.views.is_empty() && !self.views.contains(&self.default_view) {
            return Err(SettingsError::DefaultViewNotConfigured(self.default_view));
        }

        self.offset()?;

        if self.annotations.limit == 0 {
            return Err(SettingsError::ZeroAnnotationLimit);
        }

        if self.max_entries_per_day == 0 {
            return Err(SettingsError::ZeroEntriesPerDay);
        }

        Ok(())
    }

    pub fn offset(&self) -> Result<FixedOffset, SettingsError> {
        parse_utc_offset(&self.utc_offset)
            .ok_or_else(|| SettingsError::InvalidOffset(self.utc_offset.clone()))
    }

    /// Locale context for this panel instance.
    pub fn locale(&self) -> Result<LocaleContext, SettingsError> {
        let locale = LocaleContext::for_language(self.language.clone(), self.offset()?);
        match self.first_day_of_week {
            None => Ok(locale),
            Some(day) => weekday_from_index(day)
                .map(|weekday| locale.with_first_day_of_week(weekday))
                .ok_or(SettingsError::InvalidFirstDayOfWeek(day)),
        }
    }
}

/// Parse `UTC`, `Z`, `+HH`, `+HHMM` or `+HH:MM` (and the `-` forms).
pub fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("utc") || value.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }

    // chrono wants minutes; `+HH` is shorthand for `+HH:00`
    let is_short = value.is_ascii() && value.len() == 3 && value[1..].chars().all(|c| c.is_ascii_digit());
    if is_short {
        return format!("{}:00", value).parse().ok();
    }

    value.parse().ok()
}
