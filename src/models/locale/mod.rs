// Locale module
// Per-panel language, week convention and UTC offset

use chrono::{FixedOffset, Offset, Utc, Weekday};

/// Language tags whose calendars conventionally start the week on Sunday.
/// Bare primary tags (`ja`) also match regional variants (`ja-JP`).
const SUNDAY_FIRST_LANGUAGES: &[&str] = &["en-US", "en-CA", "ja", "ko", "he", "pt-BR", "zh-TW"];

/// Everything date arithmetic needs to know about the viewer.
///
/// Each calendar instance owns its own context, so two panels rendered in
/// different languages never share week conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    pub language: String,
    pub first_day_of_week: Weekday,
    pub offset: FixedOffset,
}

impl LocaleContext {
    pub fn new(language: impl Into<String>, first_day_of_week: Weekday, offset: FixedOffset) -> Self {
        Self {
            language: language.into(),
            first_day_of_week,
            offset,
        }
    }

    /// Build a context using the language's customary first day of week.
    pub fn for_language(language: impl Into<String>, offset: FixedOffset) -> Self {
        let language = language.into();
        let first_day_of_week = if starts_week_on_sunday(&language) {
            Weekday::Sun
        } else {
            Weekday::Mon
        };
        Self::new(language, first_day_of_week, offset)
    }

    pub fn with_first_day_of_week(mut self, first_day_of_week: Weekday) -> Self {
        self.first_day_of_week = first_day_of_week;
        self
    }
}

impl Default for LocaleContext {
    fn default() -> Self {
        Self::new("en-US", Weekday::Sun, Utc.fix())
    }
}

/// Map a `0 = Sunday` index to a weekday.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

fn starts_week_on_sunday(language: &str) -> bool {
    let normalized = language.replace('_', "-");
    let primary = normalized.split('-').next().unwrap_or_default();
    SUNDAY_FIRST_LANGUAGES.iter().any(|tag| {
        tag.eq_ignore_ascii_case(&normalized) || (!tag.contains('-') && tag.eq_ignore_ascii_case(primary))
    })
}
