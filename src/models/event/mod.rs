// Event module
// Normalized calendar entry derived from one data row or annotation

use chrono::Duration;
use serde::Serialize;

use crate::utils::date::Instant;

/// How an event ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum EventEnd {
    /// No end information at all; the event is a point in time.
    #[default]
    Unknown,
    /// Explicitly endless.
    Open,
    /// Closed interval ending at the given instant.
    At(Instant),
}

impl EventEnd {
    pub fn instant(&self) -> Option<Instant> {
        match self {
            EventEnd::At(end) => Some(*end),
            EventEnd::Unknown | EventEnd::Open => None,
        }
    }
}

/// Quick navigation link attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub title: String,
    pub href: String,
    pub target: Option<String>,
    /// Name of a host action to run instead of following `href`
    pub on_click: Option<String>,
}

/// Calendar event as consumed by the alignment engine and the grid.
///
/// Events are plain values: two events with the same `start` and `text`
/// are distinct entries that merely tie in ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub text: String,
    pub start: Instant,
    pub end: EventEnd,
    pub description: Option<String>,
    pub location: Option<String>,
    pub labels: Vec<String>,
    pub color: String,
    pub links: Vec<Link>,
}

impl Event {
    /// Create a point-in-time event with the default color.
    ///
    /// # Examples
    /// ```
    /// use calendar_panel::models::event::{Event, EventEnd};
    /// use chrono::DateTime;
    ///
    /// let start = DateTime::parse_from_rfc3339("2020-01-01T15:06:02Z").unwrap();
    /// let event = Event::new("Deploy", start);
    /// assert_eq!(event.end, EventEnd::Unknown);
    /// ```
    pub fn new(text: impl Into<String>, start: Instant) -> Self {
        Self {
            text: text.into(),
            start,
            end: EventEnd::Unknown,
            description: None,
            location: None,
            labels: Vec::new(),
            color: DEFAULT_EVENT_COLOR.to_string(),
            links: Vec::new(),
        }
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    pub fn end_instant(&self) -> Option<Instant> {
        self.end.instant()
    }

    /// Get the duration of the event, when it has a concrete end
    pub fn duration(&self) -> Option<Duration> {
        self.end_instant().map(|end| end - self.start)
    }
}

/// Color used when neither the data nor the settings provide one.
pub const DEFAULT_EVENT_COLOR: &str = "#3B82F6";

/// Builder for creating events with optional fields
#[derive(Default)]
pub struct EventBuilder {
    text: Option<String>,
    start: Option<Instant>,
    end: EventEnd,
    description: Option<String>,
    location: Option<String>,
    labels: Vec<String>,
    color: Option<String>,
    links: Vec<Link>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn start(mut self, start: Instant) -> Self {
        self.start = Some(start);
        self
    }

    /// Set a concrete end time
    pub fn end(mut self, end: Instant) -> Self {
        self.end = EventEnd::At(end);
        self
    }

    /// Mark the event as explicitly endless
    pub fn open_ended(mut self) -> Self {
        self.end = EventEnd::Open;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Build the event. Intervals are not validated: an end before the
    /// start is kept as given.
    pub fn build(self) -> Result<Event, String> {
        let text = self.text.ok_or("Event text is required")?;
        let start = self.start.ok_or("Event start time is required")?;

        Ok(Event {
            text,
            start,
            end: self.end,
            description: self.description,
            location: self.location,
            labels: self.labels,
            color: self.color.unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string()),
            links: self.links,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn sample_start() -> Instant {
        DateTime::parse_from_rfc3339("2020-01-01T15:06:02Z").unwrap()
    }

    #[test]
    fn test_new_event_is_point_in_time() {
        let event = Event::new("Deploy", sample_start());
        assert_eq!(event.text, "Deploy");
        assert_eq!(event.end, EventEnd::Unknown);
        assert_eq!(event.color, DEFAULT_EVENT_COLOR);
        assert!(event.duration().is_none());
    }

    #[test]
    fn test_builder_with_optional_fields() {
        let start = sample_start();
        let end = start + Duration::days(1);

        let event = Event::builder()
            .text("Conference")
            .start(start)
            .end(end)
            .description("Annual tech conference")
            .location("Convention Center")
            .label("work")
            .label("work")
            .color("#FF5733")
            .build()
            .unwrap();

        assert_eq!(event.end, EventEnd::At(end));
        assert_eq!(event.description.as_deref(), Some("Annual tech conference"));
        assert_eq!(event.location.as_deref(), Some("Convention Center"));
        assert_eq!(event.labels, vec!["work", "work"]);
        assert_eq!(event.color, "#FF5733");
        assert_eq!(event.duration(), Some(Duration::days(1)));
    }

    #[test]
    fn test_builder_open_ended() {
        let event = Event::builder()
            .text("Incident")
            .start(sample_start())
            .open_ended()
            .build()
            .unwrap();
        assert_eq!(event.end, EventEnd::Open);
        assert!(event.end_instant().is_none());
    }

    #[test]
    fn test_builder_keeps_inverted_interval() {
        let start = sample_start();
        let event = Event::builder()
            .text("Backwards")
            .start(start)
            .end(start - Duration::hours(3))
            .build()
            .unwrap();
        assert_eq!(event.duration(), Some(Duration::hours(-3)));
    }

    #[test]
    fn test_builder_missing_text() {
        let result = Event::builder().start(sample_start()).build();
        assert_eq!(result.unwrap_err(), "Event text is required");
    }

    #[test]
    fn test_builder_missing_start() {
        let result = Event::builder().text("Meeting").build();
        assert_eq!(result.unwrap_err(), "Event start time is required");
    }
}
