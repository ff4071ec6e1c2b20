//! Annotation overlay support: query building, fetching through a host
//! source, stale-response protection and conversion into events.

use anyhow::Result;
use log::debug;

use crate::models::annotation::{AnnotationRecord, AnnotationType};
use crate::models::event::{Event, EventEnd};
use crate::models::locale::LocaleContext;
use crate::models::settings::AnnotationOptions;
use crate::models::time_range::TimeRange;
use crate::utils::date;

pub mod fetcher;

pub use fetcher::HttpAnnotationSource;

pub const ANNOTATIONS_PATH: &str = "/api/annotations";

/// Where annotations come from. A `None` result means "no annotations".
#[cfg_attr(test, mockall::automock)]
pub trait AnnotationSource {
    fn get(&self, path: &str, params: &[(String, String)]) -> Result<Option<Vec<AnnotationRecord>>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationQuery {
    pub range: Option<TimeRange>,
    pub kind: AnnotationType,
    pub limit: u32,
    pub tags: Vec<String>,
}

impl AnnotationQuery {
    pub fn from_options(options: &AnnotationOptions, range: TimeRange) -> Self {
        Self {
            range: options.only_in_time_range.then_some(range),
            kind: options.kind,
            limit: options.limit,
            tags: options.tags.clone(),
        }
    }

    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(range) = &self.range {
            params.push(("from".to_string(), range.from.timestamp_millis().to_string()));
            params.push(("to".to_string(), range.to.timestamp_millis().to_string()));
        }
        if let Some(kind) = self.kind.as_param() {
            params.push(("type".to_string(), kind.to_string()));
        }
        params.push(("limit".to_string(), self.limit.to_string()));
        for tag in &self.tags {
            params.push(("tags".to_string(), tag.clone()));
        }
        params
    }
}

/// Run `query` against `source`, treating a `None` body as empty.
pub fn fetch_annotations<S: AnnotationSource + ?Sized>(
    source: &S,
    query: &AnnotationQuery,
) -> Result<Vec<AnnotationRecord>> {
    let records = source.get(ANNOTATIONS_PATH, &query.params())?;
    Ok(records.unwrap_or_default())
}

/// Ticket identifying one annotation fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Latest annotation results, ignoring responses from superseded fetches.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    generation: u64,
    records: Vec<AnnotationRecord>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch; any ticket issued earlier becomes stale.
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    /// Store the result of the fetch identified by `ticket`. Returns `false`
    /// and keeps the current records when the ticket is stale.
    pub fn complete(&mut self, ticket: FetchTicket, records: Option<Vec<AnnotationRecord>>) -> bool {
        if ticket.0 != self.generation {
            debug!(
                "Dropping stale annotation response (ticket {}, current {})",
                ticket.0, self.generation
            );
            return false;
        }
        self.records = records.unwrap_or_default();
        true
    }

    pub fn records(&self) -> &[AnnotationRecord] {
        &self.records
    }
}

/// Convert annotation records into calendar events.
pub fn annotations_to_events(
    records: &[AnnotationRecord],
    options: &AnnotationOptions,
    locale: &LocaleContext,
) -> Vec<Event> {
    records
        .iter()
        .filter_map(|record| {
            let start = date::from_epoch_millis(record.time, locale.offset)?;
            let end = if record.is_region() {
                record
                    .time_end
                    .and_then(|end| date::from_epoch_millis(end, locale.offset))
                    .map_or(EventEnd::Unknown, EventEnd::At)
            } else {
                EventEnd::Unknown
            };

            Some(Event {
                text: record.text.clone(),
                start,
                end,
                description: None,
                location: None,
                labels: record.tags.clone(),
                color: record.color.clone().unwrap_or_else(|| options.color.clone()),
                links: Vec::new(),
            })
        })
        .collect()
}
