//! Runtime variable lookup for the variable-driven time range.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::locale::LocaleContext;
use crate::models::settings::VariableRange;
use crate::models::time_range::TimeRange;
use crate::utils::date::{self, Instant};

/// Sentinel stored as the first value when "include all" is selected.
pub const ALL_VALUE: &str = "$__all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Textbox,
    Constant,
    Custom,
    Query,
    Interval,
    Datasource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Single(String),
    Multi(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VariableKind,
    pub current: VariableValue,
}

impl Variable {
    /// Value used for the time range.
    ///
    /// Textbox and constant variables take their scalar or first element.
    /// List variables take element 0, or element 1 when element 0 is the
    /// "include all" sentinel.
    pub fn effective_value(&self) -> Option<&str> {
        match (&self.kind, &self.current) {
            (_, VariableValue::Single(value)) => Some(value.as_str()),
            (VariableKind::Textbox | VariableKind::Constant, VariableValue::Multi(values)) => {
                values.first().map(String::as_str)
            }
            (_, VariableValue::Multi(values)) => match values.first() {
                Some(first) if first == ALL_VALUE => values.get(1).map(String::as_str),
                first => first.map(String::as_str),
            },
        }
    }
}

/// Read-only access to the host's variables.
pub trait VariableLookup {
    fn variable(&self, name: &str) -> Option<&Variable>;
}

impl VariableLookup for HashMap<String, Variable> {
    fn variable(&self, name: &str) -> Option<&Variable> {
        self.get(name.trim_start_matches('$'))
    }
}

impl VariableLookup for [Variable] {
    fn variable(&self, name: &str) -> Option<&Variable> {
        let name = name.trim_start_matches('$');
        self.iter().find(|variable| variable.name == name)
    }
}

/// Resolve the configured `from`/`to` variables into a time range.
pub fn resolve_time_range<L: VariableLookup + ?Sized>(
    variables: &L,
    names: &VariableRange,
    locale: &LocaleContext,
) -> Option<TimeRange> {
    let from = resolve_instant(variables, &names.from, locale)?;
    let to = resolve_instant(variables, &names.to, locale)?;
    Some(TimeRange::new(from, to))
}

fn resolve_instant<L: VariableLookup + ?Sized>(
    variables: &L,
    name: &str,
    locale: &LocaleContext,
) -> Option<Instant> {
    let value = variables.variable(name)?.effective_value()?.trim();
    match value.parse::<i64>() {
        Ok(millis) => date::from_epoch_millis(millis, locale.offset),
        Err(_) => date::parse_instant(value, locale.offset),
    }
}
