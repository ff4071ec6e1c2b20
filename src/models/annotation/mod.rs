use serde::{Deserialize, Serialize};

/// Which annotation kinds to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnnotationType {
    #[default]
    #[serde(rename = "")]
    All,
    #[serde(rename = "annotation")]
    Annotation,
    #[serde(rename = "alert")]
    Alert,
}

impl AnnotationType {
    /// Query parameter value, `None` when every kind is wanted.
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            AnnotationType::All => None,
            AnnotationType::Annotation => Some("annotation"),
            AnnotationType::Alert => Some("alert"),
        }
    }
}

/// Annotation as returned by the host API. Times are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnotationRecord {
    pub id: Option<i64>,
    #[serde(rename = "dashboardUID")]
    pub dashboard_uid: Option<String>,
    pub panel_id: Option<i64>,
    pub alert_id: Option<i64>,
    pub time: i64,
    pub time_end: Option<i64>,
    pub text: String,
    pub tags: Vec<String>,
    pub color: Option<String>,
    pub login: Option<String>,
}

impl AnnotationRecord {
    /// Region annotations carry an end distinct from their start.
    pub fn is_region(&self) -> bool {
        self.time_end.is_some_and(|end| end != self.time)
    }
}
