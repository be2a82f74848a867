//! Step and suite reports.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Outcome of a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum StepStatus {
    Passed,
    /// The response did not meet an expectation.
    Failed(String),
    /// The step could not be evaluated: a transport error, an unusable case,
    /// or an expectation that does not apply to the response.
    Errored(String),
    Skipped,
}

impl StepStatus {
    /// Text written into a case source's result column.
    pub fn result_text(&self) -> &'static str {
        match self {
            StepStatus::Passed => "PASS",
            StepStatus::Failed(_) => "FAIL",
            StepStatus::Errored(_) => "ERROR",
            StepStatus::Skipped => "SKIP",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            StepStatus::Failed(reason) | StepStatus::Errored(reason) => Some(reason),
            StepStatus::Passed | StepStatus::Skipped => None,
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{}: {}", self.result_text(), reason),
            None => write!(f, "{}", self.result_text()),
        }
    }
}

/// Report for one executed case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    /// Case id and title.
    pub label: String,

    #[serde(flatten)]
    pub status: StepStatus,

    /// Status code of the response, if one was received.
    pub status_code: Option<u16>,

    /// Variables set by captures, in capture order.
    pub captured: Vec<String>,

    /// Time spent on the step, request included.
    pub duration: Duration,
}

impl StepReport {
    pub fn new(label: String, status: StepStatus) -> Self {
        Self {
            label,
            status,
            status_code: None,
            captured: Vec::new(),
            duration: Duration::ZERO,
        }
    }
}

/// Report for all steps of one case source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteReport {
    /// Name of the case source.
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// One report per record, in source order.
    pub steps: Vec<StepReport>,
}

impl SuiteReport {
    pub fn new(source: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            source: source.into(),
            started_at: now,
            finished_at: now,
            steps: Vec::new(),
        }
    }

    pub fn passed(&self) -> usize {
        self.count(|s| matches!(s, StepStatus::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, StepStatus::Failed(_)))
    }

    pub fn errored(&self) -> usize {
        self.count(|s| matches!(s, StepStatus::Errored(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, StepStatus::Skipped))
    }

    /// `true` if no step failed or errored.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.errored() == 0
    }

    fn count(&self, predicate: impl Fn(&StepStatus) -> bool) -> usize {
        self.steps.iter().filter(|step| predicate(&step.status)).count()
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} passed, {} failed, {} errored, {} skipped",
            self.source,
            self.passed(),
            self.failed(),
            self.errored(),
            self.skipped()
        )
    }
}
