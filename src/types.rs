use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Identity of a [`Range`] within one session. Carries no page meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RangeId(pub u64);

impl fmt::Display for RangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One editable page range. `start` and `end` hold raw digit strings,
/// empty meaning unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub id: RangeId,
    pub start: String,
    pub end: String,
}

impl Range {
    pub fn is_complete(&self) -> bool {
        !self.start.is_empty() && !self.end.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeField {
    Start,
    End,
}

/// A validated, 1-indexed inclusive page span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpan {
    pub start: u64,
    pub end: u64,
}

impl fmt::Display for PageSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Submitting => "submitting",
            SessionStatus::Succeeded => "succeeded",
            SessionStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// The selected PDF: its file name plus the raw bytes, never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

/// Request payload for the split service, built at submission time.
#[derive(Debug, Clone)]
pub struct SplitJob {
    pub ranges: Vec<PageSpan>,
    pub merge: bool,
    pub source: SourceFile,
}

/// Binary reply from the split service: a zip archive, or a single PDF
/// when ranges were merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitArtifact {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl SplitArtifact {
    pub fn is_pdf(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.trim().to_ascii_lowercase().starts_with("application/pdf"))
            .unwrap_or(false)
    }
}

/// Tagged outcome of one exchange with the split service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    Success(SplitArtifact),
    Failure,
}

/// Identifies the submission a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(pub u64);

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub reset_delay: Duration,
}

impl ServiceConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
    pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(3);

    pub fn new(base_url: &str) -> crate::Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            timeout: Self::DEFAULT_TIMEOUT,
            reset_delay: Self::DEFAULT_RESET_DELAY,
        })
    }
}

/// Summary written alongside a delivered artifact when requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    pub source: String,
    pub ranges: String,
    pub merge: bool,
    pub output_file: PathBuf,
    pub bytes: usize,
    pub completed_at: String,
}
