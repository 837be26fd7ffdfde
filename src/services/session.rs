//! Lifecycle of split attempts for one selected file.
//!
//! ```text
//! idle ──submit──▶ submitting ──ok──▶ succeeded ──reset delay──▶ idle
//!                      │
//!                      └──error──▶ failed ──submit──▶ submitting
//! ```
//!
//! Replacing the file returns any state to `idle` and orphans the request in
//! flight; its response is recognised by ticket and dropped.

use crate::error::{PdfSplitterError, Result};
use crate::services::client::SplitService;
use crate::services::job::JobBuilder;
use crate::services::ranges::RangeList;
use crate::services::validator::RangeValidator;
use crate::types::{
    PageSpan, Range, RangeField, RangeId, RequestTicket, SessionStatus, SourceFile, SplitArtifact, SplitJob,
    SplitOutcome,
};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct SplitSession {
    source: SourceFile,
    ranges: RangeList,
    merge: bool,
    status: SessionStatus,
    reset_delay: Duration,
    next_ticket: u64,
    in_flight: Option<RequestTicket>,
    succeeded_at: Option<Instant>,
    artifact: Option<SplitArtifact>,
    last_error: Option<String>,
}

impl SplitSession {
    pub fn new(source: SourceFile, reset_delay: Duration) -> Self {
        info!("New split session for '{}'", source.name);
        Self {
            source,
            ranges: RangeList::new(),
            merge: false,
            status: SessionStatus::Idle,
            reset_delay,
            next_ticket: 1,
            in_flight: None,
            succeeded_at: None,
            artifact: None,
            last_error: None,
        }
    }

    /// Current status. A success older than the reset delay reads as idle.
    pub fn status(&self) -> SessionStatus {
        self.status_at(Instant::now())
    }

    pub fn status_at(&self, now: Instant) -> SessionStatus {
        match (self.status, self.succeeded_at) {
            (SessionStatus::Succeeded, Some(at))
                if now.saturating_duration_since(at) >= self.reset_delay =>
            {
                SessionStatus::Idle
            }
            (status, _) => status,
        }
    }

    /// While set, range edits, merge toggling and submission are refused.
    pub fn is_locked(&self) -> bool {
        self.status == SessionStatus::Submitting
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn ranges(&self) -> &[Range] {
        self.ranges.as_slice()
    }

    pub fn merge(&self) -> bool {
        self.merge
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn artifact(&self) -> Option<&SplitArtifact> {
        self.artifact.as_ref()
    }

    /// Hands the stored artifact over to result delivery.
    pub fn take_artifact(&mut self) -> Option<SplitArtifact> {
        self.artifact.take()
    }

    pub fn create_range(&mut self) -> Result<RangeId> {
        self.ensure_unlocked()?;
        Ok(self.ranges.create_range().id)
    }

    pub fn update_range_field(&mut self, id: RangeId, field: RangeField, value: &str) -> Result<bool> {
        self.ensure_unlocked()?;
        Ok(self.ranges.update_range_field(id, field, value))
    }

    pub fn remove_range(&mut self, id: RangeId) -> Result<bool> {
        self.ensure_unlocked()?;
        Ok(self.ranges.remove_range(id))
    }

    pub fn set_merge(&mut self, merge: bool) -> Result<()> {
        self.ensure_unlocked()?;
        self.merge = merge;
        Ok(())
    }

    /// Swaps in a new file. Status returns to idle and any pending
    /// response is orphaned. Ranges and the merge flag are kept.
    pub fn replace_file(&mut self, source: SourceFile) {
        if let Some(ticket) = self.in_flight.take() {
            debug!("Abandoning request {:?} for '{}'", ticket, self.source.name);
        }
        info!("Replacing '{}' with '{}'", self.source.name, source.name);

        self.source = source;
        self.status = SessionStatus::Idle;
        self.succeeded_at = None;
        self.artifact = None;
        self.last_error = None;
    }

    /// Runs validation without touching the session state.
    pub fn validated_ranges(&self) -> Result<Vec<PageSpan>> {
        RangeValidator::validate(&self.ranges)
    }

    /// Validates the ranges and, on success, moves to `submitting`.
    ///
    /// Validation failures leave the status unchanged and are recorded in
    /// [`last_error`](Self::last_error). A second call while a request is in
    /// flight fails with `SessionBusy`.
    pub fn begin_submit(&mut self) -> Result<(RequestTicket, SplitJob)> {
        self.ensure_unlocked()?;

        let spans = match RangeValidator::validate(&self.ranges) {
            Ok(spans) => spans,
            Err(e) => {
                warn!("Validation failed: {}", e);
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        let job = JobBuilder::build(spans, self.merge, &self.source);
        let ticket = RequestTicket(self.next_ticket);
        self.next_ticket += 1;

        self.status = SessionStatus::Submitting;
        self.in_flight = Some(ticket);
        self.succeeded_at = None;
        self.artifact = None;
        self.last_error = None;

        debug!("Request {:?} started with ranges {}", ticket, job.range_spec());
        Ok((ticket, job))
    }

    /// Applies a service response. Returns false, changing nothing, when the
    /// ticket does not belong to the request currently in flight.
    pub fn complete(&mut self, ticket: RequestTicket, outcome: SplitOutcome) -> bool {
        if self.in_flight != Some(ticket) {
            debug!("Ignoring stale response for {:?}", ticket);
            return false;
        }
        self.in_flight = None;

        match outcome {
            SplitOutcome::Success(artifact) => {
                info!("Split succeeded ({} bytes)", artifact.bytes.len());
                self.status = SessionStatus::Succeeded;
                self.succeeded_at = Some(Instant::now());
                self.artifact = Some(artifact);
            }
            SplitOutcome::Failure => {
                self.status = SessionStatus::Failed;
                self.last_error = Some(PdfSplitterError::SplitService.to_string());
            }
        }
        true
    }

    /// Folds an expired success into the stored status. Reads through
    /// [`status`](Self::status) already see the reset without this.
    pub fn tick(&mut self, now: Instant) {
        if self.status == SessionStatus::Succeeded
            && self.status_at(now) == SessionStatus::Idle
        {
            debug!("Success state expired, back to idle");
            self.status = SessionStatus::Idle;
            self.succeeded_at = None;
        }
    }

    /// When a succeeded session will fall back to idle.
    pub fn reset_deadline(&self) -> Option<Instant> {
        let now = Instant::now();
        match (self.status_at(now), self.succeeded_at) {
            (SessionStatus::Succeeded, Some(at)) => Some(at + self.reset_delay),
            _ => None,
        }
    }

    /// Runs one full submission against `service` and returns the job that
    /// was sent.
    pub async fn submit<S: SplitService>(&mut self, service: &S) -> Result<SplitJob> {
        let (ticket, job) = self.begin_submit()?;
        let sent = job.clone();

        let outcome = match service.split(job).await {
            Ok(artifact) => SplitOutcome::Success(artifact),
            Err(e) => {
                warn!("Split service error: {}", e);
                SplitOutcome::Failure
            }
        };

        let succeeded = matches!(outcome, SplitOutcome::Success(_));
        if !self.complete(ticket, outcome) {
            // ticket no longer current
            return Err(PdfSplitterError::SplitService);
        }

        if succeeded {
            Ok(sent)
        } else {
            Err(PdfSplitterError::SplitService)
        }
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.is_locked() {
            Err(PdfSplitterError::SessionBusy)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const DELAY: Duration = Duration::from_secs(3);

    struct MockSplitService {
        response: Result<SplitArtifact>,
        seen: Mutex<Vec<String>>,
    }

    impl MockSplitService {
        fn ok(bytes: &[u8]) -> Self {
            Self {
                response: Ok(SplitArtifact {
                    bytes: bytes.to_vec(),
                    content_type: Some("application/zip".to_string()),
                }),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err(PdfSplitterError::SplitService),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl SplitService for MockSplitService {
        async fn split(&self, job: SplitJob) -> Result<SplitArtifact> {
            self.seen.lock().unwrap().push(job.range_spec());
            match &self.response {
                Ok(artifact) => Ok(artifact.clone()),
                Err(_) => Err(PdfSplitterError::SplitService),
            }
        }
    }

    fn pdf(name: &str) -> SourceFile {
        SourceFile::from_bytes(name, vec![b'%'; 8]).unwrap()
    }

    fn session_with_range(start: &str, end: &str) -> SplitSession {
        let mut session = SplitSession::new(pdf("book.pdf"), DELAY);
        let id = session.ranges()[0].id;
        session.update_range_field(id, RangeField::Start, start).unwrap();
        session.update_range_field(id, RangeField::End, end).unwrap();
        session
    }

    fn artifact() -> SplitArtifact {
        SplitArtifact {
            bytes: b"PK".to_vec(),
            content_type: Some("application/zip".to_string()),
        }
    }

    #[test]
    fn test_starts_idle() {
        let session = SplitSession::new(pdf("a.pdf"), DELAY);
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(!session.is_locked());
        assert_eq!(session.ranges().len(), 1);
    }

    #[test]
    fn test_invalid_ranges_stay_idle() {
        let mut session = session_with_range("3", "1");
        let err = session.begin_submit().unwrap_err();
        assert!(matches!(err, PdfSplitterError::InvalidRangeOrder { start: 3, end: 1 }));
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.last_error().unwrap().contains("3-1"));

        let mut empty = session_with_range("", "");
        assert!(matches!(
            empty.begin_submit(),
            Err(PdfSplitterError::NoValidRanges)
        ));
        assert_eq!(empty.status(), SessionStatus::Idle);
    }

    #[test]
    fn test_submitting_locks_mutations() {
        let mut session = session_with_range("1", "2");
        let (_ticket, job) = session.begin_submit().unwrap();
        assert_eq!(job.range_spec(), "1-2");
        assert_eq!(session.status(), SessionStatus::Submitting);
        assert!(session.is_locked());

        let id = session.ranges()[0].id;
        assert!(matches!(session.create_range(), Err(PdfSplitterError::SessionBusy)));
        assert!(matches!(
            session.update_range_field(id, RangeField::End, "5"),
            Err(PdfSplitterError::SessionBusy)
        ));
        assert!(matches!(session.remove_range(id), Err(PdfSplitterError::SessionBusy)));
        assert!(matches!(session.set_merge(true), Err(PdfSplitterError::SessionBusy)));
        assert!(matches!(session.begin_submit(), Err(PdfSplitterError::SessionBusy)));
        assert_eq!(session.ranges()[0].end, "2");
    }

    #[test]
    fn test_failure_then_retry() {
        let mut session = session_with_range("1", "2");
        let (ticket, _) = session.begin_submit().unwrap();
        assert!(session.complete(ticket, SplitOutcome::Failure));
        assert_eq!(session.status(), SessionStatus::Failed);
        assert!(session.last_error().is_some());
        assert!(!session.is_locked());

        let (retry, _) = session.begin_submit().unwrap();
        assert_ne!(retry, ticket);
        assert_eq!(session.status(), SessionStatus::Submitting);
        assert!(session.last_error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_resets_after_delay() {
        let mut session = session_with_range("1", "3");
        let (ticket, _) = session.begin_submit().unwrap();
        assert!(session.complete(ticket, SplitOutcome::Success(artifact())));
        assert_eq!(session.status(), SessionStatus::Succeeded);
        assert!(session.artifact().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        session.tick(Instant::now());
        assert_eq!(session.status(), SessionStatus::Succeeded);

        tokio::time::advance(DELAY).await;
        session.tick(Instant::now());
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.reset_deadline().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_expires_without_tick() {
        let mut session = session_with_range("1", "3");
        let (ticket, _) = session.begin_submit().unwrap();
        session.complete(ticket, SplitOutcome::Success(artifact()));
        assert!(session.reset_deadline().is_some());

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(!session.is_locked());
        assert!(session.reset_deadline().is_none());

        // a fresh submission works straight from the expired success
        let (next, _) = session.begin_submit().unwrap();
        assert_eq!(session.status(), SessionStatus::Submitting);
        assert!(session.complete(next, SplitOutcome::Failure));
        assert_eq!(session.status(), SessionStatus::Failed);
    }

    #[test]
    fn test_replacing_file_discards_stale_response() {
        let mut session = session_with_range("1", "3");
        let (ticket, _) = session.begin_submit().unwrap();

        session.replace_file(pdf("other.pdf"));
        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.source().name, "other.pdf");

        assert!(!session.complete(ticket, SplitOutcome::Success(artifact())));
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.artifact().is_none());

        // ranges survive the swap
        assert_eq!(session.ranges()[0].end, "3");
    }

    #[test]
    fn test_old_ticket_ignored_by_new_request() {
        let mut session = session_with_range("1", "3");
        let (old, _) = session.begin_submit().unwrap();
        session.replace_file(pdf("next.pdf"));
        let (current, _) = session.begin_submit().unwrap();

        assert!(!session.complete(old, SplitOutcome::Failure));
        assert_eq!(session.status(), SessionStatus::Submitting);
        assert!(session.complete(current, SplitOutcome::Success(artifact())));
        assert_eq!(session.status(), SessionStatus::Succeeded);
    }

    #[test]
    fn test_replace_file_clears_success() {
        let mut session = session_with_range("2", "4");
        let (ticket, _) = session.begin_submit().unwrap();
        session.complete(ticket, SplitOutcome::Success(artifact()));

        session.replace_file(pdf("fresh.pdf"));
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.take_artifact().is_none());
    }

    #[tokio::test]
    async fn test_submit_with_service() {
        let mut session = session_with_range("1", "3");
        let id = session.create_range().unwrap();
        session.update_range_field(id, RangeField::End, "7").unwrap();
        session.set_merge(true).unwrap();

        let service = MockSplitService::ok(b"zipdata");
        let sent = session.submit(&service).await.unwrap();
        assert_eq!(sent.range_spec(), "1-3,4-7");
        assert!(sent.merge);

        assert_eq!(session.status(), SessionStatus::Succeeded);
        assert_eq!(*service.seen.lock().unwrap(), vec!["1-3,4-7".to_string()]);
        assert_eq!(session.take_artifact().unwrap().bytes, b"zipdata");
    }

    #[tokio::test]
    async fn test_submit_failure_surfaces_failed() {
        let mut session = session_with_range("1", "1");
        let service = MockSplitService::failing();

        let err = session.submit(&service).await.unwrap_err();
        assert!(matches!(err, PdfSplitterError::SplitService));
        assert_eq!(session.status(), SessionStatus::Failed);
    }

    #[tokio::test]
    async fn test_submit_invalid_sends_nothing() {
        let mut session = session_with_range("9", "2");
        let service = MockSplitService::ok(b"unused");

        assert!(session.submit(&service).await.is_err());
        assert!(service.seen.lock().unwrap().is_empty());
        assert_eq!(session.status(), SessionStatus::Idle);
    }
}
