//! Status polling: track an upload's transformation jobs to a terminal
//! outcome.
//!
//! The poller is a cancellable repeating task. Two surfaces over the same
//! loop semantics: [`StatusPoller::poll`] drives an observer callback and
//! resolves to the final session, [`StatusPoller::session_stream`] exposes
//! the fetches as a lazy finite stream of snapshots.

use std::time::Duration;

use futures::Stream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use onboard_model::UploadSession;

use crate::api::OnboardingApi;
use crate::error::PollError;

/// Fixed delay between status fetches.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Repeating status fetcher for one upload.
pub struct StatusPoller<'a, A: OnboardingApi + ?Sized> {
    api: &'a A,
    interval: Duration,
}

impl<'a, A: OnboardingApi + ?Sized> StatusPoller<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            interval: POLL_INTERVAL,
        }
    }

    /// Override the fetch interval. Tests shrink this; production code
    /// keeps [`POLL_INTERVAL`].
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Poll until the session reaches `done` or `failed`.
    ///
    /// `on_update` is invoked synchronously with every fetched session,
    /// including the terminal one, so callers can render live progress.
    /// A fetch failure rejects immediately with no retry; cancellation
    /// between fetches yields [`PollError::Cancelled`].
    pub async fn poll<F>(
        &self,
        upload_id: &str,
        cancel: &CancellationToken,
        mut on_update: F,
    ) -> Result<UploadSession, PollError>
    where
        F: FnMut(&UploadSession),
    {
        loop {
            if cancel.is_cancelled() {
                return Err(PollError::Cancelled);
            }
            let session = match self.fetch(upload_id).await {
                Ok(session) => session,
                Err(error) => {
                    warn!(upload_id, %error, "status fetch failed, aborting tracking");
                    return Err(error);
                }
            };
            on_update(&session);
            if session.overall.is_terminal() {
                debug!(upload_id, overall = %session.overall, "polling reached terminal status");
                return Ok(session);
            }
            tokio::select! {
                () = cancel.cancelled() => return Err(PollError::Cancelled),
                () = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    /// Lazy finite sequence of session snapshots.
    ///
    /// Yields one `Ok(session)` per fetch and ends after the first terminal
    /// session. A transport failure or cancellation yields one final `Err`
    /// and ends the stream.
    pub fn session_stream<'s>(
        &'s self,
        upload_id: &'s str,
        cancel: CancellationToken,
    ) -> impl Stream<Item = Result<UploadSession, PollError>> + 's {
        futures::stream::unfold(StreamState::Fetch, move |state| {
            let cancel = cancel.clone();
            async move {
                match state {
                    StreamState::Finished => None,
                    StreamState::Wait => {
                        tokio::select! {
                            () = cancel.cancelled() => {
                                Some((Err(PollError::Cancelled), StreamState::Finished))
                            }
                            () = tokio::time::sleep(self.interval) => {
                                Some(self.step(upload_id).await)
                            }
                        }
                    }
                    StreamState::Fetch => {
                        if cancel.is_cancelled() {
                            return Some((Err(PollError::Cancelled), StreamState::Finished));
                        }
                        Some(self.step(upload_id).await)
                    }
                }
            }
        })
    }

    async fn step(&self, upload_id: &str) -> (Result<UploadSession, PollError>, StreamState) {
        match self.fetch(upload_id).await {
            Ok(session) => {
                let next = if session.overall.is_terminal() {
                    StreamState::Finished
                } else {
                    StreamState::Wait
                };
                (Ok(session), next)
            }
            Err(error) => (Err(error), StreamState::Finished),
        }
    }

    async fn fetch(&self, upload_id: &str) -> Result<UploadSession, PollError> {
        // Recompute `overall` from the jobs so the session invariant holds
        // even against a disagreeing server value.
        let session = self.api.get_status(upload_id).await?.normalize();
        debug!(
            upload_id,
            overall = %session.overall,
            progress = session.aggregate_progress(),
            "status fetched"
        );
        Ok(session)
    }
}

enum StreamState {
    Fetch,
    Wait,
    Finished,
}
