//! Marketplace double that replays scripted responses.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::id::Source;
use crate::domain::listing::RawListing;
use crate::error::FetchError;
use crate::port::outbound::source::{ListingSource, SearchQuery};

type Response = Result<Vec<RawListing>, FetchError>;

/// Returns queued responses in order, then repeats the fallback.
pub struct ScriptedSource {
    source: Source,
    script: Mutex<VecDeque<Response>>,
    fallback: Response,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedSource {
    /// Always returns `listings`.
    pub fn returning(source: Source, listings: Vec<RawListing>) -> Self {
        Self {
            source,
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(listings),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails with `error`.
    pub fn failing(source: Source, error: FetchError) -> Self {
        Self {
            fallback: Err(error),
            ..Self::returning(source, Vec::new())
        }
    }

    /// Queue a response ahead of the fallback.
    #[must_use]
    pub fn then(self, response: Response) -> Self {
        self.script.lock().push_back(response);
        self
    }

    /// Sleep before answering every call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of `fetch_listings` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingSource for ScriptedSource {
    async fn fetch_listings(&self, _query: &SearchQuery) -> Result<Vec<RawListing>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }

    fn source(&self) -> Source {
        self.source
    }
}
