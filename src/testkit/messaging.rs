//! Message sender doubles.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::notification::Msisdn;
use crate::error::SendError;
use crate::port::outbound::messaging::MessageSender;

/// A message captured by a sender double.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: Msisdn,
    pub body: String,
}

/// Answers each send from a script, then succeeds; records every attempt.
#[derive(Default)]
pub struct ScriptedSender {
    script: Mutex<VecDeque<Result<(), SendError>>>,
    attempts: Mutex<Vec<SentMessage>>,
}

impl ScriptedSender {
    /// Succeeds on every call.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// Answers with `results` in order, then succeeds.
    pub fn with_results(results: impl IntoIterator<Item = Result<(), SendError>>) -> Self {
        Self {
            script: Mutex::new(results.into_iter().collect()),
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// Fails every one of the first `n` calls with a transient error.
    pub fn transient_failures(n: usize) -> Self {
        Self::with_results((0..n).map(|i| Err(SendError::Transient(format!("timeout #{}", i + 1)))))
    }

    /// Every send attempt, successful or not.
    pub fn attempts(&self) -> Vec<SentMessage> {
        self.attempts.lock().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().len()
    }
}

#[async_trait]
impl MessageSender for ScriptedSender {
    async fn send_text(&self, recipient: &Msisdn, body: &str) -> Result<(), SendError> {
        self.attempts.lock().push(SentMessage {
            recipient: recipient.clone(),
            body: body.to_string(),
        });
        let next = self.script.lock().pop_front();
        next.unwrap_or(Ok(()))
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}
