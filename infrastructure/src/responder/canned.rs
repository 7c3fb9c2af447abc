//! Simulated responder for offline use and demos.

use async_trait::async_trait;
use parley_application::{Responder, ResponderError, ResponderReply};
use rand::seq::SliceRandom;
use std::time::Duration;

/// Replies the simulated backend picks from.
pub const CANNED_REPLIES: [&str; 5] = [
    "I understand what you're saying.",
    "That's an interesting point!",
    "Could you elaborate on that?",
    "I'm still learning, but I'll do my best to help.",
    "Thanks for sharing that with me!",
];

/// [`Responder`] that waits a fixed delay and answers with a random canned
/// reply. It keeps no remote history, so deletion is the default no-op.
pub struct CannedResponder {
    delay: Duration,
}

impl CannedResponder {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[async_trait]
impl Responder for CannedResponder {
    fn name(&self) -> &str {
        "canned"
    }

    async fn respond(&self, _message: &str) -> Result<ResponderReply, ResponderError> {
        tokio::time::sleep(self.delay).await;
        let reply = CANNED_REPLIES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(CANNED_REPLIES[0]);
        Ok(ResponderReply::text(reply))
    }
}
