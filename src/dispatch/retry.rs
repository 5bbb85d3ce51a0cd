use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::CompletionError;

/// Fixed-delay retry policy for transient completion failures.
///
/// Wraps a fallible call instead of hiding the retries inside the client,
/// so the policy composes with any `CompletionClient`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Run `op`, retrying transient errors up to `max_attempts` total tries.
    /// Fatal errors and the final transient error are returned as-is.
    pub fn run<T>(
        &self,
        mut op: impl FnMut() -> Result<T, CompletionError>,
    ) -> Result<T, CompletionError> {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "transient completion failure, retrying"
                    );
                    thread::sleep(self.delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
