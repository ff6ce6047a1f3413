use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Debounced search input.
///
/// `set_input` records every keystroke and re-arms a deadline; the value
/// only commits once the input has been quiet for the configured delay.
/// The initial value commits immediately (no debounce on first mount), and
/// a new keystroke supersedes any pending deadline.
#[derive(Debug)]
pub struct DebouncedQuery {
    input: String,
    committed: String,
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebouncedQuery {
    pub fn new(delay: Duration) -> Self {
        Self {
            input: String::new(),
            committed: String::new(),
            delay,
            deadline: None,
        }
    }

    /// Live input as typed so far
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Last committed search term
    pub fn value(&self) -> &str {
        &self.committed
    }

    /// Whether a commit deadline is armed
    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Records a keystroke and restarts the quiet period
    pub fn set_input(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.input {
            return;
        }
        self.input = text;
        self.deadline = Some(Instant::now() + self.delay);
        trace!(input = %self.input, "search input changed, debounce re-armed");
    }

    /// Commits the input if the deadline has passed. Returns the newly
    /// committed term, or None when nothing committed or the term is
    /// unchanged.
    pub fn poll(&mut self, now: Instant) -> Option<&str> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                if self.input != self.committed {
                    self.committed = self.input.clone();
                    Some(&self.committed)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Waits for the armed deadline and commits. Resolves immediately with
    /// None when no deadline is armed. The caller re-awaits after further
    /// keystrokes; a superseded deadline never commits early because
    /// `set_input` replaces it.
    pub async fn settled(&mut self) -> Option<&str> {
        let deadline = self.deadline?;
        sleep_until(deadline).await;
        self.poll(Instant::now())
    }
}
