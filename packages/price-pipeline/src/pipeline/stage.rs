//! Run lifecycle.
//!
//! ```text
//! Idle -> Fetching -> Extracting -> Normalizing -> RateLookup -> Converting -> Done
//! ```
//!
//! `Failed` is reachable from `Idle` (pre-flight validation), `Fetching`,
//! `Normalizing` (everything dropped) and `RateLookup`. Extraction and
//! conversion only skip items.

use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Fetching,
    Extracting,
    Normalizing,
    RateLookup,
    Converting,
    Done,
    Failed,
}

impl PipelineStage {
    /// The stage that legally follows this one on success.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Fetching),
            Self::Fetching => Some(Self::Extracting),
            Self::Extracting => Some(Self::Normalizing),
            Self::Normalizing => Some(Self::RateLookup),
            Self::RateLookup => Some(Self::Converting),
            Self::Converting => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    /// Whether a failure in this stage terminates the run.
    pub fn can_fail(self) -> bool {
        matches!(
            self,
            Self::Idle | Self::Fetching | Self::Normalizing | Self::RateLookup
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Normalizing => "normalizing",
            Self::RateLookup => "rate_lookup",
            Self::Converting => "converting",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Walks a run through its stages, in order, once.
#[derive(Debug)]
pub(crate) struct StageTracker {
    current: PipelineStage,
}

impl StageTracker {
    pub(crate) fn new() -> Self {
        Self {
            current: PipelineStage::Idle,
        }
    }

    pub(crate) fn current(&self) -> PipelineStage {
        self.current
    }

    /// Move to the next stage and return it.
    pub(crate) fn advance(&mut self) -> PipelineStage {
        match self.current.next() {
            Some(next) => {
                debug!(from = %self.current, to = %next, "Pipeline stage");
                self.current = next;
            }
            None => debug!(stage = %self.current, "Advance on terminal stage ignored"),
        }
        self.current
    }

    /// Record a terminal failure in the current stage.
    pub(crate) fn fail(&mut self) {
        debug_assert!(
            self.current.can_fail(),
            "stage {} cannot fail the run",
            self.current
        );
        debug!(from = %self.current, "Pipeline failed");
        self.current = PipelineStage::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_order() {
        let mut tracker = StageTracker::new();
        let mut seen = vec![tracker.current()];
        while !tracker.current().is_terminal() {
            seen.push(tracker.advance());
        }
        assert_eq!(
            seen,
            vec![
                PipelineStage::Idle,
                PipelineStage::Fetching,
                PipelineStage::Extracting,
                PipelineStage::Normalizing,
                PipelineStage::RateLookup,
                PipelineStage::Converting,
                PipelineStage::Done,
            ]
        );
    }

    #[test]
    fn test_only_fatal_stages_can_fail() {
        assert!(PipelineStage::Fetching.can_fail());
        assert!(PipelineStage::Normalizing.can_fail());
        assert!(PipelineStage::RateLookup.can_fail());
        assert!(!PipelineStage::Extracting.can_fail());
        assert!(!PipelineStage::Converting.can_fail());
        assert!(!PipelineStage::Done.can_fail());
    }

    #[test]
    fn test_fail_is_terminal() {
        let mut tracker = StageTracker::new();
        tracker.advance();
        tracker.fail();
        assert_eq!(tracker.current(), PipelineStage::Failed);
        assert_eq!(tracker.advance(), PipelineStage::Failed);
    }
}
