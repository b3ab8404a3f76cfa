//! Timeout enforcement.
//!
//! # Responsibilities
//! - Hold one deadline per kind of downstream call
//! - Decide whether a timeout is reported as its own error
//!
//! # Design Decisions
//! - Deadlines scale with expected work: probe < single < batch
//! - Timeout errors are distinct from other errors on the batch path only;
//!   a single-item timeout is reported as a connection failure
//! - Timed-out batch requests return 504 Gateway Timeout

use std::time::Duration;

use crate::config::DownstreamConfig;

/// The kinds of outbound call the gateway makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Single,
    Batch,
    Probe,
}

impl CallKind {
    /// Label used in logs, metrics and error messages.
    pub fn label(self) -> &'static str {
        match self {
            CallKind::Single => "predict",
            CallKind::Batch => "predict_batch",
            CallKind::Probe => "probe",
        }
    }

    /// Whether a timeout on this call surfaces as `DownstreamTimeout`.
    pub fn reports_timeout(self) -> bool {
        matches!(self, CallKind::Batch)
    }
}

/// Per-call deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    pub single: Duration,
    pub batch: Duration,
    pub probe: Duration,
}

impl TimeoutPolicy {
    pub fn from_config(config: &DownstreamConfig) -> Self {
        Self {
            single: Duration::from_secs(config.predict.timeout_secs),
            batch: Duration::from_secs(config.batch.timeout_secs),
            probe: Duration::from_secs(config.probe_timeout_secs),
        }
    }

    pub fn for_call(&self, kind: CallKind) -> Duration {
        match kind {
            CallKind::Single => self.single,
            CallKind::Batch => self.batch,
            CallKind::Probe => self.probe,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_deadlines_are_ordered() {
        let policy = TimeoutPolicy::from_config(&DownstreamConfig::default());
        assert_eq!(policy.for_call(CallKind::Single), Duration::from_secs(60));
        assert_eq!(policy.for_call(CallKind::Batch), Duration::from_secs(300));
        assert_eq!(policy.for_call(CallKind::Probe), Duration::from_secs(10));
        assert!(policy.probe < policy.single && policy.single < policy.batch);
    }

    #[test]
    fn test_only_batch_reports_timeouts() {
        assert!(CallKind::Batch.reports_timeout());
        assert!(!CallKind::Single.reports_timeout());
        assert!(!CallKind::Probe.reports_timeout());
    }
}
