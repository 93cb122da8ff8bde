//! Pure lifecycle model for one request/response exchange.
//!
//! The controller drives this machine; keeping the transitions here makes the
//! lifecycle testable with no rendering surface and no network.

use shared::domain::ExchangeId;
use thiserror::Error;

/// `Idle -> Sent -> Pending -> Resolved | Failed`. Both terminal phases end
/// the exchange; no state survives into the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExchangePhase {
    #[default]
    Idle,
    Sent,
    Pending,
    Resolved,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeStep {
    CommitUserMessage,
    Dispatch,
    Resolve,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid exchange step {step:?} in phase {phase:?}")]
pub struct InvalidStep {
    pub phase: ExchangePhase,
    pub step: ExchangeStep,
}

impl ExchangePhase {
    pub fn apply(self, step: ExchangeStep) -> Result<ExchangePhase, InvalidStep> {
        use ExchangePhase::{Failed, Idle, Pending, Resolved, Sent};
        use ExchangeStep::{CommitUserMessage, Dispatch, Fail, Resolve};

        match (self, step) {
            (Idle, CommitUserMessage) => Ok(Sent),
            (Sent, Dispatch) => Ok(Pending),
            (Pending, Resolve) => Ok(Resolved),
            (Pending, Fail) => Ok(Failed),
            (phase, step) => Err(InvalidStep { phase, step }),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ExchangePhase::Resolved | ExchangePhase::Failed)
    }

    /// True while the placeholder is showing and the request is in flight.
    pub fn is_outstanding(self) -> bool {
        matches!(self, ExchangePhase::Pending)
    }
}

/// One exchange instance: its identity plus its current phase.
#[derive(Debug)]
pub struct Exchange {
    exchange_id: ExchangeId,
    phase: ExchangePhase,
}

impl Exchange {
    pub fn new(exchange_id: ExchangeId) -> Self {
        Self {
            exchange_id,
            phase: ExchangePhase::Idle,
        }
    }

    pub fn exchange_id(&self) -> ExchangeId {
        self.exchange_id
    }

    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    pub fn step(&mut self, step: ExchangeStep) -> Result<ExchangePhase, InvalidStep> {
        let next = self.phase.apply(step)?;
        self.phase = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_path_walks_every_phase_in_order() {
        let mut exchange = Exchange::new(ExchangeId(1));
        assert_eq!(exchange.phase(), ExchangePhase::Idle);

        assert_eq!(
            exchange.step(ExchangeStep::CommitUserMessage).expect("commit"),
            ExchangePhase::Sent
        );
        assert_eq!(
            exchange.step(ExchangeStep::Dispatch).expect("dispatch"),
            ExchangePhase::Pending
        );
        assert!(exchange.phase().is_outstanding());
        assert_eq!(
            exchange.step(ExchangeStep::Resolve).expect("resolve"),
            ExchangePhase::Resolved
        );
        assert!(exchange.phase().is_terminal());
    }

    #[test]
    fn failure_settles_from_pending() {
        let mut exchange = Exchange::new(ExchangeId(2));
        exchange.step(ExchangeStep::CommitUserMessage).expect("commit");
        exchange.step(ExchangeStep::Dispatch).expect("dispatch");

        assert_eq!(
            exchange.step(ExchangeStep::Fail).expect("fail"),
            ExchangePhase::Failed
        );
        assert!(exchange.phase().is_terminal());
    }

    #[test]
    fn dispatch_before_commit_is_rejected() {
        let err = ExchangePhase::Idle
            .apply(ExchangeStep::Dispatch)
            .expect_err("must reject");
        assert_eq!(err.phase, ExchangePhase::Idle);
        assert_eq!(err.step, ExchangeStep::Dispatch);
    }

    #[test]
    fn terminal_phases_accept_no_further_steps() {
        for terminal in [ExchangePhase::Resolved, ExchangePhase::Failed] {
            for step in [
                ExchangeStep::CommitUserMessage,
                ExchangeStep::Dispatch,
                ExchangeStep::Resolve,
                ExchangeStep::Fail,
            ] {
                assert!(terminal.apply(step).is_err());
            }
        }
    }

    #[test]
    fn resolution_cannot_arrive_before_dispatch() {
        assert!(ExchangePhase::Sent.apply(ExchangeStep::Resolve).is_err());
        assert!(ExchangePhase::Sent.apply(ExchangeStep::Fail).is_err());
    }
}
