//! Single-flight guard for the token refresh call.
//!
//! Any number of requests can observe a 401 in the same scheduling window;
//! only the first becomes the leader and issues the refresh. Everyone else
//! parks a oneshot waiter and is woken, in enqueue order, when the leader
//! settles. The check-and-set and the queue drain both happen under one lock,
//! which is what upholds the at-most-one-refresh invariant on a
//! multi-threaded runtime.

use super::ClientError;
use reqwest::StatusCode;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::oneshot;

/// Cloneable description of a failed refresh call, fanned out to every parked
/// waiter (`reqwest::Error` itself cannot be cloned).
#[derive(Debug, Clone, Error)]
#[error("token refresh failed: {message}")]
pub struct RefreshFailure {
    pub status: Option<StatusCode>,
    pub message: String,
}

impl RefreshFailure {
    pub(crate) fn from_error(error: &ClientError) -> Self {
        match error {
            ClientError::Status { status, message } => Self { status: Some(*status), message: message.clone() },
            other => Self { status: None, message: other.to_string() },
        }
    }

    pub(crate) fn canceled() -> Self {
        Self { status: None, message: "refresh abandoned before settling".to_string() }
    }
}

pub(crate) type RefreshOutcome = std::result::Result<(), RefreshFailure>;

#[derive(Debug)]
pub(crate) enum GateTicket<'a> {
    /// This caller starts the refresh. The guard settles the gate either way:
    /// explicitly with the refresh outcome, or with a cancellation failure if
    /// the leader's future is dropped mid-refresh. Without that, an abandoned
    /// leader would leave `refreshing` set and park every later 401 forever.
    Leader(LeaderGuard<'a>),
    /// A refresh is already in flight; wait for its outcome.
    Follower(oneshot::Receiver<RefreshOutcome>),
}

#[derive(Debug)]
pub(crate) struct LeaderGuard<'a> {
    gate: &'a RefreshGate,
    settled: bool,
}

impl LeaderGuard<'_> {
    pub(crate) fn settle(mut self, outcome: RefreshOutcome) {
        self.settled = true;
        self.gate.settle(outcome);
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.gate.settle(Err(RefreshFailure::canceled()));
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct RefreshGate {
    state: Mutex<GateState>,
}

#[derive(Debug, Default)]
struct GateState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

impl RefreshGate {
    pub(crate) fn join(&self) -> GateTicket<'_> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            GateTicket::Follower(rx)
        } else {
            state.refreshing = true;
            GateTicket::Leader(LeaderGuard { gate: self, settled: false })
        }
    }

    /// Drains the queue with one shared outcome and returns the gate to idle.
    /// Only reachable through a [`LeaderGuard`], so the gate cannot be settled
    /// by anyone but the current leader (or its drop).
    fn settle(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };

        for waiter in waiters {
            // A waiter whose caller gave up is gone; everyone else gets the
            // same outcome.
            let _ = waiter.send(outcome.clone());
        }
    }
}
