// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! First-to-threshold vote aggregation
//!
//! A `QuorumRound` hands one `Reporter` to each participant. Participants vote
//! from any task; the round decides the moment the tally of yes votes reaches
//! the threshold, or once every reporter has been consumed or dropped without
//! reaching it. Arrival order never matters, only the count.

use crate::context::{ContextError, LockContext};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Strict majority of `participants`: `participants / 2 + 1`.
///
/// Even-sized fleets gain nothing from the extra member (4 needs 3, as does 5).
/// An empty fleet yields 1, which can never be met.
pub fn quorum(participants: usize) -> usize {
    participants / 2 + 1
}

/// Result of a decided round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The yes tally reached the threshold
    Reached { votes: usize },
    /// Every participant finished and the tally stayed below the threshold
    NotReached { votes: usize },
}

/// One round of voting
#[derive(Debug)]
pub struct QuorumRound {
    threshold: usize,
    tally: Arc<AtomicUsize>,
    tx: mpsc::UnboundedSender<bool>,
    rx: mpsc::UnboundedReceiver<bool>,
}

/// A single participant's ballot. Consumed by `report`; dropping it unused
/// counts as finishing without a vote.
#[derive(Debug)]
pub struct Reporter {
    threshold: usize,
    tally: Arc<AtomicUsize>,
    tx: mpsc::UnboundedSender<bool>,
}

impl QuorumRound {
    /// A round that needs a strict majority of `participants`
    pub fn new(participants: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            threshold: quorum(participants),
            tally: Arc::new(AtomicUsize::new(0)),
            tx,
            rx,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn reporter(&self) -> Reporter {
        Reporter {
            threshold: self.threshold,
            tally: Arc::clone(&self.tally),
            tx: self.tx.clone(),
        }
    }

    /// Wait for the round to be decided, or for `ctx` to end first.
    ///
    /// Reporters must be handed out before calling this; the round counts as
    /// drained once all of them are gone.
    pub async fn decide(self, ctx: &LockContext) -> Result<Decision, ContextError> {
        let QuorumRound {
            threshold,
            tally,
            tx,
            mut rx,
        } = self;
        drop(tx);

        let observe = async {
            while rx.recv().await.is_some() {
                if tally.load(Ordering::Acquire) >= threshold {
                    return;
                }
            }
        };

        tokio::select! {
            biased;
            reason = ctx.done() => Err(reason),
            () = observe => {
                // Drained and quorum can still race: the last vote may land
                // between the final recv and here.
                let votes = tally.load(Ordering::Acquire);
                if votes >= threshold {
                    Ok(Decision::Reached { votes })
                } else {
                    Ok(Decision::NotReached { votes })
                }
            }
        }
    }
}

impl Reporter {
    /// True once the round has enough yes votes that further work is moot
    pub fn is_settled(&self) -> bool {
        self.tally.load(Ordering::Acquire) >= self.threshold
    }

    pub fn report(self, accepted: bool) {
        if accepted {
            self.tally.fetch_add(1, Ordering::AcqRel);
        }
        // The round may already be decided and gone; the vote is moot then.
        let _ = self.tx.send(accepted);
    }
}

#[cfg(test)]
#[path = "quorum_tests.rs"]
mod tests;
