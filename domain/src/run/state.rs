//! Per-run mutable state.

use super::repair::RepairLedger;
use crate::action::Signature;
use std::collections::{BTreeSet, HashMap};

/// Bookkeeping for a single `run()` call.
///
/// Created when a run starts and dropped when it returns. Nothing here is
/// shared across runs or persisted.
#[derive(Debug, Clone)]
pub struct RunState {
    round: usize,
    succeeded: BTreeSet<Signature>,
    /// Signatures that failed or were turned away, and have not succeeded since.
    failed: BTreeSet<Signature>,
    /// Action names whose arguments could not be parsed and that have not
    /// succeeded since.
    unrepaired: BTreeSet<String>,
    streaks: HashMap<Signature, u32>,
    repairs: RepairLedger,
}

impl RunState {
    pub fn new(correction_budget: u32) -> Self {
        Self {
            round: 0,
            succeeded: BTreeSet::new(),
            failed: BTreeSet::new(),
            unrepaired: BTreeSet::new(),
            streaks: HashMap::new(),
            repairs: RepairLedger::new(correction_budget),
        }
    }

    /// Advance to the next round and return its 1-based number.
    pub fn begin_round(&mut self) -> usize {
        self.round += 1;
        self.round
    }

    pub fn round(&self) -> usize {
        self.round
    }

    /// Record the outcome of an executed action.
    ///
    /// Returns the signature's consecutive-failure streak after this outcome
    /// (0 on success).
    pub fn record_outcome(&mut self, signature: &Signature, success: bool) -> u32 {
        if success {
            self.failed.remove(signature);
            self.unrepaired.remove(signature.name());
            self.succeeded.insert(signature.clone());
            self.streaks.remove(signature);
            0
        } else {
            self.failed.insert(signature.clone());
            let streak = self.streaks.entry(signature.clone()).or_insert(0);
            *streak += 1;
            *streak
        }
    }

    /// Record a signature that was requested but not run this round.
    ///
    /// It stands as failed until it succeeds; the failure streak is untouched.
    pub fn record_rejected(&mut self, signature: &Signature) {
        if !self.succeeded.contains(signature) {
            self.failed.insert(signature.clone());
        }
    }

    /// Record a request whose arguments could not be parsed.
    ///
    /// Stands until any request for the same action succeeds.
    pub fn record_malformed(&mut self, action_name: &str) {
        self.unrepaired.insert(action_name.to_string());
    }

    pub fn has_succeeded(&self, signature: &Signature) -> bool {
        self.succeeded.contains(signature)
    }

    pub fn any_succeeded(&self) -> bool {
        !self.succeeded.is_empty()
    }

    /// Action names of standing failures, failed signatures first.
    pub fn standing_failures(&self) -> impl Iterator<Item = &str> {
        self.failed
            .iter()
            .map(Signature::name)
            .chain(self.unrepaired.iter().map(String::as_str))
    }

    pub fn has_standing_failures(&self) -> bool {
        !self.failed.is_empty() || !self.unrepaired.is_empty()
    }

    pub fn repairs(&self) -> &RepairLedger {
        &self.repairs
    }

    pub fn repairs_mut(&mut self) -> &mut RepairLedger {
        &mut self.repairs
    }
}
