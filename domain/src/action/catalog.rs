//! Per-run action catalog.
//!
//! Built once at the start of a run from the injected action list and the
//! result of each action's configuration check. The catalog answers three
//! questions for the loop:
//!
//! - which actions to advertise to the decision-maker ([`ActionCatalog::advertised`]),
//! - what to say about the ones that are unavailable ([`ActionCatalog::system_note`]),
//! - whether a requested name may be invoked ([`ActionCatalog::check`]).
//!
//! The virtual `finish` action is always advertised and can never be
//! registered as an ordinary action.

use super::entities::{ActionDescriptor, Availability};
use crate::core::error::DomainError;
use std::collections::BTreeMap;

/// Name under which the virtual finish action is advertised.
pub const FINISH_ACTION: &str = "finish";

/// Description advertised for the virtual finish action.
pub const FINISH_DESCRIPTION: &str =
    "Signal that the task is complete. Accepted only when every action you requested has succeeded.";

#[derive(Debug, Clone)]
struct CatalogEntry {
    descriptor: ActionDescriptor,
    availability: Availability,
}

/// Registered actions with their availability for one run.
#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action with the outcome of its configuration check.
    pub fn register(
        &mut self,
        descriptor: ActionDescriptor,
        availability: Availability,
    ) -> Result<(), DomainError> {
        if descriptor.name.trim().is_empty() {
            return Err(DomainError::EmptyActionName);
        }
        if descriptor.name == FINISH_ACTION {
            return Err(DomainError::ReservedActionName(descriptor.name));
        }
        if self.entries.contains_key(&descriptor.name) {
            return Err(DomainError::DuplicateAction(descriptor.name));
        }
        self.entries.insert(
            descriptor.name.clone(),
            CatalogEntry {
                descriptor,
                availability,
            },
        );
        Ok(())
    }

    /// Whether `name` may be invoked this run.
    ///
    /// Returns the explanation sent back to the decision-maker otherwise.
    pub fn check(&self, name: &str) -> Result<(), String> {
        match self.entries.get(name) {
            Some(entry) => match &entry.availability {
                Availability::Available => Ok(()),
                Availability::Unavailable { reason } => {
                    Err(format!("action '{}' is unavailable: {}", name, reason))
                }
            },
            None => {
                let known: Vec<&str> = self.available_names().collect();
                Err(format!(
                    "unknown action '{}'; available actions: {}",
                    name,
                    if known.is_empty() {
                        FINISH_ACTION.to_string()
                    } else {
                        format!("{}, {}", known.join(", "), FINISH_ACTION)
                    }
                ))
            }
        }
    }

    pub fn is_available(&self, name: &str) -> bool {
        self.check(name).is_ok()
    }

    /// Names of actions that passed their configuration check.
    pub fn available_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .values()
            .filter(|e| e.availability.is_available())
            .map(|e| e.descriptor.name.as_str())
    }

    /// Actions advertised to the decision-maker: the available ones plus finish.
    pub fn advertised(&self) -> Vec<ActionDescriptor> {
        self.entries
            .values()
            .filter(|e| e.availability.is_available())
            .map(|e| e.descriptor.clone())
            .chain(std::iter::once(ActionDescriptor::new(
                FINISH_ACTION,
                FINISH_DESCRIPTION,
            )))
            .collect()
    }

    /// `(name, reason)` for every action excluded by its configuration check.
    pub fn unavailable(&self) -> Vec<(&str, &str)> {
        self.entries
            .values()
            .filter_map(|e| match &e.availability {
                Availability::Unavailable { reason } => {
                    Some((e.descriptor.name.as_str(), reason.as_str()))
                }
                Availability::Available => None,
            })
            .collect()
    }

    /// System note enumerating unavailable actions, if there are any.
    pub fn system_note(&self) -> Option<String> {
        let unavailable = self.unavailable();
        if unavailable.is_empty() {
            return None;
        }
        let mut note = String::from("The following actions are unavailable in this run:");
        for (name, reason) in unavailable {
            note.push_str(&format!("\n- {}: {}", name, reason));
        }
        Some(note)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
