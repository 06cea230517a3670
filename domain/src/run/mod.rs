//! Run domain module
//!
//! Pure decision logic of the orchestration loop, separated from I/O so it
//! can be exercised without any decision-maker or action:
//!
//! - [`RunState`]: succeeded/failed signatures, failure streaks, corrections
//! - [`RoundPlan`]: the dedup and concurrency gate
//! - [`RepairLedger`]: the run-global correction budget
//! - [`FinishEvaluator`]: acceptance of the virtual finish action
//! - [`RunEvent`]: observer notifications

pub mod event;
pub mod gate;
pub mod repair;
pub mod state;
pub mod termination;
pub mod value_objects;

pub use event::RunEvent;
pub use gate::{Disposition, PlannedRequest, RoundPlan};
pub use repair::{RepairLedger, RepairVerdict, repair_instruction};
pub use state::RunState;
pub use termination::{BatchResult, FinishEvaluator, FinishReason, FinishVerdict};
pub use value_objects::RunId;
