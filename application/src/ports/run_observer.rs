//! Run progress port.
//!
//! [`RunObserver`] is an **output port** that the presentation layer
//! implements to display run progress. Event types come from the domain
//! layer.

use converge_domain::RunEvent;

/// Receives [`RunEvent`]s in transcript order.
///
/// Callbacks are synchronous and must not block; the loop calls them
/// between awaits.
pub trait RunObserver: Send + Sync {
    fn on_event(&self, _event: &RunEvent) {}
}

/// No-op observer used when the caller supplies none.
pub struct NoRunObserver;

impl RunObserver for NoRunObserver {}
