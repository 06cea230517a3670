//! Transcript domain module
//!
//! The ordered record of everything said and done in a run.

pub mod entities;

pub use entities::{Transcript, Turn};
