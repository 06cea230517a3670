//! Run output formatting

pub mod console;
