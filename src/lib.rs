//! Job-cost estimating for asphalt paving work.
//!
//! - [`domain`] holds the job model, the cost engine and the editing session.
//! - [`infra`] reads and writes quotes as CSV, JSON and printable text.
//! - [`util`] carries persistence, logging and small shared helpers.

pub mod domain;
pub mod infra;
pub mod util;
