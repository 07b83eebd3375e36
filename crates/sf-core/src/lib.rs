//! sf-core: stable foundation for stepflow.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - time (discrete tick index shared by every signal)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod time;

// Re-exports: nice ergonomics for downstream crates
pub use error::{SfError, SfResult};
pub use numeric::*;
pub use time::*;
