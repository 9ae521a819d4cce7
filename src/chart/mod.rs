//! Chart composition.
//!
//! - backend-neutral chart descriptions (`spec`)
//! - selection -> chart specs (`compose`)

pub mod compose;
pub mod spec;

pub use compose::*;
pub use spec::*;
