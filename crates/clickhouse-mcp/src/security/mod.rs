//! Query safety checks

mod query_guard;

pub use query_guard::{QueryGuard, Verdict};
