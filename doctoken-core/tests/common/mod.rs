//! Test infrastructure for the tree parser
//!
//! Provides fixture loading, stochastic context wrapping, and assertion helpers.

mod generators;
mod harness;

pub use generators::Gen;
pub use harness::{run_test, run_with_variations};
pub use loader::{load_fixtures_by_name, ExpectedToken, TestCase};
