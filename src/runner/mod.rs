//! Check orchestration: the structural gate, the concurrent fan-out over a
//! shared page handle, and the launch-order flatten of the results.

mod layout_paths;
mod runner;

pub use layout_paths::LayoutPaths;
pub use runner::{Collaborators, RunError, run_tests};
