pub mod engine;
pub mod formatter;
pub mod planner;
pub mod scoring;

pub use engine::*;
pub use formatter::*;
pub use planner::*;
pub use scoring::*;
