//! Pipeline composition and execution for table views.

mod runner;

pub use runner::{ViewConfig, ViewPipeline, ViewStep};
