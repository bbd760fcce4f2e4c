//! Library side of the `survey-pivot` command line: configuration, logging
//! and the staged pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
