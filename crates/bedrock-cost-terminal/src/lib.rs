//! Report renderers for bedrock-cost
//!
//! This crate renders a `CostData` summary as JSON, a terminal table,
//! ASCII bar plots, or a one-line summary.

pub mod model_formatter;
pub mod output;
pub mod plot;
pub mod summary;

pub use output::{
    JsonFormatter, OutputFormat, OutputFormatter, RenderOptions, TableFormatter, get_formatter,
};
pub use plot::PlotFormatter;
pub use summary::{SummaryFormatter, format_summary};
