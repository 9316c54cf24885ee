pub mod display;
pub mod report;

pub use display::{format_duration, print_file_result, OutputSink, SearchStats};
pub use report::{format_file_result, format_summary, OUTPUT_HEADER, OUTPUT_SEPARATOR};
