pub mod extractor;
pub mod file_filter;
pub mod search;
pub mod walker;

pub use extractor::{ExtractError, TextExtractor, TextUnit};
pub use file_filter::ExtensionFilter;
pub use search::{FileResult, Occurrence, RequestError, SearchRequest};
pub use walker::{RunSummary, WalkOptions};
