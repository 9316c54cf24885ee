// 三层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{
    ExtensionFilter, ExtractError, FileResult, Occurrence, RequestError, RunSummary,
    SearchRequest, TextExtractor, TextUnit, WalkOptions,
};
pub use application::{Config, SavedRequest};
pub use infrastructure::{ErrorReporter, ErrorType, Logger, LoggerTrait};
pub use presentation::{OutputSink, SearchStats};
