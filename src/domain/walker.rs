use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use ignore::{WalkBuilder, WalkState};
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::extractor::{ExtractError, TextExtractor};
use crate::domain::file_filter::ExtensionFilter;
use crate::domain::search::{containing_directory, find_occurrences, FileResult, SearchRequest};
use crate::infrastructure::{ErrorReporter, ErrorType, LoggerTrait};

/// 一次遍历的统计信息，由遍历器独占持有并增量更新
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// 访问过的目录集合 (含根目录)
    pub directories_visited: HashSet<PathBuf>,
    /// 通过扩展名过滤的文件，按发现顺序记录，每个文件一条
    pub files_visited: Vec<PathBuf>,
    /// 至少有一处匹配的目录集合
    pub matched_directories: HashSet<PathBuf>,
    /// 本次搜索的关键词，保持请求中的顺序
    pub keywords_searched: Vec<String>,
}

impl RunSummary {
    fn new(keywords: Vec<String>) -> Self {
        Self {
            directories_visited: HashSet::new(),
            files_visited: Vec::new(),
            matched_directories: HashSet::new(),
            keywords_searched: keywords,
        }
    }

    pub fn directory_count(&self) -> u64 {
        self.directories_visited.len() as u64
    }

    pub fn file_count(&self) -> u64 {
        self.files_visited.len() as u64
    }

    pub fn matched_directory_count(&self) -> u64 {
        self.matched_directories.len() as u64
    }
}

/// 遍历选项
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions {
    /// 是否并行遍历 (单线程时结果顺序与发现顺序一致)
    pub parallel: bool,
    /// 是否把零匹配的文件也作为 "未找到匹配" 结果上报
    pub report_unmatched: bool,
}

/// 遍历目录树并对每个通过过滤的文件执行关键词搜索
///
/// 每个文件只提取一次文本，之后按请求顺序逐个关键词匹配。
/// 单个文件的提取失败通过错误上报器记录一条后跳过，遍历继续。
/// 返回本次遍历的统计信息；每个搜索结果通过 `on_result` 流式送出。
pub fn search_directory<F>(
    request: &SearchRequest,
    filter: ExtensionFilter,
    extractor: TextExtractor,
    options: WalkOptions,
    logger: Arc<dyn LoggerTrait>,
    errors: Arc<ErrorReporter>,
    on_result: F,
) -> Result<RunSummary>
where
    F: Fn(FileResult) + Send + Sync + 'static,
{
    let summary = Arc::new(Mutex::new(RunSummary::new(request.keywords.clone())));
    let keywords = Arc::new(request.keywords.clone());
    let filter = Arc::new(filter);
    let on_result = Arc::new(on_result);
    let scanned = Arc::new(AtomicU64::new(0));

    // 创建进度条
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    progress.set_message("已扫描 0 个文件");

    if logger.is_enabled() {
        logger.log_message(&format!("开始扫描目录: {}", request.directory.display()))?;
    }

    // 创建文件遍历器: 包含隐藏文件，不跟随符号链接 (防止循环链接导致的无限递归)，
    // 不应用 gitignore 规则，保证遍历是穷尽的
    let mut builder = WalkBuilder::new(&request.directory);
    builder
        .hidden(false)
        .follow_links(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false);

    if options.parallel {
        builder.threads(num_cpus::get());
    } else {
        builder.threads(1);
    }

    builder.build_parallel().run(|| {
        let summary = Arc::clone(&summary);
        let keywords = Arc::clone(&keywords);
        let filter = Arc::clone(&filter);
        let on_result = Arc::clone(&on_result);
        let scanned = Arc::clone(&scanned);
        let logger = Arc::clone(&logger);
        let errors = Arc::clone(&errors);
        let progress = progress.clone();

        Box::new(move |result| {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    errors.report(ErrorType::Traversal, None, &format!("遍历错误: {}", err));
                    return WalkState::Continue;
                }
            };

            // 目录只记入统计
            if entry.file_type().map_or(false, |ft| ft.is_dir()) {
                let mut summary = summary.lock().unwrap();
                summary.directories_visited.insert(entry.path().to_path_buf());
                return WalkState::Continue;
            }

            if !entry.file_type().map_or(false, |ft| ft.is_file()) {
                return WalkState::Continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

            // 扩展名不在白名单内的文件完全不计入统计
            if !filter.accepts(&file_name) {
                if logger.is_enabled() {
                    let _ = logger.log_file(entry.path(), size, "已跳过(扩展名不在白名单)");
                }
                return WalkState::Continue;
            }

            summary
                .lock()
                .unwrap()
                .files_visited
                .push(entry.path().to_path_buf());

            let current = scanned.fetch_add(1, Ordering::Relaxed) + 1;
            progress.set_message(format!("已扫描 {} 个文件", current));
            progress.tick();

            if logger.is_enabled() {
                let _ = logger.log_file(entry.path(), size, "扫描中");
            }

            process_file(
                entry.path(),
                &keywords,
                &extractor,
                options.report_unmatched,
                &summary,
                &errors,
                on_result.as_ref(),
            );

            WalkState::Continue
        })
    });

    progress.finish_with_message(format!(
        "完成! 共扫描 {} 个文件",
        scanned.load(Ordering::Relaxed)
    ));

    let summary = match Arc::try_unwrap(summary) {
        Ok(mutex) => mutex.into_inner().unwrap(),
        Err(shared) => shared.lock().unwrap().clone(),
    };
    Ok(summary)
}

/// 处理单个已通过过滤的文件: 提取一次文本，逐关键词匹配
fn process_file<F>(
    path: &Path,
    keywords: &[String],
    extractor: &TextExtractor,
    report_unmatched: bool,
    summary: &Mutex<RunSummary>,
    errors: &ErrorReporter,
    on_result: &F,
) where
    F: Fn(FileResult),
{
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let is_pdf = ExtensionFilter::is_pdf(&file_name);

    // 每个文件只提取一次；失败时上报一条错误后跳过
    let units = match extractor.extract(path, is_pdf) {
        Ok(units) => units,
        Err(err) => {
            let error_type = match &err {
                ExtractError::FileRead(_) => ErrorType::FileRead,
                ExtractError::PdfParse(_) => ErrorType::PdfParse,
                ExtractError::PdfUnavailable => ErrorType::PdfUnavailable,
            };
            errors.report(error_type, Some(path), &err.to_string());
            return;
        }
    };

    for keyword in keywords {
        let occurrences = find_occurrences(&units, keyword);

        if occurrences.is_empty() && !report_unmatched {
            continue;
        }

        if !occurrences.is_empty() {
            // 首次匹配时标记所在目录，同目录的后续匹配不重复记录
            let mut summary = summary.lock().unwrap();
            summary
                .matched_directories
                .insert(containing_directory(path));
        }

        on_result(FileResult {
            path: path.to_path_buf(),
            keyword: keyword.clone(),
            occurrences,
        });
    }
}
