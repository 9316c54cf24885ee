use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::bounded;

use find_keywords::application::{state, Config};
use find_keywords::domain::search::FileResult;
use find_keywords::domain::walker::{self, WalkOptions};
use find_keywords::domain::{ExtensionFilter, SearchRequest, TextExtractor};
use find_keywords::infrastructure::{ErrorReporter, ErrorType, Logger, LoggerTrait};
use find_keywords::presentation::{self, report, OutputSink, SearchStats};

/// 在目录树中递归搜索关键词的命令行工具
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// 要搜索的关键词 (留空时使用状态文件中保存的关键词)
    keywords: Vec<String>,

    /// 要搜索的目录路径 (留空时使用状态文件或配置中的默认目录)
    #[clap(short, long)]
    path: Option<PathBuf>,

    /// 交互模式: 循环提示输入目录和关键词
    #[clap(short, long)]
    interactive: bool,

    /// 不使用并行处理 (默认使用所有可用CPU)
    #[clap(long)]
    no_parallel: bool,

    /// 启用详细日志记录，日志文件将保存到程序同级目录下
    #[clap(long)]
    log: bool,

    /// 把零匹配的文件也作为 "未找到匹配" 写入报告
    #[clap(long)]
    show_unmatched: bool,

    /// 摘要中列出全部访问过的目录和文件
    #[clap(long)]
    full_summary: bool,

    /// 禁用 PDF 提取能力
    #[clap(long)]
    no_pdf: bool,

    /// 配置文件路径 (默认为程序同级目录下的 config.toml)
    #[clap(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 加载配置
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::default_config_path()?,
    };
    let config = Config::load_or_create(&config_path)?;
    config.validate()?;

    // 初始化日志记录器和错误上报器
    let logger: Arc<dyn LoggerTrait> = Arc::new(Logger::new(args.log)?);
    let errors = Arc::new(ErrorReporter::new(args.log)?);

    // 命令行开关优先于配置文件
    let options = WalkOptions {
        parallel: !args.no_parallel,
        report_unmatched: args.show_unmatched || config.report.show_unmatched,
    };
    let full_summary = args.full_summary || config.report.full_summary;

    // PDF 能力在启动时确定一次
    let extractor = TextExtractor::new(config.search.pdf_enabled && !args.no_pdf);

    let state_path = PathBuf::from(&config.search.state_file);

    if args.interactive {
        run_interactive(
            &config,
            &state_path,
            extractor,
            options,
            full_summary,
            &logger,
            &errors,
        )?;
    } else {
        let request = resolve_request(&args, &config, &state_path, &errors)?;

        // 提供了新输入时更新状态文件
        if !args.keywords.is_empty() || args.path.is_some() {
            save_state(&state_path, &request, &errors);
        }

        run_search(
            &request,
            &config,
            extractor,
            options,
            full_summary,
            Arc::clone(&logger),
            Arc::clone(&errors),
        )?;
    }

    errors.print_summary();
    errors.finalize()?;

    Ok(())
}

/// 从命令行参数、状态文件和配置解析出搜索请求
fn resolve_request(
    args: &Args,
    config: &Config,
    state_path: &Path,
    errors: &ErrorReporter,
) -> Result<SearchRequest> {
    let saved = match state::load(state_path) {
        Ok(saved) => saved,
        Err(err) => {
            errors.report(ErrorType::StateFile, Some(state_path), &err.to_string());
            None
        }
    };

    let directory = args
        .path
        .clone()
        .or_else(|| {
            saved
                .as_ref()
                .map(|s| PathBuf::from(&s.directory))
                .filter(|p| !p.as_os_str().is_empty())
        })
        .unwrap_or_else(|| PathBuf::from(&config.search.default_directory));

    let keywords = if !args.keywords.is_empty() {
        args.keywords.clone()
    } else {
        saved.map(|s| s.keywords).unwrap_or_default()
    };

    SearchRequest::new(directory, keywords).context("无法构建搜索请求")
}

/// 更新状态文件，失败只上报不中断
fn save_state(state_path: &Path, request: &SearchRequest, errors: &ErrorReporter) {
    let directory = request.directory.display().to_string();
    if let Err(err) = state::save(state_path, &directory, &request.keywords) {
        errors.report(ErrorType::StateFile, Some(state_path), &err.to_string());
    }
}

/// 交互模式: 循环提示目录和关键词，留空复用上次的输入
fn run_interactive(
    config: &Config,
    state_path: &Path,
    extractor: TextExtractor,
    options: WalkOptions,
    full_summary: bool,
    logger: &Arc<dyn LoggerTrait>,
    errors: &Arc<ErrorReporter>,
) -> Result<()> {
    loop {
        let saved = match state::load(state_path) {
            Ok(saved) => saved,
            Err(err) => {
                errors.report(ErrorType::StateFile, Some(state_path), &err.to_string());
                None
            }
        };
        let saved_directory = saved
            .as_ref()
            .map(|s| s.directory.clone())
            .unwrap_or_default();
        let saved_keywords = saved.map(|s| s.keywords).unwrap_or_default();

        let directory_input = prompt("请输入要搜索的目录 (留空使用上次的目录): ")?;
        let keywords_input = prompt("请输入要搜索的关键词 (以 '--' 分隔, 留空使用上次的关键词): ")?;

        let directory = if directory_input.is_empty() {
            saved_directory
        } else {
            directory_input.clone()
        };
        let keywords: Vec<String> = if keywords_input.is_empty() {
            saved_keywords
        } else {
            keywords_input
                .split("--")
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect()
        };

        match SearchRequest::new(PathBuf::from(&directory), keywords) {
            Ok(request) => {
                if !directory_input.is_empty() || !keywords_input.is_empty() {
                    save_state(state_path, &request, errors);
                }

                run_search(
                    &request,
                    config,
                    extractor,
                    options,
                    full_summary,
                    Arc::clone(logger),
                    Arc::clone(errors),
                )?;
            }
            Err(err) => {
                // 无效输入不终止交互循环，重新提示
                eprintln!("\x1b[1;31m错误: {}\x1b[0m", err);
                continue;
            }
        }

        let answer = prompt("是否继续搜索? (y/n): ")?.to_lowercase();
        if !matches!(answer.as_str(), "y" | "yes" | "") {
            break;
        }
    }

    Ok(())
}

/// 执行一次完整搜索: 遍历、匹配、输出报告和统计
fn run_search(
    request: &SearchRequest,
    config: &Config,
    extractor: TextExtractor,
    options: WalkOptions,
    full_summary: bool,
    logger: Arc<dyn LoggerTrait>,
    errors: Arc<ErrorReporter>,
) -> Result<()> {
    println!(
        "在 {} 中搜索: {}",
        request.directory.display(),
        request.keywords.join(", ")
    );
    println!("并行搜索: {}", options.parallel);
    println!("PDF 支持: {}", extractor.pdf_available());
    println!();

    // 记录搜索参数到日志
    if logger.is_enabled() {
        logger.log_message(&format!("目标目录: {}", request.directory.display()))?;
        logger.log_message(&format!("搜索关键词: {}", request.keywords.join(", ")))?;
        logger.log_message(&format!("并行搜索: {}", options.parallel))?;
        logger.log_message(&format!("PDF 支持: {}", extractor.pdf_available()))?;
    }

    let sink = Arc::new(OutputSink::create(Path::new(&config.report.output_file))?);

    // 创建结果通道
    let (tx, rx) = bounded::<FileResult>(100);

    // 创建处理线程: 接收结果、打印到控制台并写入报告文件
    let sink_clone = Arc::clone(&sink);
    let handle = std::thread::spawn(move || -> SearchStats {
        let mut stats = SearchStats::new();

        while let Ok(result) = rx.recv() {
            if let Err(err) = presentation::print_file_result(&result) {
                eprintln!("输出结果失败: {}", err);
            }
            if let Err(err) = sink_clone.append(&report::format_file_result(&result)) {
                eprintln!("写入报告文件失败: {}", err);
            }
            stats.record(&result);
        }

        stats
    });

    let start_time = std::time::Instant::now();

    // 执行文件遍历和搜索
    let tx_clone = tx.clone();
    let summary = walker::search_directory(
        request,
        ExtensionFilter::new()?,
        extractor,
        options,
        Arc::clone(&logger),
        Arc::clone(&errors),
        move |result| {
            let _ = tx_clone.send(result);
        },
    )?;

    // 关闭发送通道，等待处理线程完成
    drop(tx);
    let stats = handle.join().unwrap();

    // 摘要写入报告文件并回显到控制台
    let summary_text = report::format_summary(&summary, full_summary);
    print!("{}", summary_text);
    sink.append(&summary_text)?;

    stats.print(&summary);
    println!("报告已写入: {}", config.report.output_file);

    // 完成日志记录
    if logger.is_enabled() {
        logger.finalize(
            summary.directory_count(),
            summary.file_count(),
            stats.matched_file_count(),
            stats.total_matches(),
            start_time.elapsed(),
        )?;
    }

    Ok(())
}

/// 打印提示并读取一行输入
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line).context("读取输入失败")?;
    Ok(line.trim().to_string())
}
