use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::domain::search::FileResult;
use crate::domain::walker::RunSummary;
use crate::presentation::report::{OUTPUT_HEADER, OUTPUT_SEPARATOR};

/// 格式化持续时间
pub fn format_duration(duration: std::time::Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    }
}

/// 输出单个搜索结果到控制台 (带颜色)
pub fn print_file_result(result: &FileResult) -> Result<()> {
    let mut stdout = io::stdout().lock();

    if result.occurrences.is_empty() {
        writeln!(
            stdout,
            "\x1b[2;37m在文件 {} 中未找到 '{}' 的匹配\x1b[0m",
            result.path.display(),
            result.keyword
        )?;
        writeln!(stdout)?;
        return Ok(());
    }

    // 绿色文件路径，红色关键词
    writeln!(
        stdout,
        "在文件 \x1b[1;32m{}\x1b[0m 中找到 \x1b[1;31m'{}'\x1b[0m 的匹配:",
        result.path.display(),
        result.keyword
    )?;
    writeln!(stdout, "{:<10} | {}", "行/页", "词位置")?;
    writeln!(stdout, "{}", "-".repeat(30))?;

    for occurrence in &result.occurrences {
        writeln!(
            stdout,
            "\x1b[1;34m{:<10}\x1b[0m | {:?}",
            occurrence.unit, occurrence.positions
        )?;
    }
    writeln!(stdout)?;

    Ok(())
}

/// 报告输出文件
///
/// 运行开始时清空并写入头部，之后以追加方式接收报告文本。
/// 控制台回显由调用方负责 (控制台带颜色，文件为纯文本)。
pub struct OutputSink {
    file: Mutex<File>,
}

impl OutputSink {
    /// 创建 (清空) 报告文件并写入头部
    pub fn create(path: &Path) -> Result<Self> {
        let mut file = File::create(path)
            .with_context(|| format!("无法创建报告文件: {}", path.display()))?;

        writeln!(file, "{}", OUTPUT_HEADER)?;
        writeln!(file, "{}", OUTPUT_SEPARATOR)?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// 追加一段报告文本
    pub fn append(&self, text: &str) -> Result<()> {
        let mut file = self.file.lock().unwrap();
        file.write_all(text.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

/// 控制台搜索统计
pub struct SearchStats {
    pub start_time: Instant,
    matched_files: HashSet<PathBuf>,
    total_matches: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            matched_files: HashSet::new(),
            total_matches: 0,
        }
    }

    /// 记录一个搜索结果 (零匹配的结果不计入)
    pub fn record(&mut self, result: &FileResult) {
        if result.is_match() {
            self.matched_files.insert(result.path.clone());
            self.total_matches += result.match_count();
        }
    }

    pub fn matched_file_count(&self) -> u64 {
        self.matched_files.len() as u64
    }

    pub fn total_matches(&self) -> u64 {
        self.total_matches
    }

    /// 打印收尾统计块
    pub fn print(&self, summary: &RunSummary) {
        let duration = self.start_time.elapsed();

        println!("\n搜索统计:");
        println!("----------------------------");
        println!("总用时: {}", format_duration(duration));
        println!("访问目录: {}", summary.directory_count());
        println!("扫描文件: {}", summary.file_count());
        println!("匹配文件: {}", self.matched_file_count());
        println!("匹配目录: {}", summary.matched_directory_count());
        println!("匹配项数: {}", self.total_matches);
    }
}

impl Default for SearchStats {
    fn default() -> Self {
        Self::new()
    }
}
