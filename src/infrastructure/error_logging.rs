use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Local;

/// 错误类型分类
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// 文件读取错误
    FileRead,
    /// PDF 解析错误
    PdfParse,
    /// PDF 能力不可用
    PdfUnavailable,
    /// 状态文件读写错误
    StateFile,
    /// 目录遍历错误
    Traversal,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::FileRead => "文件读取",
            ErrorType::PdfParse => "PDF解析",
            ErrorType::PdfUnavailable => "PDF支持缺失",
            ErrorType::StateFile => "状态文件",
            ErrorType::Traversal => "目录遍历",
        }
    }
}

/// 错误上报器
///
/// 每个失败的文件恰好在控制台输出一条红色错误行，错误本身不中断遍历。
/// 启用文件日志时同时写入带时间戳的错误日志文件。
pub struct ErrorReporter {
    error_file: Arc<Mutex<Option<File>>>,
    error_path: PathBuf,
    log_to_file: bool,
    error_counts: Arc<Mutex<HashMap<ErrorType, usize>>>,
}

impl ErrorReporter {
    /// 创建错误上报器，`log_to_file` 控制是否落盘
    pub fn new(log_to_file: bool) -> Result<Self> {
        if !log_to_file {
            return Ok(Self {
                error_file: Arc::new(Mutex::new(None)),
                error_path: PathBuf::new(),
                log_to_file: false,
                error_counts: Arc::new(Mutex::new(HashMap::new())),
            });
        }

        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");

        // 错误日志文件与程序同级目录
        let error_path = PathBuf::from(format!("error_{}.log", timestamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&error_path)?;

        // 写入UTF-8 BOM以确保文件被正确识别为UTF-8
        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?;

        writeln!(file_clone, "# FindKeywords 错误日志")?;
        writeln!(file_clone, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# ============================================")?;
        writeln!(file_clone)?;

        Ok(Self {
            error_file: Arc::new(Mutex::new(Some(file))),
            error_path,
            log_to_file: true,
            error_counts: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// 上报一条非致命错误
    pub fn report(&self, error_type: ErrorType, file_path: Option<&Path>, message: &str) {
        // 控制台红色错误行
        match file_path {
            Some(path) => eprintln!(
                "\x1b[1;31m错误: {} - {} ({})\x1b[0m",
                error_type.as_str(),
                message,
                path.display()
            ),
            None => eprintln!("\x1b[1;31m错误: {} - {}\x1b[0m", error_type.as_str(), message),
        }

        {
            let mut counts = self.error_counts.lock().unwrap();
            *counts.entry(error_type.clone()).or_insert(0) += 1;
        }

        if !self.log_to_file {
            return;
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        if let Ok(mut file_guard) = self.error_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = writeln!(file, "[{}] {} - {}", timestamp, error_type.as_str(), message);
                if let Some(path) = file_path {
                    let _ = writeln!(file, "  文件路径: {}", path.display());
                }
                let _ = writeln!(file);
                let _ = file.flush();
            }
        }
    }

    /// 各错误类型的出现次数
    pub fn error_summary(&self) -> HashMap<ErrorType, usize> {
        self.error_counts.lock().unwrap().clone()
    }

    /// 总错误数
    pub fn total_errors(&self) -> usize {
        self.error_counts.lock().unwrap().values().sum()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors() > 0
    }

    /// 完成错误日志记录，写入统计尾部
    pub fn finalize(&self) -> Result<()> {
        if !self.log_to_file {
            return Ok(());
        }

        if let Ok(mut file_guard) = self.error_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let now = Local::now();
                writeln!(file, "# ============================================")?;
                writeln!(file, "# 结束时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;

                let summary = self.error_summary();
                if summary.is_empty() {
                    writeln!(file, "# 无错误记录")?;
                } else {
                    writeln!(file, "# 错误统计:")?;
                    for (error_type, count) in &summary {
                        writeln!(file, "#   {}: {} 次", error_type.as_str(), count)?;
                    }
                    writeln!(file, "#   总计: {} 个错误", self.total_errors())?;
                }

                file.flush()?;
            }
        }

        Ok(())
    }

    /// 打印错误摘要到控制台
    pub fn print_summary(&self) {
        if !self.has_errors() {
            return;
        }

        println!("\n⚠️  搜索过程中发现错误:");
        println!("----------------------------");

        for (error_type, count) in &self.error_summary() {
            println!("  {}: {} 次", error_type.as_str(), count);
        }
        println!("  总计: {} 个错误", self.total_errors());

        if self.log_to_file {
            println!("  详细错误信息请查看: {}", self.error_path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_starts_clean() {
        let reporter = ErrorReporter::new(false).unwrap();
        assert_eq!(reporter.total_errors(), 0);
        assert!(!reporter.has_errors());
    }

    #[test]
    fn test_report_counts_by_type() {
        let reporter = ErrorReporter::new(false).unwrap();

        reporter.report(ErrorType::FileRead, Some(Path::new("/test/a.txt")), "测试错误");
        reporter.report(ErrorType::FileRead, Some(Path::new("/test/b.txt")), "测试错误");
        reporter.report(ErrorType::PdfUnavailable, Some(Path::new("/test/c.pdf")), "不可用");

        assert_eq!(reporter.total_errors(), 3);
        assert!(reporter.has_errors());

        let summary = reporter.error_summary();
        assert_eq!(summary.get(&ErrorType::FileRead), Some(&2));
        assert_eq!(summary.get(&ErrorType::PdfUnavailable), Some(&1));
    }

    #[test]
    fn test_error_type_labels() {
        assert_eq!(ErrorType::FileRead.as_str(), "文件读取");
        assert_eq!(ErrorType::PdfUnavailable.as_str(), "PDF支持缺失");
    }
}
