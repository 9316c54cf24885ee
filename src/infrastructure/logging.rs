use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use humansize::{format_size, BINARY};

/// 日志记录器trait
pub trait LoggerTrait: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn log_message(&self, message: &str) -> Result<()>;
    fn log_file(&self, path: &Path, size: u64, status: &str) -> Result<()>;
    fn finalize(
        &self,
        directories_visited: u64,
        files_visited: u64,
        matched_files: u64,
        total_matches: u64,
        duration: Duration,
    ) -> Result<()>;
}

/// 调试日志记录器，启用时把扫描过程写入带时间戳的日志文件
pub struct Logger {
    log_file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl Logger {
    /// 创建新的日志记录器
    pub fn new(enabled: bool) -> Result<Self> {
        if !enabled {
            return Ok(Self {
                log_file: Arc::new(Mutex::new(None)),
                enabled: false,
            });
        }

        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");

        // 调试日志文件与程序同级目录
        let log_path = PathBuf::from(format!("debug_{}.log", timestamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        // 写入UTF-8 BOM以确保文件被正确识别为UTF-8
        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?;

        writeln!(file_clone, "# FindKeywords 调试日志")?;
        writeln!(file_clone, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# --------------------------------------------")?;

        Ok(Self {
            log_file: Arc::new(Mutex::new(Some(file))),
            enabled: true,
        })
    }
}

impl LoggerTrait for Logger {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log_message(&self, message: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "[{}] {}", timestamp, message)?;
                file.flush()?;
            }
        }

        Ok(())
    }

    fn log_file(&self, path: &Path, size: u64, status: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(
                    file,
                    "[{}] 文件: {} | 大小: {} | 状态: {}",
                    timestamp,
                    path.display(),
                    format_size(size, BINARY),
                    status
                )?;
                file.flush()?;
            }
        }

        Ok(())
    }

    fn finalize(
        &self,
        directories_visited: u64,
        files_visited: u64,
        matched_files: u64,
        total_matches: u64,
        duration: Duration,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let now = Local::now();

        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "# --------------------------------------------")?;
                writeln!(file, "# 搜索完成时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
                writeln!(file, "# 总用时: {:.3}秒", duration.as_secs_f64())?;
                writeln!(file, "# 访问目录数: {}", directories_visited)?;
                writeln!(file, "# 扫描文件数: {}", files_visited)?;
                writeln!(file, "# 匹配文件数: {}", matched_files)?;
                writeln!(file, "# 匹配项总数: {}", total_matches)?;
                writeln!(file, "# ============================================")?;
                file.flush()?;
            }
        }

        Ok(())
    }
}
