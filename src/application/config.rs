use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 应用程序配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 搜索相关配置
    pub search: SearchConfig,
    /// 报告相关配置
    pub report: ReportConfig,
}

/// 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// 默认搜索路径
    pub default_directory: String,
    /// 记录上次搜索请求的状态文件
    pub state_file: String,
    /// 是否启用 PDF 提取能力
    pub pdf_enabled: bool,
}

/// 报告配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// 搜索报告输出文件
    pub output_file: String,
    /// 是否把零匹配的文件也写入报告
    pub show_unmatched: bool,
    /// 摘要是否列出全部访问过的目录和文件
    pub full_summary: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                default_directory: ".".to_string(),
                state_file: "input.txt".to_string(),
                pdf_enabled: true,
            },
            report: ReportConfig {
                output_file: "output.txt".to_string(),
                show_unmatched: false,
                full_summary: false,
            },
        }
    }
}

impl Config {
    /// 从配置文件加载配置，如果文件不存在则创建默认配置文件
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            let config = Self::default();
            config.save_to_file(config_path)?;
            println!("已创建默认配置文件: {}", config_path.display());
            Ok(config)
        }
    }

    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", config_path.display()))?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("无法创建配置目录: {}", parent.display()))?;
            }
        }

        let content = toml::to_string_pretty(self).context("无法序列化配置")?;

        fs::write(config_path, content)
            .with_context(|| format!("无法写入配置文件: {}", config_path.display()))?;

        Ok(())
    }

    /// 获取配置文件的默认路径 (程序所在目录下的 config.toml)
    pub fn default_config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("无法获取程序路径")?;

        let exe_dir = exe_path.parent().context("无法获取程序目录")?;

        Ok(exe_dir.join("config.toml"))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.search.default_directory.is_empty() {
            anyhow::bail!("default_directory 不能为空");
        }

        if self.search.state_file.is_empty() {
            anyhow::bail!("state_file 不能为空");
        }

        if self.report.output_file.is_empty() {
            anyhow::bail!("output_file 不能为空");
        }

        if self.search.state_file == self.report.output_file {
            anyhow::bail!("state_file 和 output_file 不能是同一个文件");
        }

        Ok(())
    }
}
