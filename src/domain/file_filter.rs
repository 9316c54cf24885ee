use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// 支持扫描的文件名模式 (固定白名单)
const FILE_PATTERNS: [&str; 31] = [
    "*.txt", "*.csv", "*.log", "*.bat", "*.py", "*.java", "*.cpp", "*.c",
    "*.js", "*.html", "*.xml", "*.json", "*.md", "*.doc", "*.docx", "*.xls",
    "*.xlsx", "*.ppt", "*.pptx", "*.rtf", "*.sql", "*.yaml", "*.yml",
    "*.tsv", "*.ini", "*.config", "*.svg", "*.sh", "*.pl", "*.rb", "*.pdf",
];

/// PDF 文件的后缀，命中时走按页提取
const PDF_SUFFIX: &str = ".pdf";

/// 基于扩展名白名单的文件过滤器
///
/// 匹配规则为 glob 语义，忽略大小写: "report.TXT" 与 "report.txt" 等同。
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    set: GlobSet,
}

impl ExtensionFilter {
    /// 构建白名单过滤器
    pub fn new() -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in FILE_PATTERNS {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("无效的文件名模式: {}", pattern))?;
            builder.add(glob);
        }
        let set = builder.build().context("无法构建文件名过滤器")?;
        Ok(Self { set })
    }

    /// 检查文件名 (不含路径) 是否在白名单内
    pub fn accepts(&self, file_name: &str) -> bool {
        self.set.is_match(file_name)
    }

    /// 检查文件名是否为 PDF (忽略大小写)
    pub fn is_pdf(file_name: &str) -> bool {
        file_name.to_lowercase().ends_with(PDF_SUFFIX)
    }

    /// 白名单中的模式数量
    pub fn pattern_count(&self) -> usize {
        FILE_PATTERNS.len()
    }
}
