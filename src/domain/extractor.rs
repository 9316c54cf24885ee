use std::fs;
use std::path::Path;

use thiserror::Error;

/// 文本提取错误
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 文件读取失败
    #[error("无法读取文件: {0}")]
    FileRead(#[source] std::io::Error),
    /// PDF 结构解析失败
    #[error("PDF 解析失败: {0}")]
    PdfParse(String),
    /// PDF 提取能力不可用
    #[error("PDF 支持不可用，已跳过该文件")]
    PdfUnavailable,
}

/// 一个可搜索的文本单元: 文本文件的一行或 PDF 的一页
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    /// 行号或页号 (1 起始)
    pub index: u64,
    /// 该单元的原始文本
    pub text: String,
}

impl TextUnit {
    pub fn new(index: u64, text: &str) -> Self {
        Self {
            index,
            text: text.to_string(),
        }
    }
}

/// 文本提取器
///
/// PDF 能力在启动时确定一次: 编译时 `pdf` feature 开启且运行时配置允许。
#[derive(Debug, Clone, Copy)]
pub struct TextExtractor {
    pdf_enabled: bool,
}

impl TextExtractor {
    pub fn new(pdf_enabled: bool) -> Self {
        Self {
            pdf_enabled: pdf_enabled && Self::pdf_compiled(),
        }
    }

    /// PDF 提取能力是否被编译进本二进制
    pub fn pdf_compiled() -> bool {
        cfg!(feature = "pdf")
    }

    /// 本提取器实例是否可处理 PDF
    pub fn pdf_available(&self) -> bool {
        self.pdf_enabled
    }

    /// 提取文件的全部文本单元
    ///
    /// 文本文件按行提取，PDF 按页提取。任何失败都作为错误返回，
    /// 由调用方上报后跳过该文件，遍历继续。
    pub fn extract(&self, path: &Path, is_pdf: bool) -> Result<Vec<TextUnit>, ExtractError> {
        if is_pdf {
            if !self.pdf_enabled {
                return Err(ExtractError::PdfUnavailable);
            }
            self.extract_pdf(path)
        } else {
            self.extract_text(path)
        }
    }

    /// 按行提取文本文件
    ///
    /// 宽容解码: 非法字节序列被替换为 U+FFFD 而不是报错。
    fn extract_text(&self, path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
        let bytes = fs::read(path).map_err(ExtractError::FileRead)?;
        let text = String::from_utf8_lossy(&bytes);

        Ok(text
            .lines()
            .enumerate()
            .map(|(index, line)| TextUnit::new(index as u64 + 1, line))
            .collect())
    }

    /// 按页提取 PDF 文件，空页被跳过 (不产生单元)
    #[cfg(feature = "pdf")]
    fn extract_pdf(&self, path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
        let pages = pdf_extract::extract_text_by_pages(path)
            .map_err(|err| ExtractError::PdfParse(err.to_string()))?;

        Ok(pages
            .into_iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(index, text)| TextUnit {
                index: index as u64 + 1,
                text,
            })
            .collect())
    }

    #[cfg(not(feature = "pdf"))]
    fn extract_pdf(&self, _path: &Path) -> Result<Vec<TextUnit>, ExtractError> {
        Err(ExtractError::PdfUnavailable)
    }
}
