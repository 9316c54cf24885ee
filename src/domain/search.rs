use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::extractor::TextUnit;

/// 搜索请求校验错误
#[derive(Debug, Error)]
pub enum RequestError {
    /// 目录不存在或不是目录
    #[error("无效的目录: '{0}'")]
    InvalidDirectory(String),
    /// 关键词列表为空
    #[error("关键词列表为空")]
    EmptyKeywords,
}

/// 一次搜索请求: 根目录 + 去重后的关键词列表
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub directory: PathBuf,
    pub keywords: Vec<String>,
}

impl SearchRequest {
    /// 创建搜索请求，校验目录有效性并按首次出现顺序去重关键词
    pub fn new(directory: PathBuf, keywords: Vec<String>) -> Result<Self, RequestError> {
        if !directory.is_dir() {
            return Err(RequestError::InvalidDirectory(
                directory.display().to_string(),
            ));
        }

        let keywords = dedup_keywords(keywords);
        if keywords.is_empty() {
            return Err(RequestError::EmptyKeywords);
        }

        Ok(Self { directory, keywords })
    }
}

/// 关键词去重，保留首次出现的顺序和大小写
///
/// 比较时忽略大小写: "Foo" 和 "foo" 视为同一个关键词，保留先出现的写法。
pub fn dedup_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut result = Vec::new();

    for keyword in keywords {
        let keyword = keyword.trim().to_string();
        if keyword.is_empty() {
            continue;
        }
        let lower = keyword.to_lowercase();
        if !seen.contains(&lower) {
            seen.push(lower);
            result.push(keyword);
        }
    }

    result
}

/// 单个匹配单元: 行号或页号 (1 起始) 及该单元内的词位置 (0 起始)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub unit: u64,
    pub positions: Vec<usize>,
}

/// 单个文件对单个关键词的搜索结果
#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub keyword: String,
    pub occurrences: Vec<Occurrence>,
}

impl FileResult {
    /// 该文件是否包含至少一处匹配
    pub fn is_match(&self) -> bool {
        !self.occurrences.is_empty()
    }

    /// 匹配总数 (所有单元的词位置数量之和)
    pub fn match_count(&self) -> u64 {
        self.occurrences.iter().map(|o| o.positions.len() as u64).sum()
    }
}

/// 返回与关键词相等的词位置 (0 起始)
///
/// 仅整词匹配，比较时忽略大小写，子串不算匹配。
pub fn word_positions(tokens: &[&str], keyword: &str) -> Vec<usize> {
    let needle = keyword.to_lowercase();
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.to_lowercase() == needle)
        .map(|(index, _)| index)
        .collect()
}

/// 在已提取的文本单元中查找关键词的所有匹配
///
/// 每个单元按空白字符切分为词，只保留有匹配的单元。
pub fn find_occurrences(units: &[TextUnit], keyword: &str) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();

    for unit in units {
        let tokens: Vec<&str> = unit.text.split_whitespace().collect();
        let positions = word_positions(&tokens, keyword);
        if !positions.is_empty() {
            occurrences.push(Occurrence {
                unit: unit.index,
                positions,
            });
        }
    }

    occurrences
}

/// 文件所在目录 (用于匹配目录统计)
pub fn containing_directory(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_word_positions_basic() {
        let tokens = vec!["foo", "bar", "foo"];
        assert_eq!(word_positions(&tokens, "foo"), vec![0, 2]);
    }

    #[test]
    fn test_word_positions_case_insensitive() {
        let tokens = vec!["Foo", "BAR", "fOO"];
        assert_eq!(word_positions(&tokens, "foo"), vec![0, 2]);
        assert_eq!(word_positions(&tokens, "FOO"), vec![0, 2]);
        assert_eq!(word_positions(&tokens, "bar"), vec![1]);
    }

    #[test]
    fn test_word_positions_no_substring_match() {
        // 整词匹配: "foobar" 不算 "foo" 的匹配
        let tokens = vec!["foobar", "foo."];
        assert!(word_positions(&tokens, "foo").is_empty());
    }

    #[test]
    fn test_word_positions_empty_tokens() {
        let tokens: Vec<&str> = vec![];
        assert!(word_positions(&tokens, "foo").is_empty());
    }

    #[test]
    fn test_find_occurrences_unit_numbers() {
        let units = vec![
            TextUnit::new(1, "foo bar foo"),
            TextUnit::new(2, "nothing here"),
            TextUnit::new(3, "bar foo"),
        ];

        let occurrences = find_occurrences(&units, "foo");
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[0].unit, 1);
        assert_eq!(occurrences[0].positions, vec![0, 2]);
        assert_eq!(occurrences[1].unit, 3);
        assert_eq!(occurrences[1].positions, vec![1]);
    }

    #[test]
    fn test_dedup_keywords_preserves_order() {
        let keywords = vec![
            "beta".to_string(),
            "alpha".to_string(),
            "beta".to_string(),
            "gamma".to_string(),
        ];
        assert_eq!(dedup_keywords(keywords), vec!["beta", "alpha", "gamma"]);
    }

    #[test]
    fn test_dedup_keywords_case_insensitive() {
        // 保留首次出现的写法
        let keywords = vec!["Foo".to_string(), "foo".to_string(), "FOO".to_string()];
        assert_eq!(dedup_keywords(keywords), vec!["Foo"]);
    }

    #[test]
    fn test_dedup_keywords_drops_blank() {
        let keywords = vec!["".to_string(), "  ".to_string(), "x".to_string()];
        assert_eq!(dedup_keywords(keywords), vec!["x"]);
    }

    #[test]
    fn test_request_rejects_invalid_directory() {
        let result = SearchRequest::new(
            PathBuf::from("/不存在的目录/xyz"),
            vec!["foo".to_string()],
        );
        assert!(matches!(result, Err(RequestError::InvalidDirectory(_))));
    }

    #[test]
    fn test_request_rejects_empty_keywords() {
        let dir = tempdir().unwrap();
        let result = SearchRequest::new(dir.path().to_path_buf(), vec![]);
        assert!(matches!(result, Err(RequestError::EmptyKeywords)));
    }

    #[test]
    fn test_request_dedups_keywords() {
        let dir = tempdir().unwrap();
        let request = SearchRequest::new(
            dir.path().to_path_buf(),
            vec!["a".to_string(), "A".to_string(), "b".to_string()],
        )
        .unwrap();
        assert_eq!(request.keywords, vec!["a", "b"]);
    }

    #[test]
    fn test_file_result_match_count() {
        let result = FileResult {
            path: PathBuf::from("a.txt"),
            keyword: "foo".to_string(),
            occurrences: vec![
                Occurrence { unit: 1, positions: vec![0, 2] },
                Occurrence { unit: 4, positions: vec![1] },
            ],
        };
        assert!(result.is_match());
        assert_eq!(result.match_count(), 3);
    }
}
