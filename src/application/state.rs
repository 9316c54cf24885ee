use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::search::dedup_keywords;

/// 持久化的上次搜索请求
///
/// 纯文本格式: 第一行为目录路径，其余每行一个关键词。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRequest {
    pub directory: String,
    pub keywords: Vec<String>,
}

/// 读取状态文件，文件不存在时返回 None
///
/// 兼容旧格式: 关键词在第二行以 "--" 连接时按分隔符拆开。
pub fn load(path: &Path) -> Result<Option<SavedRequest>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("无法读取状态文件: {}", path.display()))?;

    let mut lines = content.lines();
    let directory = match lines.next() {
        Some(line) => line.trim().to_string(),
        None => return Ok(None),
    };

    let mut keywords: Vec<String> = lines
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    // 旧格式: 单行以 "--" 连接多个关键词
    if keywords.len() == 1 && keywords[0].contains("--") {
        let parts: Vec<String> = keywords[0]
            .split("--")
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();
        if parts.len() > 1 {
            keywords = parts;
        }
    }

    Ok(Some(SavedRequest {
        directory,
        keywords: dedup_keywords(keywords),
    }))
}

/// 写入状态文件: 第一行目录，之后每行一个关键词
pub fn save(path: &Path, directory: &str, keywords: &[String]) -> Result<()> {
    let mut content = String::new();
    content.push_str(directory);
    content.push('\n');
    for keyword in keywords {
        content.push_str(keyword);
        content.push('\n');
    }

    fs::write(path, content)
        .with_context(|| format!("无法写入状态文件: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.txt");

        let keywords = vec!["foo".to_string(), "Bar".to_string()];
        save(&path, "/some/dir", &keywords).unwrap();

        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.directory, "/some/dir");
        assert_eq!(loaded.keywords, keywords);
    }

    #[test]
    fn test_round_trip_dedups_keywords() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.txt");

        save(
            &path,
            "/some/dir",
            &["foo".to_string(), "FOO".to_string(), "bar".to_string()],
        )
        .unwrap();

        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.keywords, vec!["foo", "bar"]);
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        assert!(load(&path).unwrap().is_none());
    }

    #[test]
    fn test_legacy_delimiter_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "/old/dir\nfoo--bar--baz\n").unwrap();

        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.directory, "/old/dir");
        assert_eq!(loaded.keywords, vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn test_empty_file_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "").unwrap();
        assert!(load(&path).unwrap().is_none());
    }

    #[test]
    fn test_directory_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "/just/dir\n").unwrap();

        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.directory, "/just/dir");
        assert!(loaded.keywords.is_empty());
    }
}
