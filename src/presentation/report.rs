use crate::domain::search::FileResult;
use crate::domain::walker::RunSummary;

/// 报告文件头部
pub const OUTPUT_HEADER: &str = "搜索结果";
/// 报告分节分隔线
pub const OUTPUT_SEPARATOR: &str =
    "==================================================";

/// 格式化单个文件的搜索结果为报告文本 (纯格式化，无 I/O)
///
/// 有匹配时输出表头和 (行/页, 词位置) 两列表格；
/// 零匹配的结果输出一行 "未找到匹配"。
pub fn format_file_result(result: &FileResult) -> String {
    if result.occurrences.is_empty() {
        return format!(
            "在文件 {} 中未找到 '{}' 的匹配\n\n",
            result.path.display(),
            result.keyword
        );
    }

    let mut out = String::new();
    out.push_str(&format!(
        "在文件 {} 中找到 '{}' 的匹配:\n",
        result.path.display(),
        result.keyword
    ));
    out.push_str(&format!("{:<10} | {}\n", "行/页", "词位置"));
    out.push_str(&"-".repeat(30));
    out.push('\n');

    for occurrence in &result.occurrences {
        out.push_str(&format!(
            "{:<10} | {:?}\n",
            occurrence.unit, occurrence.positions
        ));
    }
    out.push('\n');

    out
}

/// 格式化遍历摘要为报告文本 (纯格式化，无 I/O)
///
/// 始终输出计数；`full` 开启时追加访问过的目录和文件的完整列表。
pub fn format_summary(summary: &RunSummary, full: bool) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(OUTPUT_SEPARATOR);
    out.push('\n');
    out.push_str("搜索摘要\n");
    out.push_str(OUTPUT_SEPARATOR);
    out.push('\n');

    out.push_str(&format!(
        "搜索关键词: {}\n",
        summary.keywords_searched.join(", ")
    ));
    out.push_str(&format!("访问目录数: {}\n", summary.directory_count()));
    out.push_str(&format!("扫描文件数: {}\n", summary.file_count()));
    out.push_str(&format!(
        "匹配目录数: {}\n",
        summary.matched_directory_count()
    ));

    if !summary.matched_directories.is_empty() {
        out.push_str("匹配的目录:\n");
        let mut matched: Vec<_> = summary.matched_directories.iter().collect();
        matched.sort();
        for directory in matched {
            out.push_str(&format!("  {}\n", directory.display()));
        }
    }

    if full {
        out.push_str("访问过的目录:\n");
        let mut visited: Vec<_> = summary.directories_visited.iter().collect();
        visited.sort();
        for directory in visited {
            out.push_str(&format!("  {}\n", directory.display()));
        }

        out.push_str("扫描过的文件:\n");
        for file in &summary.files_visited {
            out.push_str(&format!("  {}\n", file.display()));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::Occurrence;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn sample_result() -> FileResult {
        FileResult {
            path: PathBuf::from("/data/a.txt"),
            keyword: "foo".to_string(),
            occurrences: vec![
                Occurrence {
                    unit: 1,
                    positions: vec![0, 2],
                },
                Occurrence {
                    unit: 5,
                    positions: vec![3],
                },
            ],
        }
    }

    fn sample_summary() -> RunSummary {
        RunSummary {
            directories_visited: HashSet::from([PathBuf::from("/data"), PathBuf::from("/data/sub")]),
            files_visited: vec![PathBuf::from("/data/a.txt"), PathBuf::from("/data/sub/b.txt")],
            matched_directories: HashSet::from([PathBuf::from("/data")]),
            keywords_searched: vec!["foo".to_string(), "bar".to_string()],
        }
    }

    #[test]
    fn test_format_file_result_table() {
        let text = format_file_result(&sample_result());
        assert!(text.contains("在文件 /data/a.txt 中找到 'foo' 的匹配:"));
        assert!(text.contains("行/页"));
        assert!(text.contains("词位置"));
        assert!(text.contains("| [0, 2]"));
        assert!(text.contains("| [3]"));
    }

    #[test]
    fn test_format_file_result_no_match() {
        let result = FileResult {
            path: PathBuf::from("/data/a.txt"),
            keyword: "foo".to_string(),
            occurrences: vec![],
        };
        let text = format_file_result(&result);
        assert!(text.contains("未找到匹配"));
        assert!(!text.contains("行/页"));
    }

    #[test]
    fn test_format_summary_counts() {
        let text = format_summary(&sample_summary(), false);
        assert!(text.contains("搜索关键词: foo, bar"));
        assert!(text.contains("访问目录数: 2"));
        assert!(text.contains("扫描文件数: 2"));
        assert!(text.contains("匹配目录数: 1"));
        assert!(text.contains("匹配的目录:"));
        // 非 full 模式不列出全部访问记录
        assert!(!text.contains("访问过的目录:"));
        assert!(!text.contains("扫描过的文件:"));
    }

    #[test]
    fn test_format_summary_full_listing() {
        let text = format_summary(&sample_summary(), true);
        assert!(text.contains("访问过的目录:"));
        assert!(text.contains("/data/sub"));
        assert!(text.contains("扫描过的文件:"));
        assert!(text.contains("/data/sub/b.txt"));
    }
}
