use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ReportError, Result};
use crate::models::Product;

/// 递归列出销量目录下的所有普通文件 (按路径排序)
pub fn list_sales_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            ReportError::io(path, e.into())
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// 根据文件名判断产品: `Basic.txt` -> Basic
pub fn product_for(path: &Path) -> Result<Product> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    stem.parse().map_err(|_| ReportError::UnknownProduct {
        path: path.to_path_buf(),
        name: stem.to_string(),
    })
}

/// 读取每日销量文件: 跳过首行表头, 其余每行一个非负整数 (存储列为 int4)
pub fn read_sales_counts(path: &Path) -> Result<Vec<i64>> {
    let content = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    parse_sales_counts(path, &content)
}

fn parse_sales_counts(path: &Path, content: &str) -> Result<Vec<i64>> {
    let lines: Vec<&str> = content.lines().skip(1).collect();
    // 末尾空行忽略, 中间空行视为格式错误
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(0, |i| i + 1);

    lines[..end]
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            line.trim()
                .parse::<i32>()
                .ok()
                .filter(|n| *n >= 0)
                .map(i64::from)
                .ok_or_else(|| ReportError::MalformedLine {
                    path: path.to_path_buf(),
                    line: idx + 2,
                    content: line.to_string(),
                })
        })
        .collect()
}
