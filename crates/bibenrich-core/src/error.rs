//! 错误类型
use std::path::PathBuf;

/// 批处理过程中的致命错误（均不在内部重试或恢复）
///
/// 单条记录未命中不是错误，只计入 `MergeStats::missing`。
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// 文件无法读取或写入
    #[error("cannot access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// .bib 文件语法错误
    #[error("malformed bibliography {}:\n{message}", .path.display())]
    BibParse { path: PathBuf, message: String },

    /// 输入 JSON 语法错误
    #[error("malformed JSON in {}: {source}", .path.display())]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// 输入 JSON 顶层不是数组
    #[error("input JSON must be an array of objects, found {found}")]
    Schema { found: &'static str },
}

pub type Result<T> = std::result::Result<T, EnrichError>;

impl EnrichError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess { path: path.into(), source }
    }
}
