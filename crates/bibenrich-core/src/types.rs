//! 公共类型（对外暴露）
use indexmap::IndexMap;
use std::fmt;

/// 单个参考文献条目
///
/// `entry_type` 与字段名均为小写；字段按首次出现的顺序保存。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    pub key: String,
    pub entry_type: String,
    pub fields: IndexMap<String, String>,
}

impl BibEntry {
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self { key: key.into(), entry_type: entry_type.into(), fields: IndexMap::new() }
    }

    /// 追加字段；同名字段保留原位置，值以后者为准
    #[cfg(test)]
    pub(crate) fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// 批处理统计（便于 CLI 打印）
///
/// `total` 统计数组中的全部元素（含非对象），`missing` 只统计对象，
/// 因此 `matched = total - missing`。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub total: usize,
    pub objects: usize,
    pub matched: usize,
    pub missing: usize,
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} items: {} matched, {} missing.",
            self.total, self.matched, self.missing
        )
    }
}
