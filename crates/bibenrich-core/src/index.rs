//! 引用键索引
use std::collections::HashMap;
use tracing::debug;

use crate::types::BibEntry;

/// `key -> 条目` 映射；一次构建，之后只读
///
/// 重复 key 以后出现者为准（last-wins）。
#[derive(Debug, Default, Clone)]
pub struct BibIndex {
    entries: HashMap<String, BibEntry>,
    duplicates: usize,
}

impl BibIndex {
    /// 按文件顺序插入全部条目
    pub fn from_entries(entries: impl IntoIterator<Item = BibEntry>) -> Self {
        let mut index = Self::default();
        for entry in entries {
            if let Some(prev) = index.entries.insert(entry.key.clone(), entry) {
                debug!(key = %prev.key, "duplicate bibliography key, later entry wins");
                index.duplicates += 1;
            }
        }
        index
    }

    pub fn get(&self, key: &str) -> Option<&BibEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 被覆盖的重复条目数
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

impl FromIterator<BibEntry> for BibIndex {
    fn from_iter<T: IntoIterator<Item = BibEntry>>(iter: T) -> Self {
        Self::from_entries(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let index: BibIndex = vec![
            BibEntry::new("article", "a").with_field("title", "A"),
            BibEntry::new("book", "b"),
        ]
        .into_iter()
        .collect();
        assert_eq!(index.len(), 2);
        assert!(index.get("b").is_some());
        assert_eq!(index.get("a").and_then(|e| e.get("title")), Some("A"));
        assert!(index.get("A").is_none(), "keys are case-sensitive");
        assert_eq!(index.duplicates(), 0);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let index = BibIndex::from_entries([
            BibEntry::new("article", "dup").with_field("title", "first"),
            BibEntry::new("book", "dup").with_field("title", "second"),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.duplicates(), 1);
        let entry = index.get("dup").unwrap();
        assert_eq!(entry.entry_type, "book");
        assert_eq!(entry.get("title"), Some("second"));
    }

    #[test]
    fn test_empty() {
        let index = BibIndex::default();
        assert!(index.is_empty());
        assert!(index.get("anything").is_none());
    }
}
