//! .bib 文件加载：解析 → 宏展开 → 建索引
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{EnrichError, Result};
use crate::index::BibIndex;
use crate::parser::{parse_items, Item, Piece};
use crate::types::BibEntry;

/// 预定义的月份宏
const MONTHS: [(&str, &str); 12] = [
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// 读取并解析 .bib 文件，构建 `key -> 条目` 索引
pub fn load_index(path: &Path) -> Result<BibIndex> {
    let text = std::fs::read_to_string(path).map_err(|e| EnrichError::file_access(path, e))?;
    let entries = parse_bibliography(&text)
        .map_err(|message| EnrichError::BibParse { path: path.to_path_buf(), message })?;
    let parsed = entries.len();
    let index = BibIndex::from_entries(entries);
    debug!(?path, parsed, indexed = index.len(), duplicates = index.duplicates(), "bibliography loaded");
    Ok(index)
}

/// 将 .bib 文本解析为条目列表（文件顺序）
///
/// 条目类型与字段名转为小写；`@string` 宏按出现顺序定义，仅对其后的内容生效。
pub fn parse_bibliography(text: &str) -> std::result::Result<Vec<BibEntry>, String> {
    let items = parse_items(text)?;
    let mut macros: HashMap<String, String> =
        MONTHS.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    let mut entries = Vec::new();

    for item in items {
        match item {
            Item::StringDef(def) => {
                let value = resolve(&def.value, &macros);
                macros.insert(def.name.to_lowercase(), value);
            }
            Item::Entry { entry_type, key, fields } => {
                let mut entry = BibEntry::new(entry_type.to_lowercase(), key);
                for f in fields {
                    let value = resolve(&f.value, &macros);
                    entry.fields.insert(f.name.to_lowercase(), value);
                }
                entries.push(entry);
            }
            Item::Preamble | Item::Comment => {}
        }
    }

    Ok(entries)
}

/// 拼接值片段；未定义的宏保留宏名本身
fn resolve(pieces: &[Piece<'_>], macros: &HashMap<String, String>) -> String {
    let mut out = String::new();
    for piece in pieces {
        match piece {
            Piece::Literal(s) => out.push_str(s),
            Piece::Macro(name) => match macros.get(&name.to_lowercase()) {
                Some(v) => out.push_str(v),
                None => {
                    warn!(name = %name, "undefined @string macro, using its name");
                    out.push_str(name);
                }
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_in_file_order() {
        let entries = parse_bibliography(
            r#"
            @ARTICLE{smith2020,
              Title = {A Study},
              AUTHOR = "Smith, J.",
              year = 2020
            }
            @book{doe1999, title = {Other}}
            "#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        let smith = &entries[0];
        assert_eq!(smith.entry_type, "article");
        assert_eq!(smith.key, "smith2020");
        let names: Vec<&str> = smith.fields.keys().map(String::as_str).collect();
        assert_eq!(names, ["title", "author", "year"]);
        assert_eq!(smith.get("author"), Some("Smith, J."));
        assert_eq!(smith.get("year"), Some("2020"));
        assert_eq!(entries[1].key, "doe1999");
    }

    #[test]
    fn test_macro_expansion() {
        let entries = parse_bibliography(
            r#"
            @string{ACM = "ACM"}
            @string{acmp = acm # " Press"}
            @misc{k, publisher = acmp # {, NY}, month = Jan, note = nodef}
            "#,
        )
        .unwrap();
        let k = &entries[0];
        assert_eq!(k.get("publisher"), Some("ACM Press, NY"));
        assert_eq!(k.get("month"), Some("January"));
        assert_eq!(k.get("note"), Some("nodef"));
    }

    #[test]
    fn test_repeated_field_keeps_position() {
        let entries = parse_bibliography("@misc{k, a = {1}, b = {2}, a = {3}}").unwrap();
        let fields: Vec<(&str, &str)> =
            entries[0].fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(fields, [("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_duplicates_survive_until_indexed() {
        let entries = parse_bibliography("@misc{k, n = {1}}\n@misc{k, n = {2}}").unwrap();
        assert_eq!(entries.len(), 2);
        let index = BibIndex::from_entries(entries);
        assert_eq!(index.get("k").and_then(|e| e.get("n")), Some("2"));
    }

    #[test]
    fn test_load_index_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.bib");
        assert!(matches!(load_index(&missing), Err(EnrichError::FileAccess { .. })));

        let broken = dir.path().join("broken.bib");
        std::fs::write(&broken, "@article{k, title = {never closed").unwrap();
        match load_index(&broken) {
            Err(EnrichError::BibParse { path, message }) => {
                assert_eq!(path, broken);
                assert!(!message.is_empty());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
