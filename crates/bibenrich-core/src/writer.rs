//! 条目序列化（BibTeX 文本）
use crate::options::WriterOptions;
use crate::types::BibEntry;

/// 以默认格式序列化单个条目
///
/// ```text
/// @article{smith2020,
///   title = {A Study},
///   author = {Smith, J.}
/// }
/// ```
pub fn entry_to_bibtex(entry: &BibEntry) -> String {
    write_entry(entry, &WriterOptions::default())
}

/// 按给定选项序列化单个条目；结果以且仅以一个换行结尾
pub fn write_entry(entry: &BibEntry, opts: &WriterOptions) -> String {
    let mut fields: Vec<(&String, &String)> = entry.fields.iter().collect();
    if opts.sort_fields {
        fields.sort_by(|a, b| a.0.cmp(b.0));
    }
    let width = if opts.align_values {
        fields.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0)
    } else {
        0
    };

    let mut out = format!("@{}{{{}", entry.entry_type, entry.key);
    for (name, value) in fields {
        let line = format!("{name:<width$} = {{{value}}}");
        if opts.comma_first {
            out.push('\n');
            out.push_str(&opts.indent);
            out.push_str(", ");
        } else {
            out.push_str(",\n");
            out.push_str(&opts.indent);
        }
        out.push_str(&line);
    }
    out.push_str("\n}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smith() -> BibEntry {
        BibEntry::new("article", "smith2020")
            .with_field("title", "A Study")
            .with_field("author", "Smith, J.")
    }

    #[test]
    fn test_default_format() {
        assert_eq!(
            entry_to_bibtex(&smith()),
            "@article{smith2020,\n  title = {A Study},\n  author = {Smith, J.}\n}\n"
        );
    }

    #[test]
    fn test_single_trailing_newline_and_idempotent() {
        let entry = smith();
        let first = entry_to_bibtex(&entry);
        let second = entry_to_bibtex(&entry);
        assert_eq!(first, second);
        assert!(first.ends_with("}\n"));
        assert!(!first.ends_with("\n\n"));
        assert!(!first.contains(",\n}"), "no trailing comma on last field");
    }

    #[test]
    fn test_entry_without_fields() {
        assert_eq!(entry_to_bibtex(&BibEntry::new("misc", "k")), "@misc{k\n}\n");
    }

    #[test]
    fn test_values_kept_verbatim() {
        let entry = BibEntry::new("book", "k").with_field("title", "The {RNA} World\n  of \"Ä\"");
        assert_eq!(entry_to_bibtex(&entry), "@book{k,\n  title = {The {RNA} World\n  of \"Ä\"}\n}\n");
    }

    #[test]
    fn test_align_values() {
        let opts = WriterOptions { align_values: true, ..WriterOptions::default() };
        assert_eq!(
            write_entry(&smith(), &opts),
            "@article{smith2020,\n  title  = {A Study},\n  author = {Smith, J.}\n}\n"
        );
    }

    #[test]
    fn test_comma_first_and_sorted() {
        let opts = WriterOptions {
            indent: "\t".to_string(),
            comma_first: true,
            sort_fields: true,
            ..WriterOptions::default()
        };
        assert_eq!(
            write_entry(&smith(), &opts),
            "@article{smith2020\n\t, author = {Smith, J.}\n\t, title = {A Study}\n}\n"
        );
    }

    #[test]
    fn test_output_parses_back() {
        let text = entry_to_bibtex(&smith());
        let parsed = crate::loader::parse_bibliography(&text).unwrap();
        assert_eq!(parsed, vec![smith()]);
    }
}
