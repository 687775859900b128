//! 参考文献补全核心库
//!
//! 处理流程（单次批处理，串行执行）：
//! - 读取 .bib 文件，解析为 `key -> 条目` 的索引（重复 key 后者覆盖前者）。
//! - 读取 JSON 数组，逐个对象按 `bibtexKey` 查找条目。
//! - 命中则附加 `oldbibtex` 字段（条目的规范 BibTeX 文本），未命中计入 missing。
//! - 以 2 空格缩进写出 JSON，保留非 ASCII 字符与对象键顺序。

mod error;
mod types;
mod options;
mod parser;
mod index;
mod loader;
mod writer;
mod merge;

pub use error::{EnrichError, Result};
pub use types::{BibEntry, MergeStats};
pub use options::{EnrichOptions, WriterOptions, DEFAULT_KEY_FIELD, DEFAULT_OUTPUT_FIELD};
pub use index::BibIndex;
pub use loader::{load_index, parse_bibliography};
pub use writer::{entry_to_bibtex, write_entry};
pub use merge::{enrich_document, enrich_records, run};
