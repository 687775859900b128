//! 批处理主流程：加载 → 查找 → 合并 → 写出
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{EnrichError, Result};
use crate::index::BibIndex;
use crate::loader::load_index;
use crate::options::EnrichOptions;
use crate::types::MergeStats;
use crate::writer::write_entry;

/// 执行一次完整的批处理
///
/// 顺序：解析 .bib → 解析输入 JSON → 逐项合并 → 写出。
/// 只有前面全部成功才会创建输出文件。
pub fn run(opts: &EnrichOptions) -> Result<MergeStats> {
    let index = load_index(&opts.bibliography)?;
    info!(entries = index.len(), "bibliography indexed");

    let document = read_json(&opts.input)?;
    let (records, stats) = enrich_document(document, &index, opts)?;

    write_json(&opts.output, &records)?;
    info!(total = stats.total, matched = stats.matched, missing = stats.missing, output = ?opts.output, "output written");
    Ok(stats)
}

/// 校验顶层为数组后逐项合并
pub fn enrich_document(document: Value, index: &BibIndex, opts: &EnrichOptions) -> Result<(Vec<Value>, MergeStats)> {
    match document {
        Value::Array(records) => Ok(enrich_records(records, index, opts)),
        other => Err(EnrichError::Schema { found: json_kind(&other) }),
    }
}

/// 逐项合并（保持顺序）
/// - 非对象元素原样输出，不计入 missing
/// - 对象：`key_field` 为非空字符串且命中索引时附加 `output_field`，否则 missing += 1
pub fn enrich_records(records: Vec<Value>, index: &BibIndex, opts: &EnrichOptions) -> (Vec<Value>, MergeStats) {
    let mut stats = MergeStats { total: records.len(), ..MergeStats::default() };

    let enriched = records
        .into_iter()
        .map(|record| {
            let mut obj = match record {
                Value::Object(obj) => obj,
                other => return other,
            };
            stats.objects += 1;

            let entry = obj
                .get(&opts.key_field)
                .and_then(Value::as_str)
                .filter(|key| !key.is_empty())
                .and_then(|key| index.get(key));
            match entry {
                Some(entry) => {
                    let text = write_entry(entry, &opts.writer);
                    obj.insert(opts.output_field.clone(), Value::String(text));
                }
                None => {
                    debug!(key = ?obj.get(&opts.key_field), "no bibliography entry");
                    stats.missing += 1;
                }
            }
            Value::Object(obj)
        })
        .collect();

    stats.matched = stats.total - stats.missing;
    (enriched, stats)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let file = File::open(path).map_err(|e| EnrichError::file_access(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        if source.is_io() {
            EnrichError::file_access(path, source.into())
        } else {
            EnrichError::JsonParse { path: path.to_path_buf(), source }
        }
    })
}

/// 2 空格缩进；非 ASCII 字符原样写出
fn write_json(path: &Path, records: &[Value]) -> Result<()> {
    let file = File::create(path).map_err(|e| EnrichError::file_access(path, e))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, records).map_err(|e| EnrichError::file_access(path, e.into()))?;
    out.flush().map_err(|e| EnrichError::file_access(path, e))?;
    Ok(())
}
