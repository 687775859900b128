//! 批处理选项与序列化选项（模块）
use std::path::PathBuf;

/// 输入对象中用于查找条目的字段名
pub const DEFAULT_KEY_FIELD: &str = "bibtexKey";
/// 命中时附加到对象上的字段名
pub const DEFAULT_OUTPUT_FIELD: &str = "oldbibtex";

/// 条目序列化选项
/// - 默认：两空格缩进、行尾逗号、按载入顺序输出字段、不对齐等号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// 字段缩进
    pub indent: String,
    /// 对齐 `=`（按最长字段名补空格）
    pub align_values: bool,
    /// 逗号置于行首
    pub comma_first: bool,
    /// 按字段名排序输出；默认保持载入顺序
    pub sort_fields: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            align_values: false,
            comma_first: false,
            sort_fields: false,
        }
    }
}

/// 批处理选项
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// 输入 JSON（数组）
    pub input: PathBuf,
    /// .bib 文件
    pub bibliography: PathBuf,
    /// 输出 JSON；存在则覆盖
    pub output: PathBuf,
    pub key_field: String,
    pub output_field: String,
    pub writer: WriterOptions,
}

impl EnrichOptions {
    pub fn new(input: impl Into<PathBuf>, bibliography: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            bibliography: bibliography.into(),
            output: output.into(),
            key_field: DEFAULT_KEY_FIELD.to_string(),
            output_field: DEFAULT_OUTPUT_FIELD.to_string(),
            writer: WriterOptions::default(),
        }
    }
}
