/*!
BibTeX 语法解析（nom 组合子）

目标输入形如：

```text
@string{acm = "ACM Press"}

@inproceedings{smith2020,
    author    = {Smith, J.},
    title     = "A {Study}",
    publisher = acm # { Inc.},
    month     = jan,
    year      = 2020,
}
```

- 条目之间的任意文本视为注释并忽略。
- 值由若干片段以 `#` 拼接：`{...}`（允许嵌套花括号）、`"..."`、数字或宏名。
- `@string` / `@preamble` / `@comment` 单独处理；宏在 loader 中展开。
- 进入 `@` 之后的任何失败都是硬错误（cut），不做回退恢复。
*/

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{alpha1, char, multispace0, not_line_ending, one_of},
    combinator::{all_consuming, cut, map, opt, recognize},
    error::{context, convert_error, ErrorKind, ParseError, VerboseError},
    multi::many0,
    sequence::{pair, preceded, terminated, tuple},
    Err, IResult,
};

type Res<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// 不能出现在引用键、字段名、宏名中的字符
const RESERVED: &str = ",{}()\"#=%";

/// 值的一个片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    /// 字面量（已去掉外层定界符）
    Literal(&'a str),
    /// 宏引用，如 `jan`
    Macro(&'a str),
}

/// `name = value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawField<'a> {
    pub(crate) name: &'a str,
    pub(crate) value: Vec<Piece<'a>>,
}

/// 顶层语法单元
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Item<'a> {
    Entry { entry_type: &'a str, key: &'a str, fields: Vec<RawField<'a>> },
    StringDef(RawField<'a>),
    Preamble,
    Comment,
}

/// 解析整个 .bib 文本；失败时返回带行列号的错误描述
pub(crate) fn parse_items(input: &str) -> Result<Vec<Item<'_>>, String> {
    match all_consuming(items)(input) {
        Ok((_, items)) => Ok(items),
        Err(Err::Error(e)) | Err(Err::Failure(e)) => Err(convert_error(input, e)),
        Err(Err::Incomplete(_)) => Err("unexpected end of input".to_string()),
    }
}

fn items(i: &str) -> Res<'_, Vec<Item<'_>>> {
    let (i, items) = many0(preceded(junk, item))(i)?;
    let (i, _) = junk(i)?;
    Ok((i, items))
}

/// 条目之间的自由文本；`%` 到行尾为注释，其中的 `@` 不开启条目
fn junk(i: &str) -> Res<'_, &str> {
    recognize(many0(alt((
        take_while1(|c: char| c != '@' && c != '%'),
        recognize(pair(char('%'), not_line_ending)),
    ))))(i)
}

fn name(i: &str) -> Res<'_, &str> {
    take_while1(|c: char| !c.is_whitespace() && !RESERVED.contains(c))(i)
}

fn item(i: &str) -> Res<'_, Item<'_>> {
    let (i, _) = char('@')(i)?;
    let (i, kind) = cut(context("entry type", preceded(multispace0, alpha1)))(i)?;
    let (i, _) = multispace0(i)?;

    match kind.to_ascii_lowercase().as_str() {
        "comment" => comment(i),
        "preamble" => cut(context("@preamble", |i| enclosed(i, |i, _| map(preceded(multispace0, value), |_| Item::Preamble)(i))))(i),
        "string" => cut(context("@string", |i| enclosed(i, |i, _| map(field, Item::StringDef)(i))))(i),
        _ => cut(context("entry", |i| {
            enclosed(i, |i, _| {
                let (i, (key, fields)) = entry_body(i)?;
                Ok((i, Item::Entry { entry_type: kind, key, fields }))
            })
        }))(i),
    }
}

/// `{ ... }` 或 `( ... )`，闭合符须与开启符对应
fn enclosed<'a, O>(i: &'a str, inner: impl Fn(&'a str, char) -> Res<'a, O>) -> Res<'a, O> {
    let (i, open) = context("`{` or `(`", one_of("{("))(i)?;
    let close = if open == '{' { '}' } else { ')' };
    let (i, out) = inner(i, close)?;
    let (i, _) = context("closing delimiter", preceded(multispace0, char(close)))(i)?;
    Ok((i, out))
}

/// `@comment{...}` 跳过配平内容；其他形式跳到行尾
fn comment(i: &str) -> Res<'_, Item<'_>> {
    if i.starts_with(['{', '(']) {
        cut(context("@comment", |i| enclosed(i, |i, close| map(body_until(close), |_| Item::Comment)(i))))(i)
    } else {
        map(not_line_ending, |_| Item::Comment)(i)
    }
}

/// 引用键 + 字段列表（允许末尾多余的逗号）
fn entry_body(i: &str) -> Res<'_, (&str, Vec<RawField<'_>>)> {
    let (i, key) = context("citation key", preceded(multispace0, name))(i)?;
    let (i, fields) = many0(preceded(tuple((multispace0, char(','), multispace0)), field))(i)?;
    let (i, _) = opt(preceded(multispace0, char(',')))(i)?;
    Ok((i, (key, fields)))
}

fn field(i: &str) -> Res<'_, RawField<'_>> {
    let (i, name) = preceded(multispace0, name)(i)?;
    let (i, _) = cut(context("`=` after field name", preceded(multispace0, char('='))))(i)?;
    let (i, value) = cut(context("field value", preceded(multispace0, value)))(i)?;
    Ok((i, RawField { name, value }))
}

/// `piece (# piece)*`
fn value(i: &str) -> Res<'_, Vec<Piece<'_>>> {
    let (i, (first, rest)) = pair(
        piece,
        many0(preceded(tuple((multispace0, char('#'), multispace0)), cut(piece))),
    )(i)?;
    let mut pieces = Vec::with_capacity(rest.len() + 1);
    pieces.push(first);
    pieces.extend(rest);
    Ok((i, pieces))
}

fn piece(i: &str) -> Res<'_, Piece<'_>> {
    alt((
        map(
            preceded(char('{'), cut(context("braced value", terminated(body_until('}'), char('}'))))),
            Piece::Literal,
        ),
        map(
            preceded(char('"'), cut(context("quoted value", terminated(body_until('"'), char('"'))))),
            Piece::Literal,
        ),
        map(name, bare),
    ))(i)
}

/// 纯数字视为字面量，其余视为宏名
fn bare(s: &str) -> Piece<'_> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        Piece::Literal(s)
    } else {
        Piece::Macro(s)
    }
}

/// 读取到深度为 0 的 `close` 之前（不消耗 `close`），内部花括号须配平
fn body_until(close: char) -> impl Fn(&str) -> IResult<&str, &str, VerboseError<&str>> {
    move |i: &str| {
        let mut depth = 0usize;
        for (idx, c) in i.char_indices() {
            if depth == 0 && c == close {
                return Ok((&i[idx..], &i[..idx]));
            }
            match c {
                '{' => depth += 1,
                '}' if depth == 0 => {
                    return Err(Err::Error(VerboseError::from_error_kind(&i[idx..], ErrorKind::Char)));
                }
                '}' => depth -= 1,
                _ => {}
            }
        }
        Err(Err::Error(VerboseError::from_error_kind(&i[i.len()..], ErrorKind::Eof)))
    }
}
