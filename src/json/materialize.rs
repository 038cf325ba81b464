//! 值物化
//!
//! 从 tokenizer 中恰好消费一个完整的 JSON 值，构建临时的 [`JsonValue`]。

use std::io::BufRead;

use super::error::{ParseError, SyntaxError};
use super::token::Token;
use super::tokenizer::JsonTokenizer;
use super::value::{JsonNumber, JsonObject, JsonValue};

/// 读取当前位置起的一个完整值。`max_depth` 限制容器嵌套层数（`None` 表示不限制）。
pub(crate) fn materialize<R: BufRead>(
    tokens: &mut JsonTokenizer<R>,
    max_depth: Option<usize>,
) -> Result<JsonValue, ParseError> {
    materialize_at(tokens, max_depth, 0)
}

fn materialize_at<R: BufRead>(
    tokens: &mut JsonTokenizer<R>,
    max_depth: Option<usize>,
    depth: usize,
) -> Result<JsonValue, ParseError> {
    let value = match tokens.next_token()? {
        Some(Token::Null) => JsonValue::Null,
        Some(Token::Bool(b)) => JsonValue::Bool(b),
        Some(Token::String(s)) => JsonValue::String(s),
        Some(Token::Number(text)) => JsonValue::Number(JsonNumber::from_token(text)),
        Some(Token::BeginArray) => {
            enter(tokens, max_depth, depth)?;
            let mut items = Vec::new();
            while !matches!(tokens.peek()?, Some(Token::EndArray)) {
                items.push(materialize_at(tokens, max_depth, depth + 1)?);
            }
            tokens.next_token()?;
            JsonValue::Array(items)
        }
        Some(Token::BeginObject) => {
            enter(tokens, max_depth, depth)?;
            let mut fields = JsonObject::new();
            loop {
                match tokens.next_token()? {
                    Some(Token::EndObject) => break,
                    Some(Token::Name(name)) => {
                        let value = materialize_at(tokens, max_depth, depth + 1)?;
                        fields.insert(name, value);
                    }
                    other => return Err(tokens.unexpected_token("field name", other.as_ref())),
                }
            }
            JsonValue::Object(fields)
        }
        other => return Err(tokens.unexpected_token("a value", other.as_ref())),
    };
    Ok(value)
}

fn enter<R: BufRead>(
    tokens: &JsonTokenizer<R>,
    max_depth: Option<usize>,
    depth: usize,
) -> Result<(), ParseError> {
    match max_depth {
        Some(limit) if depth >= limit => Err(tokens.syntax(SyntaxError::DepthLimit(limit))),
        _ => Ok(()),
    }
}
