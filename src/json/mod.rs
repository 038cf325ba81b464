//! JSON 拉取式解析
//!
//! 按需从字节流中逐个读取 JSON token，并可把单个值物化为
//! [`JsonValue`]（保留数字原文与字段顺序）。

// 子模块声明
mod error;
mod materialize;
mod token;
mod tokenizer;
mod value;

// 重新导出公共接口
pub use error::{ParseError, SyntaxError};
pub(crate) use materialize::materialize;
pub use token::Token;
pub use tokenizer::JsonTokenizer;
pub use value::{JsonNumber, JsonObject, JsonValue};
