//! 解析错误
//!
//! 区分语法错误（带字节偏移）与底层 I/O 错误。

use std::io;
use thiserror::Error;

/// JSON 语法错误的具体原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid number literal")]
    InvalidNumber,
    #[error("unescaped control character in string")]
    ControlCharacter,
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("trailing data after top-level value")]
    TrailingData,
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: &'static str,
    },
    /// 物化时嵌套层数超过调用方设置的上限
    #[error("nesting deeper than {0} levels")]
    DepthLimit(usize),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{kind} at byte {offset}")]
    Syntax { offset: u64, kind: SyntaxError },
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// 语法错误原因（I/O 错误返回 `None`）
    pub fn syntax(&self) -> Option<&SyntaxError> {
        match self {
            ParseError::Syntax { kind, .. } => Some(kind),
            ParseError::Io(_) => None,
        }
    }
}
