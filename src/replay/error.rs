//! 回放解码错误
//!
//! 只有致命错误会越过批量读取的边界；可跳过的问题见 [`SkipReason`](super::SkipReason)。

use std::io;

use thiserror::Error;

use crate::json::{ParseError, SyntaxError};

#[derive(Debug, Error)]
pub enum ReplayError {
    /// 记录文件本身语法损坏，读取位置不再可靠，调用方应丢弃该解码器
    #[error("malformed history: {kind} at byte {offset}")]
    Syntax { offset: u64, kind: SyntaxError },
    /// 已知事件类型的必需字段（或 `type` 本身）缺失/类型错误
    #[error("event #{index}: cannot decode field `{field}`: {reason}")]
    FieldDecode {
        index: u64,
        field: &'static str,
        reason: String,
    },
    #[error("history read failed: {0}")]
    Io(#[from] io::Error),
    /// 内存文档无法解析为回放记录
    #[error("invalid history document: {0}")]
    Document(#[from] serde_json::Error),
}

impl From<ParseError> for ReplayError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Syntax { offset, kind } => ReplayError::Syntax { offset, kind },
            ParseError::Io(err) => ReplayError::Io(err),
        }
    }
}

/// 分类器内部的字段错误，由批量读取补上事件序号
#[derive(Debug)]
pub(crate) struct FieldError {
    pub(crate) field: &'static str,
    pub(crate) reason: String,
}

impl FieldError {
    pub(crate) fn missing(field: &'static str) -> Self {
        Self {
            field,
            reason: "missing".to_string(),
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn at(self, index: u64) -> ReplayError {
        ReplayError::FieldDecode {
            index,
            field: self.field,
            reason: self.reason,
        }
    }
}
