//! 事件数组游标
//!
//! 记录在顶层文档中的扫描进度，多次读取之间保持状态，流式解码不会从头重扫。

use std::io::BufRead;

use tracing::{debug, warn};

use crate::json::{JsonTokenizer, ParseError, Token};

/// 保存事件数组的顶层字段
pub const EVENTS_FIELD: &str = "events";

/// 扫描位置。`Searching → InArray` 最多发生一次，`Exhausted` 不可逆。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamPosition {
    #[default]
    Searching,
    InArray,
    Exhausted,
}

#[derive(Debug, Default)]
pub(crate) struct ArrayCursor {
    position: StreamPosition,
}

impl ArrayCursor {
    pub(crate) fn position(&self) -> StreamPosition {
        self.position
    }

    /// 是否还有下一个数组元素可读；首次调用时定位事件数组
    pub(crate) fn has_next<R: BufRead>(
        &mut self,
        tokens: &mut JsonTokenizer<R>,
    ) -> Result<bool, ParseError> {
        if self.position == StreamPosition::Searching {
            self.locate(tokens)?;
        }
        Ok(self.position == StreamPosition::InArray)
    }

    /// 一个元素被完整消费之后调用：若紧跟数组结束符则进入 `Exhausted`
    pub(crate) fn element_consumed<R: BufRead>(
        &mut self,
        tokens: &mut JsonTokenizer<R>,
    ) -> Result<(), ParseError> {
        if matches!(tokens.peek()?, Some(Token::EndArray)) {
            tokens.next_token()?;
            self.position = StreamPosition::Exhausted;
            debug!(offset = tokens.offset(), "事件数组读取完毕");
        }
        Ok(())
    }

    // 只检查顶层对象的第一个字段
    fn locate<R: BufRead>(&mut self, tokens: &mut JsonTokenizer<R>) -> Result<(), ParseError> {
        match tokens.next_token()? {
            Some(Token::BeginObject) => {}
            other => return Err(tokens.unexpected_token("top-level object", other.as_ref())),
        }
        match tokens.next_token()? {
            Some(Token::Name(name)) if name == EVENTS_FIELD => {
                match tokens.next_token()? {
                    Some(Token::BeginArray) => {}
                    other => return Err(tokens.unexpected_token("event array", other.as_ref())),
                }
                self.position = StreamPosition::InArray;
                debug!(offset = tokens.offset(), "定位到事件数组");
                self.element_consumed(tokens)
            }
            Some(Token::Name(name)) => {
                warn!(field = %name, "首个字段不是 `events`，不会产生任何事件");
                self.position = StreamPosition::Exhausted;
                Ok(())
            }
            Some(Token::EndObject) => {
                debug!("顶层对象为空");
                self.position = StreamPosition::Exhausted;
                Ok(())
            }
            other => Err(tokens.unexpected_token("field name", other.as_ref())),
        }
    }
}
