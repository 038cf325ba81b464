//! 内存中的完整记录
//!
//! 整个记录已在内存中时使用，对应非流式的解码模式。每个事件保留原始文本，
//! 读取时再逐条物化。

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use super::error::ReplayError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayHistory {
    #[serde(default)]
    pub events: Vec<Box<RawValue>>,
}

impl ReplayHistory {
    /// 一次性解析整个记录文本
    pub fn from_json_str(raw: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
