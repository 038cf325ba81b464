//! 诊断输出
//!
//! 被跳过的事件交给 [`DiagnosticSink`]，它只记录信息，不影响解码流程。

use thiserror::Error;
use tracing::warn;

use super::route::RouteDecodeError;

/// 事件被跳过的原因
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("unsupported event type `{0}`")]
    UnsupportedEventType(String),
    #[error("unable to set route from history: {0}")]
    RouteDecode(#[source] RouteDecodeError),
}

pub trait DiagnosticSink: Send {
    /// `index` 为事件在数组中的序号（从 0 开始，包含被跳过的事件）
    fn event_skipped(&mut self, index: u64, reason: &SkipReason);
}

/// 默认实现：写入 tracing 日志
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn event_skipped(&mut self, index: u64, reason: &SkipReason) {
        warn!(index, %reason, "跳过回放事件");
    }
}

impl<F> DiagnosticSink for F
where
    F: FnMut(u64, &SkipReason) + Send,
{
    fn event_skipped(&mut self, index: u64, reason: &SkipReason) {
        self(index, reason)
    }
}
