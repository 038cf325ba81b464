//! 历史事件流
//!
//! 批量读取入口：游标 → 值物化 → 分类，累计成功解码的事件直到达到请求数量。
//! 被跳过的事件不占用批量配额。

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use tracing::{debug, trace};

use super::classify::{Classified, classify};
use super::cursor::{ArrayCursor, StreamPosition};
use super::diagnostic::{DiagnosticSink, TracingSink};
use super::error::ReplayError;
use super::event::ReplayEvent;
use super::history::ReplayHistory;
use super::route::{JsonRouteDecoder, RouteDecoder};
use crate::json::{self, JsonTokenizer};

/// 回放事件解码器，独占底层输入。
///
/// - 流式：每次 `read` 从上次停下的位置继续
/// - 内存文档：每次 `read` 都从头重新解码固定的事件列表
pub struct HistoryEventStream<R = io::Empty> {
    source: Source<R>,
    routes: Box<dyn RouteDecoder>,
    diagnostics: Box<dyn DiagnosticSink>,
    max_depth: Option<usize>,
}

enum Source<R> {
    Stream(StreamState<R>),
    Document(ReplayHistory),
}

struct StreamState<R> {
    tokens: JsonTokenizer<R>,
    cursor: ArrayCursor,
    /// 已消费的数组元素数（包括被跳过的）
    scanned: u64,
}

impl HistoryEventStream<BufReader<File>> {
    /// 以流式方式打开记录文件
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::from_reader(File::open(path)?))
    }
}

impl<R: Read> HistoryEventStream<BufReader<R>> {
    pub fn from_reader(reader: R) -> Self {
        Self::from_buf_reader(BufReader::new(reader))
    }
}

impl HistoryEventStream<io::Empty> {
    /// 基于已在内存中的完整记录
    pub fn from_document(history: ReplayHistory) -> Self {
        Self::with_source(Source::Document(history))
    }
}

impl<R: BufRead> HistoryEventStream<R> {
    pub fn from_buf_reader(reader: R) -> Self {
        Self::with_source(Source::Stream(StreamState {
            tokens: JsonTokenizer::new(reader),
            cursor: ArrayCursor::default(),
            scanned: 0,
        }))
    }

    fn with_source(source: Source<R>) -> Self {
        Self {
            source,
            routes: Box::new(JsonRouteDecoder),
            diagnostics: Box::new(TracingSink),
            max_depth: None,
        }
    }

    pub fn with_route_decoder(mut self, routes: impl RouteDecoder + 'static) -> Self {
        self.routes = Box::new(routes);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: impl DiagnosticSink + 'static) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    /// 限制单个事件的容器嵌套层数（事件对象本身算一层）
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// 扫描位置；内存文档模式没有游标，返回 `None`
    pub fn position(&self) -> Option<StreamPosition> {
        match &self.source {
            Source::Stream(state) => Some(state.cursor.position()),
            Source::Document(_) => None,
        }
    }

    /// 流式模式下已消费的数组元素数
    pub fn events_scanned(&self) -> Option<u64> {
        match &self.source {
            Source::Stream(state) => Some(state.scanned),
            Source::Document(_) => None,
        }
    }

    /// 释放底层输入
    pub fn into_inner(self) -> Option<R> {
        match self.source {
            Source::Stream(state) => Some(state.tokens.into_inner()),
            Source::Document(_) => None,
        }
    }

    /// 读取最多 `max_count` 个事件。
    ///
    /// 数组读完时返回较短（可能为空）的结果；致命错误会丢弃本次调用中已解码的事件。
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn read(&mut self, max_count: usize) -> Result<Vec<ReplayEvent>, ReplayError> {
        let routes = &*self.routes;
        let diagnostics = &mut *self.diagnostics;
        let events = match &mut self.source {
            Source::Stream(state) => state.read_batch(max_count, self.max_depth, routes, diagnostics)?,
            Source::Document(history) => {
                read_document(history, max_count, self.max_depth, routes, diagnostics)?
            }
        };
        debug!(decoded = events.len(), "批次读取完成");
        Ok(events)
    }
}

impl<R: BufRead> StreamState<R> {
    fn read_batch(
        &mut self,
        max_count: usize,
        max_depth: Option<usize>,
        routes: &dyn RouteDecoder,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> Result<Vec<ReplayEvent>, ReplayError> {
        let mut events = Vec::new();
        while events.len() < max_count {
            if !self.cursor.has_next(&mut self.tokens)? {
                break;
            }
            let record = json::materialize(&mut self.tokens, max_depth)?;
            let index = self.scanned;
            self.scanned += 1;
            self.cursor.element_consumed(&mut self.tokens)?;
            trace!(index, offset = self.tokens.offset(), "读取事件记录");

            let classified = classify(record, routes).map_err(|err| err.at(index))?;
            if let Some(event) = absorb(classified, index, diagnostics) {
                events.push(event);
            }
        }
        Ok(events)
    }
}

fn read_document(
    history: &ReplayHistory,
    max_count: usize,
    max_depth: Option<usize>,
    routes: &dyn RouteDecoder,
    diagnostics: &mut dyn DiagnosticSink,
) -> Result<Vec<ReplayEvent>, ReplayError> {
    let mut events = Vec::new();
    for (index, raw) in (0u64..).zip(&history.events) {
        if events.len() >= max_count {
            break;
        }
        // 偏移量相对于该事件自身的文本
        let mut tokens = JsonTokenizer::new(raw.get().as_bytes());
        let record = json::materialize(&mut tokens, max_depth)?;
        let classified = classify(record, routes).map_err(|err| err.at(index))?;
        if let Some(event) = absorb(classified, index, diagnostics) {
            events.push(event);
        }
    }
    Ok(events)
}

fn absorb(
    classified: Classified,
    index: u64,
    diagnostics: &mut dyn DiagnosticSink,
) -> Option<ReplayEvent> {
    match classified {
        Classified::Event(event) => Some(event),
        Classified::Skip(reason) => {
            diagnostics.event_skipped(index, &reason);
            None
        }
    }
}
