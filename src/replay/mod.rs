//! 历史记录回放
//!
//! 把录制的驾驶会话事件（定位、状态轮询、路线设置）增量解码为强类型事件。

// 子模块声明
mod classify;
mod cursor;
mod diagnostic;
mod error;
mod event;
mod history;
mod route;
mod stream;

// 重新导出公共接口
#[cfg(test)]
pub(crate) use classify::{Classified, classify};
pub use cursor::{EVENTS_FIELD, StreamPosition};
pub use diagnostic::{DiagnosticSink, SkipReason, TracingSink};
pub use error::ReplayError;
pub use event::{
    EVENT_TIMESTAMP_FIELD, GET_STATUS_MONOTONIC, LOCATION_FIELD, LocationUpdate, ROUTE_FIELD,
    ReplayEvent, ReplayLocation, RouteAssignment, SET_ROUTE, StatusPoll, TYPE_FIELD,
    UPDATE_LOCATION,
};
pub use history::ReplayHistory;
pub use route::{
    DirectionsRoute, EMPTY_ROUTE, JsonRouteDecoder, RouteDecodeError, RouteDecoder, RouteLeg,
};
pub use stream::HistoryEventStream;
