//! 回放事件
//!
//! 记录中的三类事件。时间戳为相对录制开始的秒数，数字字段保留原始文本，
//! 重新序列化后与录制文件中的写法一致。

use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};

use super::route::{DirectionsRoute, EMPTY_ROUTE};
use crate::json::JsonNumber;

/// 判别字段
pub const TYPE_FIELD: &str = "type";
pub const EVENT_TIMESTAMP_FIELD: &str = "event_timestamp";
pub const LOCATION_FIELD: &str = "location";
pub const ROUTE_FIELD: &str = "route";

pub const UPDATE_LOCATION: &str = "updateLocation";
pub const GET_STATUS_MONOTONIC: &str = "getStatusMonotonic";
pub const SET_ROUTE: &str = "setRoute";

/// 回放事件（封闭集合，新增类型需要同时扩展分类器中的匹配）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ReplayEvent {
    #[serde(rename = "updateLocation")]
    LocationUpdate(LocationUpdate),
    #[serde(rename = "getStatusMonotonic")]
    StatusPoll(StatusPoll),
    #[serde(rename = "setRoute")]
    RouteAssignment(RouteAssignment),
}

impl ReplayEvent {
    /// 记录中的 `type` 值
    pub fn event_type(&self) -> &'static str {
        match self {
            ReplayEvent::LocationUpdate(_) => UPDATE_LOCATION,
            ReplayEvent::StatusPoll(_) => GET_STATUS_MONOTONIC,
            ReplayEvent::RouteAssignment(_) => SET_ROUTE,
        }
    }

    /// 原始时间戳
    pub fn event_timestamp(&self) -> &JsonNumber {
        match self {
            ReplayEvent::LocationUpdate(ev) => &ev.event_timestamp,
            ReplayEvent::StatusPoll(ev) => &ev.event_timestamp,
            ReplayEvent::RouteAssignment(ev) => &ev.event_timestamp,
        }
    }

    /// 时间戳（秒）
    pub fn timestamp_secs(&self) -> f64 {
        self.event_timestamp().as_f64().unwrap_or(f64::NAN)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationUpdate {
    pub event_timestamp: JsonNumber,
    pub location: ReplayLocation,
}

/// 同步标记，无负载
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusPoll {
    pub event_timestamp: JsonNumber,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteAssignment {
    pub event_timestamp: JsonNumber,
    /// `None` 表示记录中的路线为 `"{}"`
    #[serde(serialize_with = "serialize_route")]
    pub route: Option<DirectionsRoute>,
}

/// 定位点。`lon`/`lat` 必需，其余字段可缺省。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayLocation {
    pub lon: JsonNumber,
    pub lat: JsonNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// 定位时间（秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<JsonNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<JsonNumber>,
    #[serde(
        rename = "accuracyHorizontal",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub accuracy_horizontal: Option<JsonNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearing: Option<JsonNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<JsonNumber>,
}

// 与录制格式保持一致：route 写回为嵌套 JSON 文本
fn serialize_route<S: Serializer>(
    route: &Option<DirectionsRoute>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match route {
        None => serializer.serialize_str(EMPTY_ROUTE),
        Some(route) => {
            let raw = serde_json::to_string(route).map_err(S::Error::custom)?;
            serializer.serialize_str(&raw)
        }
    }
}
