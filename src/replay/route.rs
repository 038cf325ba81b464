//! 路线描述
//!
//! `setRoute` 事件的 `route` 字段是一段嵌套的 JSON 文本，由 [`RouteDecoder`] 解码。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::json::JsonNumber;

/// 表示“没有路线”的保留文本
pub const EMPTY_ROUTE: &str = "{}";

/// 路线（只保留回放需要的字段，其余字段忽略）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsRoute {
    /// 米
    pub distance: JsonNumber,
    /// 秒
    pub duration: JsonNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<JsonNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legs: Vec<RouteLeg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub distance: JsonNumber,
    pub duration: JsonNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Error)]
pub enum RouteDecodeError {
    #[error("route payload missing or not a string")]
    NotAString,
    #[error("invalid route document: {0}")]
    Json(#[from] serde_json::Error),
}

/// 路线解码器：把嵌套的路线文本转换为 [`DirectionsRoute`]
pub trait RouteDecoder: Send {
    fn decode_route(&self, raw: &str) -> Result<DirectionsRoute, RouteDecodeError>;
}

/// 默认解码器：直接按 JSON 反序列化
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRouteDecoder;

impl RouteDecoder for JsonRouteDecoder {
    fn decode_route(&self, raw: &str) -> Result<DirectionsRoute, RouteDecodeError> {
        Ok(serde_json::from_str(raw)?)
    }
}
