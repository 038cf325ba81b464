//! 事件分类
//!
//! 根据 `type` 字段把物化后的记录转换为 [`ReplayEvent`]。
//!
//! - `type` 缺失或不是标量、`updateLocation`/`getStatusMonotonic` 的必需字段错误：致命
//! - 路线无法解码、未知事件类型：跳过该事件

use super::diagnostic::SkipReason;
use super::error::FieldError;
use super::event::{
    EVENT_TIMESTAMP_FIELD, GET_STATUS_MONOTONIC, LOCATION_FIELD, LocationUpdate, ROUTE_FIELD,
    ReplayEvent, ReplayLocation, RouteAssignment, SET_ROUTE, StatusPoll, TYPE_FIELD,
    UPDATE_LOCATION,
};
use super::route::{EMPTY_ROUTE, RouteDecodeError, RouteDecoder};
use crate::json::{JsonNumber, JsonObject, JsonValue};

/// 单条记录的分类结果
#[derive(Debug)]
pub(crate) enum Classified {
    Event(ReplayEvent),
    Skip(SkipReason),
}

pub(crate) fn classify(value: JsonValue, routes: &dyn RouteDecoder) -> Result<Classified, FieldError> {
    let mut record = match value {
        JsonValue::Object(record) => record,
        other => {
            return Err(FieldError::invalid(
                TYPE_FIELD,
                format!("event is {}, not an object", other.kind()),
            ));
        }
    };
    let event_type = match record.remove(TYPE_FIELD) {
        Some(JsonValue::String(event_type)) => event_type,
        // 数字、布尔按文本参与分派，不可能命中已知类型
        Some(JsonValue::Number(number)) => return Ok(unsupported(number.to_string())),
        Some(JsonValue::Bool(flag)) => return Ok(unsupported(flag.to_string())),
        Some(other) => {
            return Err(FieldError::invalid(
                TYPE_FIELD,
                format!("expected a string, found {}", other.kind()),
            ));
        }
        None => return Err(FieldError::missing(TYPE_FIELD)),
    };

    let event = match event_type.as_str() {
        UPDATE_LOCATION => ReplayEvent::LocationUpdate(location_update(record)?),
        GET_STATUS_MONOTONIC => ReplayEvent::StatusPoll(StatusPoll {
            event_timestamp: take_timestamp(&mut record)?,
        }),
        SET_ROUTE => return route_assignment(record, routes),
        _ => return Ok(unsupported(event_type)),
    };
    Ok(Classified::Event(event))
}

fn unsupported(event_type: String) -> Classified {
    Classified::Skip(SkipReason::UnsupportedEventType(event_type))
}

fn location_update(mut record: JsonObject) -> Result<LocationUpdate, FieldError> {
    let event_timestamp = take_timestamp(&mut record)?;
    let location = match record.remove(LOCATION_FIELD) {
        Some(JsonValue::Object(fields)) => {
            read_location(fields).map_err(|reason| FieldError::invalid(LOCATION_FIELD, reason))?
        }
        Some(other) => {
            return Err(FieldError::invalid(
                LOCATION_FIELD,
                format!("expected an object, found {}", other.kind()),
            ));
        }
        None => return Err(FieldError::missing(LOCATION_FIELD)),
    };
    Ok(LocationUpdate {
        event_timestamp,
        location,
    })
}

fn read_location(mut fields: JsonObject) -> Result<ReplayLocation, String> {
    Ok(ReplayLocation {
        lon: required_number(&mut fields, "lon")?,
        lat: required_number(&mut fields, "lat")?,
        provider: optional_string(&mut fields, "provider")?,
        time: optional_number(&mut fields, "time")?,
        altitude: optional_number(&mut fields, "altitude")?,
        accuracy_horizontal: optional_number(&mut fields, "accuracyHorizontal")?,
        bearing: optional_number(&mut fields, "bearing")?,
        speed: optional_number(&mut fields, "speed")?,
    })
}

fn required_number(fields: &mut JsonObject, name: &str) -> Result<JsonNumber, String> {
    optional_number(fields, name)?.ok_or_else(|| format!("missing field `{name}`"))
}

// null 与缺省等价
fn optional_number(fields: &mut JsonObject, name: &str) -> Result<Option<JsonNumber>, String> {
    match fields.remove(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(number)) => Ok(Some(number)),
        Some(other) => Err(format!("field `{name}`: expected a number, found {}", other.kind())),
    }
}

fn optional_string(fields: &mut JsonObject, name: &str) -> Result<Option<String>, String> {
    match fields.remove(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(text)) => Ok(Some(text)),
        Some(other) => Err(format!("field `{name}`: expected a string, found {}", other.kind())),
    }
}

// 路线先于时间戳检查：路线问题只跳过事件，时间戳缺失仍然是致命错误
fn route_assignment(
    mut record: JsonObject,
    routes: &dyn RouteDecoder,
) -> Result<Classified, FieldError> {
    let route = match record.get(ROUTE_FIELD) {
        Some(JsonValue::String(raw)) if raw == EMPTY_ROUTE => None,
        Some(JsonValue::String(raw)) => match routes.decode_route(raw) {
            Ok(route) => Some(route),
            Err(err) => return Ok(Classified::Skip(SkipReason::RouteDecode(err))),
        },
        _ => {
            return Ok(Classified::Skip(SkipReason::RouteDecode(
                RouteDecodeError::NotAString,
            )));
        }
    };
    let event_timestamp = take_timestamp(&mut record)?;
    Ok(Classified::Event(ReplayEvent::RouteAssignment(
        RouteAssignment {
            event_timestamp,
            route,
        },
    )))
}

fn take_timestamp(record: &mut JsonObject) -> Result<JsonNumber, FieldError> {
    match record.remove(EVENT_TIMESTAMP_FIELD) {
        Some(JsonValue::Number(timestamp)) => Ok(timestamp),
        Some(other) => Err(FieldError::invalid(
            EVENT_TIMESTAMP_FIELD,
            format!("expected a number, found {}", other.kind()),
        )),
        None => Err(FieldError::missing(EVENT_TIMESTAMP_FIELD)),
    }
}
