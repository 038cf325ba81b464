use crate::json::{JsonNumber, JsonTokenizer, JsonValue, materialize};
use crate::replay::{
    Classified, DirectionsRoute, JsonRouteDecoder, ReplayEvent, RouteDecodeError, SkipReason,
    classify,
};
use serde_json::json;

fn num(text: &str) -> JsonNumber {
    text.parse().expect("number")
}

fn record(raw: &str) -> JsonValue {
    materialize(&mut JsonTokenizer::new(raw.as_bytes()), None).expect("record json")
}

fn event(raw: &str) -> ReplayEvent {
    match classify(record(raw), &JsonRouteDecoder).expect("classify") {
        Classified::Event(event) => event,
        Classified::Skip(reason) => panic!("unexpected skip: {reason}"),
    }
}

fn skip(raw: &str) -> SkipReason {
    match classify(record(raw), &JsonRouteDecoder).expect("classify") {
        Classified::Skip(reason) => reason,
        Classified::Event(event) => panic!("unexpected event: {event:?}"),
    }
}

fn fatal(raw: &str) -> (&'static str, String) {
    let err = classify(record(raw), &JsonRouteDecoder).expect_err("should be fatal");
    (err.field, err.reason)
}

#[test]
fn status_poll_carries_timestamp_only() {
    let ev = event(r#"{"type":"getStatusMonotonic","event_timestamp":12.25,"extra":true}"#);
    match ev {
        ReplayEvent::StatusPoll(poll) => assert_eq!(poll.event_timestamp, num("12.25")),
        other => panic!("expected status poll, got {other:?}"),
    }
}

#[test]
fn location_update_copies_fields() {
    let ev = event(
        r#"{"type":"updateLocation","event_timestamp":3.5,
            "location":{"lon":-122.39,"lat":37.78,"provider":"fused","time":1580777612.89,
                        "altitude":12.0,"accuracyHorizontal":4.8,"bearing":90.0,"speed":13.5}}"#,
    );
    let ReplayEvent::LocationUpdate(update) = ev else {
        panic!("expected location update");
    };
    assert_eq!(update.event_timestamp, num("3.5"));
    assert_eq!(update.location.lon, num("-122.39"));
    assert_eq!(update.location.lat, num("37.78"));
    assert_eq!(update.location.provider.as_deref(), Some("fused"));
    assert_eq!(update.location.time, Some(num("1580777612.89")));
    assert_eq!(update.location.accuracy_horizontal, Some(num("4.8")));
    assert_eq!(update.location.bearing, Some(num("90.0")));
    assert_eq!(update.location.speed, Some(num("13.5")));
}

#[test]
fn location_optional_fields_may_be_absent() {
    let ev = event(r#"{"type":"updateLocation","event_timestamp":1,"location":{"lon":1,"lat":2}}"#);
    let ReplayEvent::LocationUpdate(update) = ev else {
        panic!("expected location update");
    };
    assert!(update.location.provider.is_none());
    assert!(update.location.speed.is_none());
}

#[test]
fn malformed_location_update_is_fatal() {
    let (field, reason) = fatal(r#"{"type":"updateLocation","event_timestamp":1,"location":{"lon":1}}"#);
    assert_eq!(field, "location");
    assert!(reason.contains("lat"), "reason should name the field: {reason}");

    let (field, _) = fatal(r#"{"type":"updateLocation","event_timestamp":1,"location":{"lon":"1","lat":2}}"#);
    assert_eq!(field, "location");

    let (field, reason) = fatal(r#"{"type":"updateLocation","event_timestamp":1}"#);
    assert_eq!((field, reason.as_str()), ("location", "missing"));

    let (field, _) = fatal(r#"{"type":"updateLocation","location":{"lon":1,"lat":2}}"#);
    assert_eq!(field, "event_timestamp");
}

#[test]
fn status_poll_requires_numeric_timestamp() {
    let (field, reason) = fatal(r#"{"type":"getStatusMonotonic"}"#);
    assert_eq!((field, reason.as_str()), ("event_timestamp", "missing"));
    let (field, reason) = fatal(r#"{"type":"getStatusMonotonic","event_timestamp":"1.0"}"#);
    assert_eq!(field, "event_timestamp");
    assert_eq!(reason, "expected a number, found a string");
}

#[test]
fn missing_or_structured_discriminator_is_fatal() {
    assert_eq!(fatal(r#"{"event_timestamp":1.0}"#).0, "type");
    let (field, reason) = fatal(r#"{"type":null,"event_timestamp":1.0}"#);
    assert_eq!((field, reason.as_str()), ("type", "expected a string, found null"));
    assert_eq!(fatal(r#"{"type":["setRoute"],"event_timestamp":1.0}"#).0, "type");
    assert_eq!(fatal(r#"{"type":{},"event_timestamp":1.0}"#).0, "type");
    let (field, reason) = fatal("[1,2]");
    assert_eq!(field, "type");
    assert_eq!(reason, "event is an array, not an object");
}

#[test]
fn scalar_discriminator_is_skipped_as_text() {
    match skip(r#"{"type":7,"event_timestamp":1.0}"#) {
        SkipReason::UnsupportedEventType(t) => assert_eq!(t, "7"),
        other => panic!("unexpected reason {other:?}"),
    }
    match skip(r#"{"type":1.5e3,"event_timestamp":1.0}"#) {
        SkipReason::UnsupportedEventType(t) => assert_eq!(t, "1.5e3"),
        other => panic!("unexpected reason {other:?}"),
    }
    match skip(r#"{"type":true}"#) {
        SkipReason::UnsupportedEventType(t) => assert_eq!(t, "true"),
        other => panic!("unexpected reason {other:?}"),
    }
}

#[test]
fn location_fields_must_have_matching_types() {
    let (field, reason) =
        fatal(r#"{"type":"updateLocation","event_timestamp":1,"location":[1,2]}"#);
    assert_eq!((field, reason.as_str()), ("location", "expected an object, found an array"));

    let (field, reason) = fatal(
        r#"{"type":"updateLocation","event_timestamp":1,"location":{"lon":1,"lat":2,"provider":3}}"#,
    );
    assert_eq!(field, "location");
    assert!(reason.contains("provider"), "reason should name the field: {reason}");

    let ev = event(
        r#"{"type":"updateLocation","event_timestamp":1,"location":{"lon":1,"lat":2,"speed":null}}"#,
    );
    let ReplayEvent::LocationUpdate(update) = ev else {
        panic!("expected location update");
    };
    assert!(update.location.speed.is_none());
}

#[test]
fn unknown_type_is_skipped() {
    match skip(r#"{"type":"bogus","event_timestamp":2.0}"#) {
        SkipReason::UnsupportedEventType(t) => assert_eq!(t, "bogus"),
        other => panic!("unexpected reason {other:?}"),
    }
}

#[test]
fn empty_route_sentinel_yields_no_route() {
    let ev = event(r#"{"type":"setRoute","event_timestamp":4.0,"route":"{}"}"#);
    let ReplayEvent::RouteAssignment(assignment) = ev else {
        panic!("expected route assignment");
    };
    assert_eq!(assignment.event_timestamp, num("4.0"));
    assert!(assignment.route.is_none());
}

#[test]
fn nested_route_document_is_decoded() {
    let ev = event(
        r#"{"type":"setRoute","event_timestamp":5.0,
            "route":"{\"distance\":1200.5,\"duration\":300.1,\"geometry\":\"abc\",\"legs\":[{\"distance\":1200.5,\"duration\":300.1,\"summary\":\"Main St\"}],\"voiceLocale\":\"en-US\",\"unknown\":1}"}"#,
    );
    let ReplayEvent::RouteAssignment(assignment) = ev else {
        panic!("expected route assignment");
    };
    let route: DirectionsRoute = assignment.route.expect("route");
    assert_eq!(route.distance, num("1200.5"));
    assert_eq!(route.duration, num("300.1"));
    assert_eq!(route.geometry.as_deref(), Some("abc"));
    assert_eq!(route.voice_locale.as_deref(), Some("en-US"));
    assert_eq!(route.legs.len(), 1);
    assert_eq!(route.legs[0].summary.as_deref(), Some("Main St"));
}

#[test]
fn corrupted_route_is_skipped() {
    let reason = skip(r#"{"type":"setRoute","event_timestamp":5.0,"route":"{\"distance\":"}"#);
    assert!(matches!(reason, SkipReason::RouteDecode(RouteDecodeError::Json(_))));

    let reason = skip(r#"{"type":"setRoute","event_timestamp":5.0}"#);
    assert!(matches!(reason, SkipReason::RouteDecode(RouteDecodeError::NotAString)));

    let reason = skip(r#"{"type":"setRoute","event_timestamp":5.0,"route":{}}"#);
    assert!(matches!(reason, SkipReason::RouteDecode(RouteDecodeError::NotAString)));
}

#[test]
fn set_route_without_timestamp_is_fatal() {
    let (field, _) = fatal(r#"{"type":"setRoute","route":"{}"}"#);
    assert_eq!(field, "event_timestamp");
}

#[test]
fn classified_values_match_json_macro_records() {
    let ev = event(&json!({"type": "getStatusMonotonic", "event_timestamp": 8}).to_string());
    assert_eq!(ev.timestamp_secs(), 8.0);
    assert_eq!(ev.event_type(), "getStatusMonotonic");
}
