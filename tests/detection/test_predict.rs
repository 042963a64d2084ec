// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DetectionClient against the mock endpoint

use base64::{engine::general_purpose::STANDARD, Engine as _};
use detection_overlay::config::EndpointVariant;
use detection_overlay::detection::{
    DetectionClient, DetectionError, ImageSource, ThresholdParams, FORM_CONTENT_TYPE,
};
use serde_json::json;

use super::mock_server::{predictions_body, MockEndpoint};

#[tokio::test]
async fn test_url_source_sends_query_only() {
    let mock = MockEndpoint::start(200, predictions_body(json!([]))).await;
    let client = DetectionClient::new(&mock.config()).unwrap();
    let thresholds = ThresholdParams::new(EndpointVariant::Percent, 40.0, 30.0).unwrap();

    let result = client
        .predict(&ImageSource::RemoteUrl("http://x/y.jpg".to_string()), &thresholds)
        .await
        .unwrap();
    assert!(result.is_empty());

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.param("api_key"), Some("test-key"));
    assert_eq!(request.param("confidence"), Some("40"));
    assert_eq!(request.param("overlap"), Some("30"));
    assert_eq!(request.param("format"), Some("json"));
    assert_eq!(request.param("image"), Some("http://x/y.jpg"));
    assert!(request.body.is_empty());
    assert!(request.content_type.is_none());
}

#[tokio::test]
async fn test_bytes_source_sends_base64_body() {
    let mock = MockEndpoint::start(200, predictions_body(json!([]))).await;
    let client = DetectionClient::new(&mock.config()).unwrap();
    let thresholds = ThresholdParams::defaults(EndpointVariant::Percent);
    let payload = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x01, 0x02];

    client
        .predict(&ImageSource::Bytes(payload.clone()), &thresholds)
        .await
        .unwrap();

    let request = &mock.requests()[0];
    assert_eq!(request.param("image"), None);
    assert_eq!(request.param("api_key"), Some("test-key"));
    assert_eq!(request.param("format"), Some("json"));
    assert_eq!(request.content_type.as_deref(), Some(FORM_CONTENT_TYPE));
    assert_eq!(STANDARD.decode(&request.body).unwrap(), payload);
}

#[tokio::test]
async fn test_fraction_variant_on_the_wire() {
    let mock = MockEndpoint::start(200, predictions_body(json!([]))).await;
    let mut config = mock.config();
    config.variant = EndpointVariant::Fraction;
    let client = DetectionClient::new(&config).unwrap();
    let thresholds = ThresholdParams::new(EndpointVariant::Fraction, 0.5, 0.45).unwrap();

    client
        .predict(&ImageSource::RemoteUrl("http://x/y.jpg".to_string()), &thresholds)
        .await
        .unwrap();

    let request = &mock.requests()[0];
    assert_eq!(request.param("confidence"), Some("0.5"));
    assert_eq!(request.param("iou_threshold"), Some("0.45"));
    assert_eq!(request.param("overlap"), None);
}

#[tokio::test]
async fn test_predictions_parsed_in_service_order() {
    let body = predictions_body(json!([
        {"x": 20, "y": 20, "width": 10, "height": 8, "class": "lion", "class_id": 1, "confidence": 0.91},
        {"x": 40, "y": 30, "width": 12, "height": 6, "class": "hippo", "class_id": 0, "confidence": 0.62}
    ]));
    let mock = MockEndpoint::start(200, body).await;
    let client = DetectionClient::new(&mock.config()).unwrap();

    let result = client
        .predict(
            &ImageSource::Bytes(vec![1, 2, 3]),
            &ThresholdParams::defaults(EndpointVariant::Percent),
        )
        .await
        .unwrap();

    let names: Vec<&str> = result
        .predictions
        .iter()
        .map(|p| p.class_name.as_str())
        .collect();
    assert_eq!(names, vec!["lion", "hippo"]);
    assert_eq!(result.predictions[1].class_id, 0);
    assert_eq!(result.time, Some(0.05));
}

#[tokio::test]
async fn test_unauthorized_surfaces_code_and_reason() {
    // Body is not a prediction payload; it must never be parsed
    let mock = MockEndpoint::start(401, "<html>denied</html>").await;
    let client = DetectionClient::new(&mock.config()).unwrap();

    let err = client
        .predict(
            &ImageSource::RemoteUrl("http://x/y.jpg".to_string()),
            &ThresholdParams::defaults(EndpointVariant::Percent),
        )
        .await
        .unwrap_err();

    match &err {
        DetectionError::UpstreamHttp { status, reason } => {
            assert_eq!(*status, 401);
            assert_eq!(reason, "Unauthorized");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
    let message = err.to_string();
    assert!(message.contains("401"));
    assert!(message.contains("Unauthorized"));
}

#[tokio::test]
async fn test_server_error_is_upstream_error() {
    let mock = MockEndpoint::start(503, "").await;
    let client = DetectionClient::new(&mock.config()).unwrap();

    let err = client
        .predict(
            &ImageSource::Bytes(vec![1]),
            &ThresholdParams::defaults(EndpointVariant::Percent),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "Request failed: 503 Service Unavailable");
}

#[tokio::test]
async fn test_missing_field_is_parse_error() {
    let body = predictions_body(json!([
        {"x": 20, "y": 20, "width": 10, "height": 8, "class": "lion", "class_id": 1, "confidence": 0.91},
        {"x": 40, "y": 30, "height": 6, "class": "hippo", "class_id": 0, "confidence": 0.62}
    ]));
    let mock = MockEndpoint::start(200, body).await;
    let client = DetectionClient::new(&mock.config()).unwrap();

    let err = client
        .predict(
            &ImageSource::Bytes(vec![1]),
            &ThresholdParams::defaults(EndpointVariant::Percent),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DetectionError::ResponseParse(_)));
    assert!(err.to_string().contains("width"));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    let config = detection_overlay::DetectionConfig {
        api_key: "test-key".to_string(),
        base_url: "http://127.0.0.1:59999".to_string(),
        ..Default::default()
    };
    let client = DetectionClient::new(&config).unwrap();
    let err = client
        .predict(
            &ImageSource::Bytes(vec![1]),
            &ThresholdParams::defaults(EndpointVariant::Percent),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DetectionError::Transport(_)));
}
