// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-process stand-in for the detection endpoint
//!
//! Records every prediction request and answers with a canned status/body.
//! Also serves `/images/lion.png` and a few broken images for source-fetch
//! tests.

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use detection_overlay::config::DetectionConfig;
use detection_overlay::vision::MAX_IMAGE_SIZE;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub query: Vec<(String, String)>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockEndpoint {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockEndpoint {
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.into(),
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/images/lion.png", get(serve_image))
            .route("/images/not-an-image.png", get(serve_text))
            .route("/images/huge.png", get(serve_oversized))
            .route("/:project/:model", post(predict))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn config(&self) -> DetectionConfig {
        DetectionConfig {
            api_key: "test-key".to_string(),
            base_url: self.base_url.clone(),
            ..Default::default()
        }
    }

    pub fn image_url(&self) -> String {
        format!("{}/images/lion.png", self.base_url)
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([10, 20, 30]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

pub fn predictions_body(predictions: serde_json::Value) -> String {
    serde_json::json!({
        "time": 0.05,
        "image": {"width": 64, "height": 48},
        "predictions": predictions
    })
    .to_string()
}

async fn predict(
    State(state): State<MockState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let query = url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .into_owned()
        .collect();
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push(RecordedRequest {
        query,
        content_type,
        body: body.to_vec(),
    });
    (
        state.status,
        [(CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

async fn serve_image() -> impl IntoResponse {
    ([(CONTENT_TYPE, "image/png")], png_bytes(64, 48))
}

async fn serve_text() -> impl IntoResponse {
    ([(CONTENT_TYPE, "image/png")], "surprise, html")
}

// One byte over the image size limit
async fn serve_oversized() -> impl IntoResponse {
    let mut body = png_bytes(8, 8);
    body.resize(MAX_IMAGE_SIZE + 1, 0);
    ([(CONTENT_TYPE, "image/png")], body)
}
