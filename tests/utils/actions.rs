use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio::sync::broadcast;
use tower::ServiceExt; // for `oneshot`

use standin::ViewUpdate;

async fn into_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

/// Sends a request with a JSON body (or none) through the router
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    into_json(app.clone().oneshot(request).await.unwrap()).await
}

/// Sends a raw body, as the bridge receives data packets and text streams
pub async fn send_raw(
    app: &Router,
    uri: &str,
    headers: &[(&str, &str)],
    body: impl Into<Body>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(body.into()).unwrap();
    into_json(app.clone().oneshot(request).await.unwrap()).await
}

/// Waits for the next view update that `pick` accepts, skipping the rest
pub async fn next_update<T>(
    updates: &mut broadcast::Receiver<ViewUpdate>,
    pick: impl Fn(ViewUpdate) -> Option<T>,
) -> T {
    loop {
        let update = updates.recv().await.unwrap();
        if let Some(found) = pick(update) {
            return found;
        }
    }
}
