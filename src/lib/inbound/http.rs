use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tokio::net;

use crate::domain::device::ports::DeviceService;
use crate::inbound::http::handlers::{
    create_device::create_device,
    delete_device::delete_device,
    get_device::get_device,
    list_devices::list_devices,
    update_device::{patch_device, put_device},
};

mod handlers;
mod responses;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig<'a> {
    pub port: &'a str,
}

#[derive(Debug, Clone)]
struct AppState<DS: DeviceService> {
    device_service: Arc<DS>,
}

pub struct HttpServer {
    router: axum::Router,
    listener: net::TcpListener,
}

impl HttpServer {
    pub async fn new(
        device_service: impl DeviceService,
        config: HttpServerConfig<'_>,
    ) -> anyhow::Result<Self> {
        let router = router(device_service);

        let listener = net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("failed to listen on {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self
            .listener
            .local_addr()
            .context("failed to read listener address")?;
        tracing::debug!("listening on {}", addr);
        axum::serve(self.listener, self.router)
            .await
            .context("received error from running server")?;

        Ok(())
    }
}

/// Builds the full application router, including tracing, around `device_service`.
pub fn router<DS: DeviceService>(device_service: DS) -> Router {
    let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("http_request", method = ?request.method(), uri)
        },
    );

    let state = AppState {
        device_service: Arc::new(device_service),
    };

    axum::Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .nest("/api/v1", api_routes())
        .layer(trace_layer)
        .with_state(state)
}

fn api_routes<DS: DeviceService>() -> Router<AppState<DS>> {
    Router::new()
        .route(
            "/devices",
            get(list_devices::<DS>).post(create_device::<DS>),
        )
        .route(
            "/devices/{id}",
            get(get_device::<DS>)
                .put(put_device::<DS>)
                .patch(patch_device::<DS>)
                .delete(delete_device::<DS>),
        )
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, Response, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::device::service::Service;
    use crate::outbound::memory::InMemory;

    fn app() -> Router {
        router(Service::new(InMemory::default()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, name: &str, brand: &str, state: &str) -> Value {
        let response = send(
            app,
            Method::POST,
            "/api/v1/devices",
            Some(json!({ "name": name, "brand": brand, "state": state })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        json_body(response).await["data"].clone()
    }

    #[tokio::test]
    async fn should_answer_health_check() {
        let response = send(&app(), Method::GET, "/health", None).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_create_device() {
        let app = app();

        let device = create(&app, "New Device", "Test Brand", "available").await;

        assert_eq!(device["id"], 1);
        assert_eq!(device["name"], "New Device");
        assert_eq!(device["brand"], "Test Brand");
        assert_eq!(device["state"], "available");
        assert!(device["creationTime"].is_string());
    }

    #[tokio::test]
    async fn should_reject_create_with_blank_name() {
        let response = send(
            &app(),
            Method::POST,
            "/api/v1/devices",
            Some(json!({ "name": "  ", "brand": "Test Brand", "state": "available" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["data"]["message"],
            "device name cannot be empty"
        );
    }

    #[tokio::test]
    async fn should_reject_create_with_unknown_state() {
        let response = send(
            &app(),
            Method::POST,
            "/api/v1/devices",
            Some(json!({ "name": "Phone", "brand": "Test Brand", "state": "broken" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_not_found_when_device_does_not_exist() {
        let response = send(&app(), Method::GET, "/api/v1/devices/999", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await["data"]["message"],
            "device with id 999 not found"
        );
    }

    #[tokio::test]
    async fn should_reject_non_positive_id() {
        let response = send(&app(), Method::GET, "/api/v1/devices/0", None).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_list_devices_by_brand_ignoring_case() {
        let app = app();
        create(&app, "A", "Test Brand", "available").await;
        create(&app, "B", "test brand", "in_use").await;
        create(&app, "C", "Other", "available").await;

        let response = send(&app, Method::GET, "/api/v1/devices?brand=Test%20Brand", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let ids: Vec<i64> = body["data"]["devices"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(body["data"]["page"]["totalElements"], 2);
        assert_eq!(body["data"]["page"]["size"], 100);
    }

    #[tokio::test]
    async fn should_page_through_devices() {
        let app = app();
        for i in 0..5 {
            create(&app, &format!("Device {i}"), "Brand", "inactive").await;
        }

        let response = send(&app, Method::GET, "/api/v1/devices?page=2&size=2", None).await;
        let body = json_body(response).await;

        assert_eq!(body["data"]["devices"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["page"]["number"], 2);
        assert_eq!(body["data"]["page"]["totalPages"], 3);
        assert_eq!(body["data"]["page"]["totalElements"], 5);
    }

    #[tokio::test]
    async fn should_reject_list_with_unknown_state_or_zero_size() {
        let app = app();

        let response = send(&app, Method::GET, "/api/v1/devices?state=inactve", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, Method::GET, "/api/v1/devices?size=0", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_require_every_field_on_put() {
        let app = app();
        create(&app, "Phone", "Acme", "available").await;

        let response = send(
            &app,
            Method::PUT,
            "/api/v1/devices/1",
            Some(json!({ "name": "Renamed" })),
        )
        .await;

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn should_replace_device_on_put() {
        let app = app();
        create(&app, "Phone", "Acme", "available").await;

        let response = send(
            &app,
            Method::PUT,
            "/api/v1/devices/1",
            Some(json!({ "name": "Renamed", "brand": "Umbrella", "state": "inactive" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let device = json_body(response).await["data"].clone();
        assert_eq!(device["name"], "Renamed");
        assert_eq!(device["brand"], "Umbrella");
        assert_eq!(device["state"], "inactive");
    }

    #[tokio::test]
    async fn should_walk_device_through_its_lifecycle() {
        let app = app();
        let created = create(&app, "Phone", "Acme", "available").await;
        assert_eq!(created["state"], "available");

        let response = send(&app, Method::GET, "/api/v1/devices/1", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(
            &app,
            Method::PATCH,
            "/api/v1/devices/1",
            Some(json!({ "state": "in_use" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"]["state"], "in_use");

        let response = send(
            &app,
            Method::PATCH,
            "/api/v1/devices/1",
            Some(json!({ "name": "Renamed" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["data"]["message"],
            "cannot update name of device 1 while it is in use"
        );

        let response = send(&app, Method::DELETE, "/api/v1/devices/1", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["data"]["message"],
            "cannot delete device 1 while it is in use"
        );

        let response = send(
            &app,
            Method::PATCH,
            "/api/v1/devices/1",
            Some(json!({ "state": "available" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::DELETE, "/api/v1/devices/1", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, Method::GET, "/api/v1/devices/1", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_missing_device() {
        let response = send(&app(), Method::DELETE, "/api/v1/devices/3", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
