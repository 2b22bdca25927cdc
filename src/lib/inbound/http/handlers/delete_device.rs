use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::domain::device::models::device::DeviceId;
use crate::domain::device::ports::DeviceService;
use crate::inbound::http::AppState;
use crate::inbound::http::responses::ApiError;

pub async fn delete_device<DS: DeviceService>(
    Path(id): Path<i64>,
    State(state): State<AppState<DS>>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!("request to delete device {}", id);

    let id = DeviceId::new(id)?;
    state
        .device_service
        .delete_device(&id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
