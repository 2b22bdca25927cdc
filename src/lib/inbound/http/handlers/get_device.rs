use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::domain::device::models::device::DeviceId;
use crate::domain::device::ports::DeviceService;
use crate::inbound::http::AppState;
use crate::inbound::http::responses::{ApiError, ApiSuccess, DeviceResponseData};

pub async fn get_device<DS: DeviceService>(
    Path(id): Path<i64>,
    State(state): State<AppState<DS>>,
) -> Result<ApiSuccess<DeviceResponseData>, ApiError> {
    tracing::debug!("request to get device {}", id);

    let id = DeviceId::new(id)?;
    state
        .device_service
        .get_device(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref device| ApiSuccess::new(StatusCode::OK, device.into()))
}
