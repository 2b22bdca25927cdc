use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::device::models::device::{
    DeviceBrand, DeviceBrandEmptyError, DeviceId, DeviceName, DeviceNameEmptyError,
    UpdateDeviceRequest,
};
use crate::domain::device::ports::DeviceService;
use crate::inbound::http::AppState;
use crate::inbound::http::responses::{ApiError, ApiSuccess, DeviceResponseData};

/// Body of a full replacement: every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PutDeviceHttpRequestBody {
    name: String,
    brand: String,
    state: String,
}

/// Body of a partial update: absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatchDeviceHttpRequestBody {
    name: Option<String>,
    brand: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseUpdateDeviceHttpRequestError {
    #[error(transparent)]
    Name(#[from] DeviceNameEmptyError),
    #[error(transparent)]
    Brand(#[from] DeviceBrandEmptyError),
}

impl From<ParseUpdateDeviceHttpRequestError> for ApiError {
    fn from(e: ParseUpdateDeviceHttpRequestError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl PutDeviceHttpRequestBody {
    fn try_into_domain(self) -> Result<UpdateDeviceRequest, ParseUpdateDeviceHttpRequestError> {
        let name = DeviceName::new(&self.name)?;
        let brand = DeviceBrand::new(&self.brand)?;

        Ok(UpdateDeviceRequest::new(
            Some(name),
            Some(brand),
            Some(&self.state),
        ))
    }
}

impl PatchDeviceHttpRequestBody {
    fn try_into_domain(self) -> Result<UpdateDeviceRequest, ParseUpdateDeviceHttpRequestError> {
        let name = self.name.as_deref().map(DeviceName::new).transpose()?;
        let brand = self.brand.as_deref().map(DeviceBrand::new).transpose()?;

        Ok(UpdateDeviceRequest::new(name, brand, self.state.as_deref()))
    }
}

async fn update_device<DS: DeviceService>(
    state: &AppState<DS>,
    id: i64,
    req: &UpdateDeviceRequest,
) -> Result<ApiSuccess<DeviceResponseData>, ApiError> {
    let id = DeviceId::new(id)?;
    state
        .device_service
        .update_device(&id, req)
        .await
        .map_err(ApiError::from)
        .map(|ref device| ApiSuccess::new(StatusCode::OK, device.into()))
}

pub async fn put_device<DS: DeviceService>(
    Path(id): Path<i64>,
    State(state): State<AppState<DS>>,
    Json(body): Json<PutDeviceHttpRequestBody>,
) -> Result<ApiSuccess<DeviceResponseData>, ApiError> {
    tracing::debug!("request to update device {}: {:?}", id, body);

    let domain_req = body.try_into_domain()?;
    update_device(&state, id, &domain_req).await
}

pub async fn patch_device<DS: DeviceService>(
    Path(id): Path<i64>,
    State(state): State<AppState<DS>>,
    Json(body): Json<PatchDeviceHttpRequestBody>,
) -> Result<ApiSuccess<DeviceResponseData>, ApiError> {
    tracing::debug!("request to patch device {}", id);

    let domain_req = body.try_into_domain()?;
    update_device(&state, id, &domain_req).await
}
