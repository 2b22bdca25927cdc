use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::device::models::device::{
    CreateDeviceRequest, DeviceBrand, DeviceBrandEmptyError, DeviceName, DeviceNameEmptyError,
};
use crate::domain::device::ports::DeviceService;
use crate::inbound::http::AppState;
use crate::inbound::http::responses::{ApiError, ApiSuccess, DeviceResponseData};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateDeviceHttpRequestBody {
    name: String,
    brand: String,
    state: String,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateDeviceHttpRequestError {
    #[error(transparent)]
    Name(#[from] DeviceNameEmptyError),
    #[error(transparent)]
    Brand(#[from] DeviceBrandEmptyError),
}

impl From<ParseCreateDeviceHttpRequestError> for ApiError {
    fn from(e: ParseCreateDeviceHttpRequestError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl CreateDeviceHttpRequestBody {
    fn try_into_domain(self) -> Result<CreateDeviceRequest, ParseCreateDeviceHttpRequestError> {
        let name = DeviceName::new(&self.name)?;
        let brand = DeviceBrand::new(&self.brand)?;

        Ok(CreateDeviceRequest::new(name, brand, &self.state))
    }
}

pub async fn create_device<DS: DeviceService>(
    State(state): State<AppState<DS>>,
    Json(body): Json<CreateDeviceHttpRequestBody>,
) -> Result<ApiSuccess<DeviceResponseData>, ApiError> {
    tracing::debug!("request to create device {:?}", body.name);

    let domain_req = body.try_into_domain()?;
    state
        .device_service
        .create_device(&domain_req)
        .await
        .map_err(ApiError::from)
        .map(|ref device| ApiSuccess::new(StatusCode::CREATED, device.into()))
}
