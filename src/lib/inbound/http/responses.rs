use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::device::models::device::{
    CreateDeviceError, DeleteDeviceError, Device, DeviceBrandEmptyError, DeviceIdError,
    DeviceNameEmptyError, DeviceStateInvalidError, GetDeviceError, ListDevicesError,
    UpdateDeviceError,
};
use crate::domain::device::models::page::{Page, PageSizeInvalidError};

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1.0 == other.1.0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
}

impl From<DeviceIdError> for ApiError {
    fn from(e: DeviceIdError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<DeviceNameEmptyError> for ApiError {
    fn from(e: DeviceNameEmptyError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<DeviceBrandEmptyError> for ApiError {
    fn from(e: DeviceBrandEmptyError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<DeviceStateInvalidError> for ApiError {
    fn from(e: DeviceStateInvalidError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<PageSizeInvalidError> for ApiError {
    fn from(e: PageSizeInvalidError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<CreateDeviceError> for ApiError {
    fn from(e: CreateDeviceError) -> Self {
        match e {
            CreateDeviceError::InvalidState(cause) => Self::BadRequest(cause.to_string()),
            CreateDeviceError::Unknown(cause) => {
                tracing::error!("{:?}\n{}", cause, cause.backtrace());
                Self::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<GetDeviceError> for ApiError {
    fn from(e: GetDeviceError) -> Self {
        match e {
            GetDeviceError::NotFound { .. } => Self::NotFound(e.to_string()),
            GetDeviceError::Unknown(cause) => {
                tracing::error!("{:?}\n{}", cause, cause.backtrace());
                Self::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<ListDevicesError> for ApiError {
    fn from(e: ListDevicesError) -> Self {
        tracing::error!("{:?}", e);
        Self::InternalServerError("Internal server error".to_string())
    }
}

impl From<UpdateDeviceError> for ApiError {
    fn from(e: UpdateDeviceError) -> Self {
        match e {
            UpdateDeviceError::NotFound { .. } => Self::NotFound(e.to_string()),
            UpdateDeviceError::InvalidState(_)
            | UpdateDeviceError::InUseBrandImmutable { .. }
            | UpdateDeviceError::InUseNameImmutable { .. } => Self::BadRequest(e.to_string()),
            UpdateDeviceError::Unknown(cause) => {
                tracing::error!("{:?}\n{}", cause, cause.backtrace());
                Self::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<DeleteDeviceError> for ApiError {
    fn from(e: DeleteDeviceError) -> Self {
        match e {
            DeleteDeviceError::NotFound { .. } => Self::NotFound(e.to_string()),
            DeleteDeviceError::InUseNotDeletable { .. } => Self::BadRequest(e.to_string()),
            DeleteDeviceError::Unknown(cause) => {
                tracing::error!("{:?}\n{}", cause, cause.backtrace());
                Self::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        match self {
            InternalServerError(e) => {
                tracing::error!("{}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponseBody::new_error(
                        "Internal server error".to_string(),
                    )),
                )
                    .into_response()
            }
            BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponseBody::new_error(message)),
            )
                .into_response(),
            NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(ApiResponseBody::new_error(message)),
            )
                .into_response(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(message: String) -> Self {
        Self {
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponseData {
    id: i64,
    name: String,
    brand: String,
    state: String,
    creation_time: String,
}

impl From<&Device> for DeviceResponseData {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id().into_inner(),
            name: device.name().to_string(),
            brand: device.brand().to_string(),
            state: device.state().to_string(),
            creation_time: device.created_on().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    number: u32,
    size: u32,
    total_elements: u64,
    total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevicePageResponseData {
    devices: Vec<DeviceResponseData>,
    page: PageMetadata,
}

impl From<&Page<Device>> for DevicePageResponseData {
    fn from(page: &Page<Device>) -> Self {
        Self {
            devices: page.items().iter().map(DeviceResponseData::from).collect(),
            page: PageMetadata {
                number: page.number(),
                size: page.size(),
                total_elements: page.total_items(),
                total_pages: page.total_pages(),
            },
        }
    }
}
