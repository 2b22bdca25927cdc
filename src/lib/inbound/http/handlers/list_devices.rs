use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::device::models::device::{DeviceBrand, DeviceFilter, DeviceState};
use crate::domain::device::models::page::PageRequest;
use crate::domain::device::ports::DeviceService;
use crate::inbound::http::AppState;
use crate::inbound::http::responses::{ApiError, ApiSuccess, DevicePageResponseData};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListDevicesQueryParams {
    brand: Option<String>,
    state: Option<String>,
    #[serde(default)]
    page: u32,
    #[serde(default = "default_page_size")]
    size: u32,
}

fn default_page_size() -> u32 {
    PageRequest::DEFAULT_SIZE
}

impl ListDevicesQueryParams {
    fn try_into_domain(self) -> Result<(DeviceFilter, PageRequest), ApiError> {
        let brand = non_blank(self.brand)
            .map(|raw| DeviceBrand::new(&raw))
            .transpose()?;
        let state = non_blank(self.state)
            .map(|raw| raw.parse::<DeviceState>())
            .transpose()?;
        let page = PageRequest::new(self.page, self.size)?;

        Ok((DeviceFilter::new(brand, state), page))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn list_devices<DS: DeviceService>(
    Query(params): Query<ListDevicesQueryParams>,
    State(state): State<AppState<DS>>,
) -> Result<ApiSuccess<DevicePageResponseData>, ApiError> {
    tracing::debug!("request to list devices with {:?}", params);

    let (filter, page) = params.try_into_domain()?;
    state
        .device_service
        .list_devices(&filter, &page)
        .await
        .map_err(ApiError::from)
        .map(|ref page| ApiSuccess::new(StatusCode::OK, page.into()))
}
