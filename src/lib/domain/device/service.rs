use crate::domain::device::guard;
use crate::domain::device::models::device::{
    CreateDeviceError, CreateDeviceRequest, DeleteDeviceError, Device, DeviceFilter, DeviceId,
    DeviceState, GetDeviceError, ListDevicesError, NewDevice, UpdateDeviceError,
    UpdateDeviceRequest,
};
use crate::domain::device::models::page::{Page, PageRequest};
use crate::domain::device::ports::{DeviceRepository, DeviceService, DeviceTransaction};
use crate::domain::device::query;

/// Canonical implementation of the [DeviceService] port, through which the device domain API is
/// consumed.
///
/// Updates and deletions run their fetch, lifecycle check and write inside one repository
/// transaction. Concurrent writers to the same device are not arbitrated here.
#[derive(Debug, Clone)]
pub struct Service<R: DeviceRepository> {
    repo: R,
}

impl<R: DeviceRepository> Service<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

impl<R: DeviceRepository> DeviceService for Service<R> {
    #[tracing::instrument(skip(self, req), fields(name = %req.name(), brand = %req.brand()))]
    async fn create_device(&self, req: &CreateDeviceRequest) -> Result<Device, CreateDeviceError> {
        let state = req.state().parse::<DeviceState>()?;
        let device = NewDevice::new(req.name().clone(), req.brand().clone(), state);

        self.repo.create_device(&device).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_device(&self, id: &DeviceId) -> Result<Device, GetDeviceError> {
        self.repo
            .find_device_by_id(id)
            .await?
            .ok_or(GetDeviceError::NotFound { id: *id })
    }

    #[tracing::instrument(skip(self))]
    async fn list_devices(
        &self,
        filter: &DeviceFilter,
        page: &PageRequest,
    ) -> Result<Page<Device>, ListDevicesError> {
        query::list_page(&self.repo, filter, page).await
    }

    #[tracing::instrument(skip(self, req))]
    async fn update_device(
        &self,
        id: &DeviceId,
        req: &UpdateDeviceRequest,
    ) -> Result<Device, UpdateDeviceError> {
        let mut tx = self.repo.begin().await?;
        let existing = tx
            .find_device_by_id(id)
            .await?
            .ok_or(UpdateDeviceError::NotFound { id: *id })?;

        let updated = guard::apply_update(&existing, req)?;

        tx.save_device(&updated).await?;
        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_device(&self, id: &DeviceId) -> Result<(), DeleteDeviceError> {
        let mut tx = self.repo.begin().await?;
        let existing = tx
            .find_device_by_id(id)
            .await?
            .ok_or(DeleteDeviceError::NotFound { id: *id })?;

        guard::authorize_delete(&existing)?;

        tx.delete_device_by_id(id).await?;
        tx.commit().await?;

        Ok(())
    }
}
