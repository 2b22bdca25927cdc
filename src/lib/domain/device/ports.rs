use std::future::Future;

use crate::domain::device::models::device::{
    CreateDeviceError, CreateDeviceRequest, DeleteDeviceError, Device, DeviceFilter, DeviceId,
    GetDeviceError, ListDevicesError, NewDevice, UpdateDeviceError, UpdateDeviceRequest,
};
use crate::domain::device::models::page::{Page, PageRequest};
use crate::domain::device::query::DeviceCriteria;

/// `DeviceService` is the public API for the device domain.
pub trait DeviceService: Clone + Send + Sync + 'static {
    fn create_device(
        &self,
        req: &CreateDeviceRequest,
    ) -> impl Future<Output = Result<Device, CreateDeviceError>> + Send;

    fn get_device(&self, id: &DeviceId) -> impl Future<Output = Result<Device, GetDeviceError>> + Send;

    fn list_devices(
        &self,
        filter: &DeviceFilter,
        page: &PageRequest,
    ) -> impl Future<Output = Result<Page<Device>, ListDevicesError>> + Send;

    fn update_device(
        &self,
        id: &DeviceId,
        req: &UpdateDeviceRequest,
    ) -> impl Future<Output = Result<Device, UpdateDeviceError>> + Send;

    fn delete_device(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<(), DeleteDeviceError>> + Send;
}

/// `DeviceRepository` represents a store of device data.
pub trait DeviceRepository: Send + Sync + Clone + 'static {
    type Transaction: DeviceTransaction;

    /// Starts a unit of work. Changes made through it become visible once committed and are
    /// discarded if it is dropped first.
    fn begin(&self) -> impl Future<Output = Result<Self::Transaction, anyhow::Error>> + Send;

    /// Persists a new device, assigning its id and creation time.
    fn create_device(
        &self,
        device: &NewDevice,
    ) -> impl Future<Output = Result<Device, CreateDeviceError>> + Send;

    fn find_device_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, anyhow::Error>> + Send;

    /// Returns the requested slice of devices matching `criteria`, in store order, along with
    /// the number of matches across all pages.
    fn find_devices(
        &self,
        criteria: &DeviceCriteria,
        page: &PageRequest,
    ) -> impl Future<Output = Result<(Vec<Device>, u64), anyhow::Error>> + Send;
}

/// Reads and writes performed atomically against a [DeviceRepository].
pub trait DeviceTransaction: Send + Sized {
    fn find_device_by_id(
        &mut self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, anyhow::Error>> + Send;

    /// Overwrites the stored device that has the same id.
    fn save_device(
        &mut self,
        device: &Device,
    ) -> impl Future<Output = Result<(), anyhow::Error>> + Send;

    fn delete_device_by_id(
        &mut self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<(), DeleteDeviceError>> + Send;

    fn commit(self) -> impl Future<Output = Result<(), anyhow::Error>> + Send;
}
