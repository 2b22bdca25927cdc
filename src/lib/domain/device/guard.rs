//! Lifecycle rules for devices that already exist.
//!
//! While a device is in use its name and brand are frozen and it cannot be deleted. Its state
//! may still change in any direction. Both checks are pure: they look only at their arguments
//! and leave persisting the outcome to the caller.

use crate::domain::device::models::device::{
    DeleteDeviceError, Device, DeviceState, UpdateDeviceError, UpdateDeviceRequest,
};

/// Merges `proposed` into `existing` and returns the resulting device, or the reason the update
/// is refused.
///
/// Fields absent from `proposed` keep the value of `existing`. An unrecognised state literal is
/// reported before any lifecycle rule is checked. For an in-use device the merged brand and name
/// must equal the current ones, brand being checked first.
pub fn apply_update(
    existing: &Device,
    proposed: &UpdateDeviceRequest,
) -> Result<Device, UpdateDeviceError> {
    let state = match proposed.state() {
        Some(raw_state) => raw_state.parse::<DeviceState>()?,
        None => existing.state(),
    };
    let name = proposed.name().unwrap_or(existing.name());
    let brand = proposed.brand().unwrap_or(existing.brand());

    if existing.is_in_use() {
        if brand != existing.brand() {
            return Err(UpdateDeviceError::InUseBrandImmutable { id: existing.id() });
        }
        if name != existing.name() {
            return Err(UpdateDeviceError::InUseNameImmutable { id: existing.id() });
        }
    }

    Ok(Device::new(
        existing.id(),
        name.clone(),
        brand.clone(),
        state,
        existing.created_on(),
    ))
}

/// Checks that `existing` may be removed from the store.
pub fn authorize_delete(existing: &Device) -> Result<(), DeleteDeviceError> {
    if existing.is_in_use() {
        return Err(DeleteDeviceError::InUseNotDeletable { id: existing.id() });
    }

    Ok(())
}
