use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use derive_more::Display;
use thiserror::Error;

/// Represents always valid device identifier.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(i64);

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0} is not a valid device id")]
pub struct DeviceIdError(i64);
impl DeviceId {
    pub fn new(raw_id: i64) -> Result<Self, DeviceIdError> {
        if raw_id < 1 {
            Err(DeviceIdError(raw_id))
        } else {
            Ok(Self(raw_id))
        }
    }

    pub fn into_inner(self) -> i64 {
        self.0
    }
}

/// Represents always valid device name.
#[derive(Display, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeviceName(String);

#[derive(Clone, Debug, Error, PartialEq)]
#[error("device name cannot be empty")]
pub struct DeviceNameEmptyError;
impl DeviceName {
    pub fn new(raw_name: &str) -> Result<Self, DeviceNameEmptyError> {
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            Err(DeviceNameEmptyError)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Represents always valid device brand.
///
/// Equality is exact. Filtering uses [DeviceBrand::eq_ignore_case].
#[derive(Display, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeviceBrand(String);

#[derive(Clone, Debug, Error, PartialEq)]
#[error("device brand cannot be empty")]
pub struct DeviceBrandEmptyError;
impl DeviceBrand {
    pub fn new(raw_brand: &str) -> Result<Self, DeviceBrandEmptyError> {
        let trimmed = raw_brand.trim();
        if trimmed.is_empty() {
            Err(DeviceBrandEmptyError)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unicode lower-case form of the brand. Two brands are equal ignoring case exactly when
    /// their keys are equal.
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn eq_ignore_case(&self, other: &DeviceBrand) -> bool {
        self.key() == other.key()
    }
}

/// Operational state of a device.
///
/// The textual form is the lower-case literal (`available`, `in_use`, `inactive`); parsing
/// ignores case and surrounding whitespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceState {
    Available,
    InUse,
    Inactive,
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("{0:?} is not a valid device state, expected one of available, in_use, inactive")]
pub struct DeviceStateInvalidError(String);
impl DeviceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::Available => "available",
            DeviceState::InUse => "in_use",
            DeviceState::Inactive => "inactive",
        }
    }
}

impl FromStr for DeviceState {
    type Err = DeviceStateInvalidError;

    fn from_str(raw_state: &str) -> Result<Self, Self::Err> {
        match raw_state.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(DeviceState::Available),
            "in_use" => Ok(DeviceState::InUse),
            "inactive" => Ok(DeviceState::Inactive),
            _ => Err(DeviceStateInvalidError(raw_state.to_string())),
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    id: DeviceId,
    name: DeviceName,
    brand: DeviceBrand,
    state: DeviceState,
    created_on: DateTime<Utc>,
}

impl Device {
    pub fn new(
        id: DeviceId,
        name: DeviceName,
        brand: DeviceBrand,
        state: DeviceState,
        created_on: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            brand,
            state,
            created_on,
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn name(&self) -> &DeviceName {
        &self.name
    }

    pub fn brand(&self) -> &DeviceBrand {
        &self.brand
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }

    pub fn is_in_use(&self) -> bool {
        self.state == DeviceState::InUse
    }
}

/// Data required by the domain to create a [Device].
///
/// The state is kept as supplied by the caller and parsed when the device is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateDeviceRequest {
    name: DeviceName,
    brand: DeviceBrand,
    state: String,
}

impl CreateDeviceRequest {
    pub fn new(name: DeviceName, brand: DeviceBrand, state: &str) -> Self {
        Self {
            name,
            brand,
            state: state.to_string(),
        }
    }

    pub fn name(&self) -> &DeviceName {
        &self.name
    }

    pub fn brand(&self) -> &DeviceBrand {
        &self.brand
    }

    pub fn state(&self) -> &str {
        &self.state
    }
}

/// A validated device that has not been persisted yet, so it has neither id nor creation time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewDevice {
    name: DeviceName,
    brand: DeviceBrand,
    state: DeviceState,
}

impl NewDevice {
    pub fn new(name: DeviceName, brand: DeviceBrand, state: DeviceState) -> Self {
        Self { name, brand, state }
    }

    pub fn name(&self) -> &DeviceName {
        &self.name
    }

    pub fn brand(&self) -> &DeviceBrand {
        &self.brand
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }
}

/// Partial update of a [Device]. Absent fields leave the stored value unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateDeviceRequest {
    name: Option<DeviceName>,
    brand: Option<DeviceBrand>,
    state: Option<String>,
}

impl UpdateDeviceRequest {
    pub fn new(name: Option<DeviceName>, brand: Option<DeviceBrand>, state: Option<&str>) -> Self {
        Self {
            name,
            brand,
            state: state.map(str::to_string),
        }
    }

    pub fn name(&self) -> Option<&DeviceName> {
        self.name.as_ref()
    }

    pub fn brand(&self) -> Option<&DeviceBrand> {
        self.brand.as_ref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }
}

/// Optional brand and state restrictions for a listing. Both absent matches every device.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    brand: Option<DeviceBrand>,
    state: Option<DeviceState>,
}

impl DeviceFilter {
    pub fn new(brand: Option<DeviceBrand>, state: Option<DeviceState>) -> Self {
        Self { brand, state }
    }

    pub fn brand(&self) -> Option<&DeviceBrand> {
        self.brand.as_ref()
    }

    pub fn state(&self) -> Option<DeviceState> {
        self.state
    }
}

#[derive(Debug, Error)]
pub enum CreateDeviceError {
    #[error(transparent)]
    InvalidState(#[from] DeviceStateInvalidError),
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum GetDeviceError {
    #[error("device with id {id} not found")]
    NotFound { id: DeviceId },
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ListDevicesError {
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum UpdateDeviceError {
    #[error("device with id {id} not found")]
    NotFound { id: DeviceId },
    #[error(transparent)]
    InvalidState(#[from] DeviceStateInvalidError),
    #[error("cannot update brand of device {id} while it is in use")]
    InUseBrandImmutable { id: DeviceId },
    #[error("cannot update name of device {id} while it is in use")]
    InUseNameImmutable { id: DeviceId },
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum DeleteDeviceError {
    #[error("device with id {id} not found")]
    NotFound { id: DeviceId },
    #[error("cannot delete device {id} while it is in use")]
    InUseNotDeletable { id: DeviceId },
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

#[cfg(test)]
mod device_id_tests {
    use super::*;

    #[test]
    fn test_new_success() {
        let result = DeviceId::new(42);
        let expected = Ok(DeviceId(42));

        assert_eq!(result, expected);
    }

    #[test]
    fn test_zero_is_restricted() {
        let result = DeviceId::new(0);
        let expected = Err(DeviceIdError(0));

        assert_eq!(result, expected);
    }

    #[test]
    fn test_negative_is_restricted() {
        let result = DeviceId::new(-7);
        let expected = Err(DeviceIdError(-7));

        assert_eq!(result, expected);
    }
}


#[cfg(test)]
mod device_state_tests {
    use super::*;

    #[test]
    fn test_parse_lower_case_literals() {
        assert_eq!("available".parse(), Ok(DeviceState::Available));
        assert_eq!("in_use".parse(), Ok(DeviceState::InUse));
        assert_eq!("inactive".parse(), Ok(DeviceState::Inactive));
    }

    #[test]
    fn test_parse_ignores_case_and_whitespace() {
        assert_eq!("IN_USE".parse(), Ok(DeviceState::InUse));
        assert_eq!(" Available ".parse(), Ok(DeviceState::Available));
    }

    #[test]
    fn test_parse_unknown_literal() {
        let result = "inactve".parse::<DeviceState>();
        let expected = Err(DeviceStateInvalidError("inactve".to_string()));

        assert_eq!(result, expected);
    }

    #[test]
    fn test_display_uses_lower_case_literal() {
        assert_eq!(DeviceState::InUse.to_string(), "in_use");
        assert_eq!(DeviceState::Inactive.to_string(), "inactive");
    }
}
