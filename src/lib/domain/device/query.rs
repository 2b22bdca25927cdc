//! Translation of a [DeviceFilter] into store criteria, and paginated listing on top of it.

use crate::domain::device::models::device::{
    Device, DeviceBrand, DeviceFilter, DeviceState, ListDevicesError,
};
use crate::domain::device::models::page::{Page, PageRequest};
use crate::domain::device::ports::DeviceRepository;

/// A single equality restriction on stored devices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceClause {
    BrandEqualsIgnoreCase(DeviceBrand),
    StateEquals(DeviceState),
}

impl DeviceClause {
    pub fn matches(&self, device: &Device) -> bool {
        match self {
            DeviceClause::BrandEqualsIgnoreCase(brand) => device.brand().eq_ignore_case(brand),
            DeviceClause::StateEquals(state) => device.state() == *state,
        }
    }
}

/// Conjunction of [DeviceClause]s. No clauses means every device matches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceCriteria(Vec<DeviceClause>);

impl DeviceCriteria {
    pub fn clauses(&self) -> &[DeviceClause] {
        &self.0
    }

    pub fn matches(&self, device: &Device) -> bool {
        self.0.iter().all(|clause| clause.matches(device))
    }
}

impl From<&DeviceFilter> for DeviceCriteria {
    fn from(filter: &DeviceFilter) -> Self {
        let mut clauses = Vec::with_capacity(2);
        if let Some(brand) = filter.brand() {
            clauses.push(DeviceClause::BrandEqualsIgnoreCase(brand.clone()));
        }
        if let Some(state) = filter.state() {
            clauses.push(DeviceClause::StateEquals(state));
        }

        Self(clauses)
    }
}

/// Reads one page of devices matching `filter` from `repo`.
pub async fn list_page<R: DeviceRepository>(
    repo: &R,
    filter: &DeviceFilter,
    page: &PageRequest,
) -> Result<Page<Device>, ListDevicesError> {
    let criteria = DeviceCriteria::from(filter);
    let (devices, total) = repo.find_devices(&criteria, page).await?;

    Ok(Page::new(devices, total, *page))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::device::models::device::{DeviceId, DeviceName};

    fn device(id: i64, brand: &str, state: DeviceState) -> Device {
        Device::new(
            DeviceId::new(id).unwrap(),
            DeviceName::new("Device").unwrap(),
            DeviceBrand::new(brand).unwrap(),
            state,
            Utc::now(),
        )
    }

    #[test]
    fn test_empty_filter_has_no_clauses() {
        let criteria = DeviceCriteria::from(&DeviceFilter::default());

        assert!(criteria.clauses().is_empty());
        assert!(criteria.matches(&device(1, "Any", DeviceState::InUse)));
        assert!(criteria.matches(&device(2, "Other", DeviceState::Inactive)));
    }

    #[test]
    fn test_filter_fields_become_clauses() {
        let brand = DeviceBrand::new("Test Brand").unwrap();
        let filter = DeviceFilter::new(Some(brand.clone()), Some(DeviceState::InUse));

        let criteria = DeviceCriteria::from(&filter);

        assert_eq!(
            criteria.clauses(),
            &[
                DeviceClause::BrandEqualsIgnoreCase(brand),
                DeviceClause::StateEquals(DeviceState::InUse),
            ]
        );
    }

    #[test]
    fn test_brand_clause_ignores_case() {
        let filter = DeviceFilter::new(Some(DeviceBrand::new("Test Brand").unwrap()), None);
        let criteria = DeviceCriteria::from(&filter);

        let matched: Vec<i64> = [
            device(1, "Test Brand", DeviceState::Available),
            device(2, "test brand", DeviceState::InUse),
            device(3, "Other", DeviceState::Available),
        ]
        .iter()
        .filter(|d| criteria.matches(d))
        .map(|d| d.id().into_inner())
        .collect();

        assert_eq!(matched, vec![1, 2]);
    }

    #[test]
    fn test_clauses_are_combined() {
        let filter = DeviceFilter::new(
            Some(DeviceBrand::new("Apple").unwrap()),
            Some(DeviceState::Inactive),
        );
        let criteria = DeviceCriteria::from(&filter);

        assert!(criteria.matches(&device(1, "APPLE", DeviceState::Inactive)));
        assert!(!criteria.matches(&device(2, "Apple", DeviceState::Available)));
        assert!(!criteria.matches(&device(3, "Samsung", DeviceState::Inactive)));
    }
}
