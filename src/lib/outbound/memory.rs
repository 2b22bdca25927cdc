use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, bail};
use chrono::Utc;

use crate::domain::device::models::device::{
    CreateDeviceError, DeleteDeviceError, Device, DeviceId, NewDevice,
};
use crate::domain::device::models::page::PageRequest;
use crate::domain::device::ports::{DeviceRepository, DeviceTransaction};
use crate::domain::device::query::DeviceCriteria;

/// Process-local device store. Devices are kept in id order, which is also the listing order.
#[derive(Debug, Clone, Default)]
pub struct InMemory {
    devices: Arc<Mutex<Devices>>,
}

#[derive(Debug, Default)]
struct Devices {
    rows: BTreeMap<DeviceId, Device>,
    last_id: i64,
}

impl InMemory {
    fn lock(&self) -> Result<MutexGuard<'_, Devices>, anyhow::Error> {
        self.devices
            .lock()
            .map_err(|_| anyhow!("in-memory device store is poisoned"))
    }
}

impl DeviceRepository for InMemory {
    type Transaction = InMemoryTransaction;

    async fn begin(&self) -> Result<InMemoryTransaction, anyhow::Error> {
        Ok(InMemoryTransaction {
            store: self.clone(),
            read: BTreeMap::new(),
            pending: Vec::new(),
        })
    }

    async fn create_device(&self, device: &NewDevice) -> Result<Device, CreateDeviceError> {
        let mut devices = self.lock()?;
        devices.last_id += 1;
        let id = DeviceId::new(devices.last_id)
            .map_err(|e| anyhow!(e).context("failed to allocate device id"))?;

        let created = Device::new(
            id,
            device.name().clone(),
            device.brand().clone(),
            device.state(),
            Utc::now(),
        );
        devices.rows.insert(id, created.clone());

        Ok(created)
    }

    async fn find_device_by_id(&self, id: &DeviceId) -> Result<Option<Device>, anyhow::Error> {
        Ok(self.lock()?.rows.get(id).cloned())
    }

    async fn find_devices(
        &self,
        criteria: &DeviceCriteria,
        page: &PageRequest,
    ) -> Result<(Vec<Device>, u64), anyhow::Error> {
        let devices = self.lock()?;
        let matching: Vec<&Device> = devices
            .rows
            .values()
            .filter(|device| criteria.matches(device))
            .collect();

        let total = matching.len() as u64;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(skip)
            .take(page.size() as usize)
            .cloned()
            .collect();

        Ok((items, total))
    }
}

#[derive(Debug)]
enum PendingChange {
    Save(Device),
    Delete(DeviceId),
}

/// Staged changes against an [InMemory] store, applied together on commit.
///
/// Every row read through the transaction is remembered. Commit fails without applying anything
/// if one of those rows has changed in the store since it was read.
#[derive(Debug)]
pub struct InMemoryTransaction {
    store: InMemory,
    read: BTreeMap<DeviceId, Option<Device>>,
    pending: Vec<PendingChange>,
}

impl InMemoryTransaction {
    fn staged(&self, id: &DeviceId) -> Option<Option<&Device>> {
        self.pending.iter().rev().find_map(|change| match change {
            PendingChange::Save(device) if device.id() == *id => Some(Some(device)),
            PendingChange::Delete(deleted) if deleted == id => Some(None),
            _ => None,
        })
    }
}

impl DeviceTransaction for InMemoryTransaction {
    async fn find_device_by_id(&mut self, id: &DeviceId) -> Result<Option<Device>, anyhow::Error> {
        if let Some(staged) = self.staged(id) {
            return Ok(staged.cloned());
        }
        if let Some(seen) = self.read.get(id) {
            return Ok(seen.clone());
        }

        let found = self.store.find_device_by_id(id).await?;
        self.read.insert(*id, found.clone());

        Ok(found)
    }

    async fn save_device(&mut self, device: &Device) -> Result<(), anyhow::Error> {
        if self.find_device_by_id(&device.id()).await?.is_none() {
            bail!("device with id {} does not exist", device.id());
        }
        self.pending.push(PendingChange::Save(device.clone()));

        Ok(())
    }

    async fn delete_device_by_id(&mut self, id: &DeviceId) -> Result<(), DeleteDeviceError> {
        if self.find_device_by_id(id).await?.is_none() {
            return Err(DeleteDeviceError::NotFound { id: *id });
        }
        self.pending.push(PendingChange::Delete(*id));

        Ok(())
    }

    async fn commit(self) -> Result<(), anyhow::Error> {
        let mut devices = self.store.lock()?;
        for (id, seen) in &self.read {
            if devices.rows.get(id) != seen.as_ref() {
                bail!("device with id {} was changed by a concurrent transaction", id);
            }
        }
        for change in self.pending {
            match change {
                PendingChange::Save(device) => {
                    devices.rows.insert(device.id(), device);
                }
                PendingChange::Delete(id) => {
                    devices.rows.remove(&id);
                }
            }
        }

        Ok(())
    }
}
