pub mod create_device;
pub mod delete_device;
pub mod get_device;
pub mod list_devices;
pub mod update_device;
