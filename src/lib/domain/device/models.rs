pub mod device;
pub mod page;
