pub mod device;
pub mod redirect_config;

pub use device::DeviceClass;
pub use redirect_config::{GroupTargets, RedirectConfig, Resolution, ROOT_GROUP};
