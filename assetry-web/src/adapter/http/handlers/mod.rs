mod asset_handler;
mod catalog_handler;
mod component_handler;
pub mod crud;
mod datacenter_handler;
mod device_handler;
mod file_handler;
mod licence_handler;
mod network_handler;
mod service_handler;

pub use asset_handler::*;
pub use catalog_handler::*;
pub use component_handler::*;
pub use datacenter_handler::*;
pub use device_handler::*;
pub use file_handler::*;
pub use licence_handler::*;
pub use network_handler::*;
pub use service_handler::*;
