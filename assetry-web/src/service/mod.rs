pub mod asset;
pub mod attachment;
pub mod catalog;
pub mod component;
pub mod datacenter;
pub mod device;
pub mod ip_address;
pub mod licence;
pub mod network;
pub mod report;
pub mod services;
