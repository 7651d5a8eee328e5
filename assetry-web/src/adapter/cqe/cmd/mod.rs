pub mod asset;
pub mod catalog;
pub mod component;
pub mod datacenter;
pub mod licence;
pub mod network;
