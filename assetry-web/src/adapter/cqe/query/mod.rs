pub mod asset;
pub mod catalog;
pub mod network;
