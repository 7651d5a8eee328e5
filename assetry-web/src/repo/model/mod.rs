pub mod accessory;
pub mod asset;
pub mod asset_attachment;
pub mod asset_category;
pub mod asset_history;
pub mod asset_last_hostname;
pub mod asset_licence;
pub mod asset_manufacturer;
pub mod asset_model;
pub mod asset_owner;
pub mod asset_support;
pub mod attachment;
pub mod budget_info;
pub mod coa_oem_os;
pub mod component;
pub mod component_model;
pub mod data_center;
pub mod database;
pub mod database_type;
pub mod device_environment;
pub mod discovery_queue;
pub mod disk_share;
pub mod disk_share_mount;
pub mod environment;
pub mod ip_address;
pub mod ip_alias;
pub mod licence;
pub mod licence_type;
pub mod load_balancer_member;
pub mod load_balancer_pool;
pub mod load_balancer_type;
pub mod load_balancer_virtual_server;
pub mod network;
pub mod network_kind;
pub mod network_rack;
pub mod network_terminator;
pub mod network_terminator_link;
pub mod part_info;
pub mod profile;
pub mod rack;
pub mod rack_accessory;
pub mod report_odt_source;
pub mod report_odt_source_language;
pub mod server_room;
pub mod service;
pub mod software_category;
pub mod support;
pub mod support_type;
pub mod warehouse;

use chrono::{DateTime, Local};

/// Bookkeeping columns shared by the main records.
pub trait Stamped {
    fn id(&self) -> &str;
    fn stamp(&mut self, id: String, now: DateTime<Local>);
}

macro_rules! stamped {
    ($($m:ident),* $(,)?) => {
        $(
            impl Stamped for $m::Model {
                fn id(&self) -> &str {
                    &self.id
                }

                fn stamp(&mut self, id: String, now: DateTime<Local>) {
                    self.id = id;
                    if self.updated_by.is_empty() {
                        self.updated_by = self.created_by.clone();
                    }
                    self.created_at = now;
                    self.updated_at = now;
                    self.deleted = 0;
                }
            }
        )*
    };
}

stamped!(
    accessory,
    asset,
    asset_category,
    asset_manufacturer,
    asset_model,
    asset_owner,
    attachment,
    budget_info,
    coa_oem_os,
    component,
    component_model,
    data_center,
    database,
    database_type,
    device_environment,
    discovery_queue,
    disk_share,
    disk_share_mount,
    environment,
    ip_address,
    ip_alias,
    licence,
    licence_type,
    load_balancer_member,
    load_balancer_pool,
    load_balancer_type,
    load_balancer_virtual_server,
    network,
    network_kind,
    network_terminator,
    part_info,
    profile,
    rack,
    rack_accessory,
    report_odt_source,
    report_odt_source_language,
    server_room,
    service,
    software_category,
    support,
    support_type,
    warehouse,
);
