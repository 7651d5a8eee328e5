use chrono::Local;
use ipnetwork::Ipv4Network;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "network")]
#[serde(default)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(unique)]
    pub address: String,
    pub gateway: Option<String>,
    pub gateway_as_int: Option<i64>,
    pub reserved: i32,
    pub reserved_top_margin: i32,
    pub remarks: String,
    pub vlan: Option<i32>,
    pub data_center_id: Option<String>,
    pub environment_id: Option<String>,
    pub kind_id: Option<String>,
    pub min_ip: i64,
    pub max_ip: i64,
    pub ignore_addresses: bool,
    pub dhcp_broadcast: bool,
    pub dhcp_config: String,
    pub last_scan: Option<chrono::DateTime<Local>>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: chrono::DateTime<Local>,
    pub updated_at: chrono::DateTime<Local>,
    pub deleted: i8,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parses the IPv4 CIDR (host bits allowed, no prefix means /32).
    pub fn parse_address(address: &str) -> Option<Ipv4Network> {
        address.trim().parse::<Ipv4Network>().ok()
    }

    /// Recomputes `min_ip`/`max_ip`/`gateway_as_int` from the address.
    pub fn refresh_range(&mut self) -> bool {
        let Some(net) = Model::parse_address(&self.address) else {
            return false;
        };
        self.min_ip = u32::from(net.network()) as i64;
        self.max_ip = u32::from(net.broadcast()) as i64;
        self.gateway_as_int = self
            .gateway
            .as_deref()
            .and_then(|g| assetry_common::ipv4_to_int(g).ok())
            .map(i64::from);
        true
    }

    pub fn contains_network(&self, other: &Model) -> bool {
        other.min_ip >= self.min_ip && other.max_ip <= self.max_ip
    }

    pub fn contains_number(&self, number: i64) -> bool {
        self.min_ip <= number && number <= self.max_ip
    }

    pub fn contains_ip(&self, ip: &str) -> bool {
        assetry_common::ipv4_to_int(ip).is_ok_and(|n| self.contains_number(n as i64))
    }

    pub fn is_private(&self) -> bool {
        assetry_common::is_private_ipv4(self.address.split('/').next().unwrap_or_default())
    }

    pub fn netmask(&self) -> Option<u8> {
        self.address.split('/').nth(1)?.trim().parse().ok()
    }

    pub fn total_ips(&self) -> i64 {
        self.max_ip - self.min_ip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(address: &str) -> Model {
        let mut n = Model {
            name: address.to_string(),
            address: address.to_string(),
            ..Default::default()
        };
        assert!(n.refresh_range());
        n
    }

    #[test]
    fn range_from_cidr() {
        let n = net("10.0.1.7/24");
        assert_eq!(assetry_common::int_to_ipv4(n.min_ip as u32), "10.0.1.0");
        assert_eq!(assetry_common::int_to_ipv4(n.max_ip as u32), "10.0.1.255");
        assert_eq!(n.total_ips(), 255);
        assert_eq!(n.netmask(), Some(24));
        assert!(n.is_private());
        assert!(n.contains_ip("10.0.1.200"));
        assert!(!n.contains_ip("10.0.2.1"));

        let host = net("8.8.8.8");
        assert_eq!(host.total_ips(), 0);
        assert_eq!(host.netmask(), None);
        assert!(!host.is_private());
    }

    #[test]
    fn containment_and_invalid() {
        assert!(net("10.0.0.0/16").contains_network(&net("10.0.5.0/24")));
        assert!(!net("10.0.5.0/24").contains_network(&net("10.0.0.0/16")));
        let mut bad = Model {
            address: "10.0.0.0/33".to_string(),
            ..Default::default()
        };
        assert!(!bad.refresh_range());
        bad.address = "fe80::/64".to_string();
        assert!(!bad.refresh_range());
    }
}
