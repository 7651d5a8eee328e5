//! IPv4 range bookkeeping: subnetworks, free addresses, usage ranges and the
//! containment tree.

use crate::error::{AppError, FieldErrors};
use crate::repo::model::{environment, ip_address, network};
use crate::repo::sea::{IpAddressRepo, NetworkRepo, SeaRepo};
use assetry_common::int_to_ipv4;
use lazy_static::lazy_static;
use regex::Regex;
use sea_orm::{ConnectionTrait, DbConn, TransactionTrait};
use serde::Serialize;

pub const INVALID_NETWORK: &str = "The address value specified is not a valid network.";

lazy_static! {
    static ref HOSTS_NAMING_TEMPLATE: Regex = Regex::new(r"<[0-9]+,[0-9]+>.*\.[a-zA-Z0-9]+").unwrap();
    static ref TEMPLATE_DISALLOWED: Regex = Regex::new(r"[^a-z0-9<>,.|-]").unwrap();
    static ref SLUG: Regex = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRange {
    pub range_start: String,
    pub range_end: String,
    /// `free`, `addr` or `network`
    #[serde(rename = "type")]
    pub range_type: String,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,
}

impl UsageRange {
    fn new(start: i64, end: i64, range_type: &str) -> Self {
        Self {
            range_start: int_to_ipv4(start as u32),
            range_end: int_to_ipv4(end as u32),
            range_type: range_type.to_string(),
            amount: end - start + 1,
            network_id: None,
            network_name: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkNode {
    pub network: network::Model,
    pub subnetworks: Vec<NetworkNode>,
}

fn same_range(a: &network::Model, b: &network::Model) -> bool {
    a.min_ip == b.min_ip && a.max_ip == b.max_ip
}

/// First level children of `parent` among `candidates`: every candidate
/// inside another candidate is dropped. Ordered by `min_ip`.
pub fn subnetworks<'a>(parent: &network::Model, candidates: &'a [network::Model]) -> Vec<&'a network::Model> {
    let inside: Vec<&network::Model> = candidates
        .iter()
        .filter(|c| c.id != parent.id && parent.contains_network(c))
        .collect();
    let mut children: Vec<&network::Model> = inside
        .iter()
        .filter(|sub| {
            !inside
                .iter()
                .any(|net| !same_range(net, sub) && net.contains_network(sub))
        })
        .copied()
        .collect();
    children.sort_by_key(|n| n.min_ip);
    children
}

/// Addresses of the network not covered by any of its children.
pub fn subaddresses<'a>(
    parent: &network::Model,
    children: &[&network::Model],
    addresses: &'a [ip_address::Model],
) -> Vec<&'a ip_address::Model> {
    let mut found: Vec<&ip_address::Model> = addresses
        .iter()
        .filter(|a| parent.contains_number(a.number))
        .filter(|a| !children.iter().any(|c| c.contains_number(a.number)))
        .collect();
    found.sort_by_key(|a| a.number);
    found
}

pub fn free_ips(parent: &network::Model, children: &[&network::Model], subaddresses: usize) -> i64 {
    let taken: i64 = children.iter().map(|c| c.total_ips()).sum();
    parent.total_ips()
        - taken
        - subaddresses as i64
        - i64::from(parent.reserved)
        - i64::from(parent.reserved_top_margin)
}

enum Used<'a> {
    Addresses(i64, i64),
    Network(&'a network::Model),
}

impl Used<'_> {
    fn bounds(&self) -> (i64, i64) {
        match self {
            Used::Addresses(start, end) => (*start, *end),
            Used::Network(net) => (net.min_ip, net.max_ip),
        }
    }
}

/// Children and loose addresses merged into ranges, with the gaps between
/// them reported as free blocks.
pub fn ip_usage_aggregated(
    parent: &network::Model,
    children: &[&network::Model],
    subaddresses: &[&ip_address::Model],
) -> Vec<UsageRange> {
    let mut contained: Vec<(i64, Option<&network::Model>)> = children
        .iter()
        .map(|c| (c.min_ip, Some(*c)))
        .chain(subaddresses.iter().map(|a| (a.number, None)))
        .collect();
    contained.sort_by_key(|(start, _)| *start);

    let mut used: Vec<Used> = Vec::new();
    let mut run: Option<(i64, i64)> = None;
    for (number, net) in contained {
        match net {
            None => {
                run = match run {
                    Some((start, end)) if end + 1 == number => Some((start, number)),
                    Some((start, end)) => {
                        used.push(Used::Addresses(start, end));
                        Some((number, number))
                    }
                    None => Some((number, number)),
                };
            }
            Some(net) => {
                if let Some((start, end)) = run.take() {
                    used.push(Used::Addresses(start, end));
                }
                used.push(Used::Network(net));
            }
        }
    }
    if let Some((start, end)) = run {
        used.push(Used::Addresses(start, end));
    }

    if used.is_empty() {
        return vec![UsageRange::new(parent.min_ip, parent.max_ip, "free")];
    }
    let mut parsed = Vec::with_capacity(used.len() * 2);
    let mut next = parent.min_ip;
    for item in &used {
        let (start, end) = item.bounds();
        if start != next {
            parsed.push(UsageRange::new(next, start - 1, "free"));
        }
        parsed.push(match item {
            Used::Addresses(..) => UsageRange::new(start, end, "addr"),
            Used::Network(net) => UsageRange {
                network_id: Some(net.id.clone()),
                network_name: Some(net.name.clone()),
                ..UsageRange::new(start, end, "network")
            },
        });
        next = end + 1;
    }
    if let Some(last) = used.last() {
        if last.bounds().1 < parent.max_ip {
            parsed.push(UsageRange::new(last.bounds().1 + 1, parent.max_ip, "free"));
        }
    }
    parsed
}

fn grow(net: network::Model, remaining: &mut Vec<network::Model>) -> NetworkNode {
    let candidates: Vec<network::Model> = remaining
        .iter()
        .filter(|n| !same_range(n, &net) && net.contains_network(n))
        .cloned()
        .collect();
    let children: Vec<network::Model> = subnetworks(&net, &candidates).into_iter().cloned().collect();
    let subnetworks = children.into_iter().map(|c| grow(c, remaining)).collect();
    if let Some(i) = remaining.iter().position(|n| same_range(n, &net)) {
        remaining.remove(i);
    }
    NetworkNode { network: net, subnetworks }
}

/// Forest of L3 containment, roots ordered by (min ip, -max ip).
pub fn network_tree(mut all: Vec<network::Model>) -> Vec<NetworkNode> {
    all.sort_by(|a, b| a.min_ip.cmp(&b.min_ip).then(b.max_ip.cmp(&a.max_ip)));
    let mut tree = Vec::new();
    while let Some(first) = all.first().cloned() {
        tree.push(grow(first, &mut all));
    }
    tree
}

pub fn validate_environment(env: &environment::Model) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    if !SLUG.is_match(env.name.trim()) {
        errors.add("name", "You can use only this characters: [a-zA-Z0-9_-]");
    }
    let template = &env.hosts_naming_template;
    if TEMPLATE_DISALLOWED.is_match(template) {
        errors.add("hosts_naming_template", "Please remove disallowed characters.");
    } else if template.split('|').any(|part| !HOSTS_NAMING_TEMPLATE.is_match(part)) {
        errors.add(
            "hosts_naming_template",
            "Incorrect template structure. Please see example below.",
        );
    }
    errors.into_result()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkUsage {
    pub network: network::Model,
    pub free_ips: i64,
    pub subnetworks: Vec<network::Model>,
    pub ranges: Vec<UsageRange>,
}

pub struct NetworkService;

impl NetworkService {
    /// Validates the CIDR, derives the integer range and stores the network.
    pub async fn save_network<C: ConnectionTrait>(
        db: &C,
        mut model: network::Model,
        terminator_ids: Option<Vec<String>>,
    ) -> Result<String, AppError> {
        if !model.refresh_range() {
            return Err(AppError::field("address", INVALID_NETWORK));
        }
        if let Some(existing) = NetworkRepo::find_by_address(db, &model.address).await? {
            if existing.id != model.id {
                return Err(AppError::field(
                    "address",
                    format!("Network {} already exists.", model.address),
                ));
            }
        }
        let id = if model.id.is_empty() {
            SeaRepo::insert_with_default::<network::Entity, _>(db, model).await?
        } else {
            SeaRepo::update_model::<network::Entity, _>(db, model).await?.id
        };
        if let Some(terminators) = terminator_ids {
            NetworkRepo::set_terminators(db, &id, &terminators).await?;
        }
        Ok(id)
    }

    pub async fn save_environment<C: ConnectionTrait>(
        db: &C,
        mut model: environment::Model,
    ) -> Result<String, AppError> {
        model.name = model.name.trim().to_string();
        validate_environment(&model)?;
        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<environment::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<environment::Entity, _>(db, model).await?.id)
        }
    }

    pub async fn usage(db: &DbConn, network_id: &str) -> Result<NetworkUsage, AppError> {
        let net = NetworkRepo::get_network(db, network_id).await?;
        let candidates = NetworkRepo::contained_in(db, &net).await?;
        let addresses = IpAddressRepo::in_range(db, net.min_ip, net.max_ip).await?;
        let children = subnetworks(&net, &candidates);
        let loose = subaddresses(&net, &children, &addresses);
        let ranges = ip_usage_aggregated(&net, &children, &loose);
        let free = free_ips(&net, &children, loose.len());
        let subnetworks = children.into_iter().cloned().collect();
        Ok(NetworkUsage {
            network: net,
            free_ips: free,
            subnetworks,
            ranges,
        })
    }

    pub async fn tree(db: &DbConn) -> Result<Vec<NetworkNode>, AppError> {
        Ok(network_tree(NetworkRepo::all_networks(db).await?))
    }

    /// Smallest network containing the address.
    pub async fn from_ip<C: ConnectionTrait>(db: &C, ip: &str) -> Result<Option<network::Model>, AppError> {
        Ok(NetworkService::all_from_ip(db, ip).await?.into_iter().next())
    }

    pub async fn all_from_ip<C: ConnectionTrait>(db: &C, ip: &str) -> Result<Vec<network::Model>, AppError> {
        let number = assetry_common::ipv4_to_int(ip).map_err(|e| AppError::field("address", e.to_string()))?;
        Ok(NetworkRepo::all_from_number(db, i64::from(number)).await?)
    }

    /// Copies every network as `Copy of <name>` with a `/1` mask; one message
    /// per network that could not be copied.
    pub async fn copy_networks(db: &DbConn, ids: &[String]) -> Result<Vec<String>, AppError> {
        let mut errors = Vec::new();
        for id in ids {
            let net = NetworkRepo::get_network(db, id).await?;
            let host = net.address.rsplit_once('/').map_or(net.address.as_str(), |(addr, _)| addr);
            let copy = network::Model {
                name: format!("Copy of {}", net.name),
                address: format!("{host}/1"),
                gateway: net.gateway.clone(),
                kind_id: net.kind_id.clone(),
                data_center_id: net.data_center_id.clone(),
                reserved: 10,
                ..Default::default()
            };
            let address = copy.address.clone();
            let terminators = NetworkRepo::terminator_ids(db, &net.id).await?;
            let txn = db.begin().await?;
            match NetworkService::save_network(&txn, copy, Some(terminators)).await {
                Ok(new_id) => {
                    txn.commit().await?;
                    tracing::info!(network_id = %new_id, "network {} copied", net.name);
                }
                Err(AppError::Form(_)) => {
                    txn.rollback().await?;
                    errors.push(format!("Network {address} already exists."));
                }
                Err(e) => {
                    txn.rollback().await?;
                    tracing::error!("copy network {address} failed: {e:?}");
                    errors.push(format!("Failed to create {address}."));
                }
            }
        }
        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::testing::memory_db;

    fn net(id: &str, address: &str) -> network::Model {
        let mut n = network::Model {
            id: id.to_string(),
            name: id.to_string(),
            address: address.to_string(),
            ..Default::default()
        };
        assert!(n.refresh_range());
        n
    }

    fn ip(address: &str) -> ip_address::Model {
        ip_address::Model {
            address: address.to_string(),
            number: i64::from(assetry_common::ipv4_to_int(address).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn only_first_level_children() {
        let parent = net("root", "10.0.0.0/16");
        let candidates = vec![
            net("a", "10.0.1.0/24"),
            net("a1", "10.0.1.0/26"),
            net("b", "10.0.0.0/24"),
            net("outside", "10.1.0.0/24"),
        ];
        let ids: Vec<&str> = subnetworks(&parent, &candidates).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn same_range_networks_are_siblings() {
        // host bits are accepted, both cover 10.0.1.0 - 10.0.1.255
        let parent = net("root", "10.0.0.0/16");
        let candidates = vec![net("a", "10.0.1.0/24"), net("b", "10.0.1.5/24")];
        let children = subnetworks(&parent, &candidates);
        let ids: Vec<&str> = children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"a") && ids.contains(&"b"));
        // 65535 - 255 - 255
        assert_eq!(free_ips(&parent, &children, 0), 65025);
    }

    #[test]
    fn free_ips_and_usage() {
        let parent = net("root", "10.0.0.0/24");
        let candidates = vec![net("sub", "10.0.0.128/26")];
        let addresses = vec![ip("10.0.0.5"), ip("10.0.0.6"), ip("10.0.0.7"), ip("10.0.0.10"), ip("10.0.0.130")];
        let children = subnetworks(&parent, &candidates);
        let loose = subaddresses(&parent, &children, &addresses);
        assert_eq!(loose.len(), 4);
        // 255 - 63 - 4 - 0 - 0
        assert_eq!(free_ips(&parent, &children, loose.len()), 188);

        let ranges = ip_usage_aggregated(&parent, &children, &loose);
        let summary: Vec<(&str, &str, &str, i64)> = ranges
            .iter()
            .map(|r| (r.range_start.as_str(), r.range_end.as_str(), r.range_type.as_str(), r.amount))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("10.0.0.0", "10.0.0.4", "free", 5),
                ("10.0.0.5", "10.0.0.7", "addr", 3),
                ("10.0.0.8", "10.0.0.9", "free", 2),
                ("10.0.0.10", "10.0.0.10", "addr", 1),
                ("10.0.0.11", "10.0.0.127", "free", 117),
                ("10.0.0.128", "10.0.0.191", "network", 64),
                ("10.0.0.192", "10.0.0.255", "free", 64),
            ]
        );
        assert_eq!(ranges[5].network_id.as_deref(), Some("sub"));
    }

    #[test]
    fn empty_network_is_one_free_block() {
        let parent = net("root", "192.168.1.0/30");
        let ranges = ip_usage_aggregated(&parent, &[], &[]);
        assert_eq!(ranges, vec![UsageRange::new(parent.min_ip, parent.max_ip, "free")]);
        assert_eq!(ranges[0].amount, 4);
    }

    #[test]
    fn tree_follows_containment() {
        let tree = network_tree(vec![
            net("c", "10.0.1.0/25"),
            net("other", "172.16.0.0/24"),
            net("a", "10.0.0.0/16"),
            net("b", "10.0.1.0/24"),
        ]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].network.id, "a");
        assert_eq!(tree[0].subnetworks.len(), 1);
        assert_eq!(tree[0].subnetworks[0].network.id, "b");
        assert_eq!(tree[0].subnetworks[0].subnetworks[0].network.id, "c");
        assert_eq!(tree[1].network.id, "other");
        assert!(tree[1].subnetworks.is_empty());
    }

    #[test]
    fn environment_rules() {
        let mut env = environment::Model {
            name: "dc-1_prod".to_string(),
            hosts_naming_template: "h<200,299>.dc|h<400,499>.dc".to_string(),
            ..Default::default()
        };
        assert!(validate_environment(&env).is_ok());

        env.hosts_naming_template = "H<1,2>.dc".to_string();
        let Err(AppError::Form(errors)) = validate_environment(&env) else {
            panic!("expected form error");
        };
        assert_eq!(
            errors.get("hosts_naming_template").unwrap()[0],
            "Please remove disallowed characters."
        );

        env.hosts_naming_template = "h<1,2>.dc|broken".to_string();
        env.name = "bad name".to_string();
        let Err(AppError::Form(errors)) = validate_environment(&env) else {
            panic!("expected form error");
        };
        assert!(errors.get("name").is_some());
        assert_eq!(
            errors.get("hosts_naming_template").unwrap()[0],
            "Incorrect template structure. Please see example below."
        );
    }

    #[tokio::test]
    async fn save_and_copy_network() {
        let db = memory_db().await;
        let bad = network::Model {
            name: "bad".to_string(),
            address: "10.0.0.0/40".to_string(),
            ..Default::default()
        };
        let Err(AppError::Form(errors)) = NetworkService::save_network(&db, bad, None).await else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("address").unwrap()[0], INVALID_NETWORK);

        let id = NetworkService::save_network(
            &db,
            network::Model {
                name: "office".to_string(),
                address: "10.20.0.0/24".to_string(),
                gateway: Some("10.20.0.1".to_string()),
                ..Default::default()
            },
            Some(vec!["t1".to_string()]),
        )
        .await
        .unwrap();
        let saved = NetworkRepo::get_network(&db, &id).await.unwrap();
        assert_eq!(saved.gateway_as_int, Some(i64::from(assetry_common::ipv4_to_int("10.20.0.1").unwrap())));

        let errors = NetworkService::copy_networks(&db, &[id.clone()]).await.unwrap();
        assert!(errors.is_empty());
        let copy = NetworkRepo::find_by_address(&db, "10.20.0.0/1").await.unwrap().unwrap();
        assert_eq!(copy.name, "Copy of office");
        assert_eq!(copy.gateway.as_deref(), Some("10.20.0.1"));
        assert_eq!(NetworkRepo::terminator_ids(&db, &copy.id).await.unwrap(), vec!["t1".to_string()]);

        let errors = NetworkService::copy_networks(&db, &[id]).await.unwrap();
        assert_eq!(errors, vec!["Network 10.20.0.0/1 already exists.".to_string()]);
    }

    #[tokio::test]
    async fn deleted_network_keeps_its_address() {
        let db = memory_db().await;
        let office = || network::Model {
            name: "office".to_string(),
            address: "10.20.0.0/24".to_string(),
            ..Default::default()
        };
        let id = NetworkService::save_network(&db, office(), None).await.unwrap();
        SeaRepo::delete_by_id::<network::Entity, _>(&db, &id).await.unwrap();

        let Err(AppError::Form(errors)) = NetworkService::save_network(&db, office(), None).await else {
            panic!("expected form error");
        };
        assert_eq!(errors.get("address").unwrap()[0], "Network 10.20.0.0/24 already exists.");
    }

    #[tokio::test]
    async fn smallest_network_wins() {
        let db = memory_db().await;
        for (name, address) in [("big", "10.0.0.0/8"), ("small", "10.1.2.0/24")] {
            NetworkService::save_network(
                &db,
                network::Model {
                    name: name.to_string(),
                    address: address.to_string(),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        }
        let found = NetworkService::from_ip(&db, "10.1.2.3").await.unwrap().unwrap();
        assert_eq!(found.name, "small");
        assert_eq!(NetworkService::all_from_ip(&db, "10.1.2.3").await.unwrap().len(), 2);
        assert!(NetworkService::from_ip(&db, "192.168.0.1").await.unwrap().is_none());
    }
}
