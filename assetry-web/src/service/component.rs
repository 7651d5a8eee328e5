//! component models and the components attached to assets

use crate::common::{ComponentKind, ComponentType};
use crate::error::AppError;
use crate::repo::model::{component, component_model, disk_share, disk_share_mount};
use crate::repo::sea::{ComponentRepo, SeaRepo};
use sea_orm::{ConnectionTrait, DbConn};
use serde::{Deserialize, Serialize};

/// Known CPU model names and their core counts, matched as substrings.
const CPU_CORES: &[(&str, i32)] = &[
    ("5160", 2),
    ("E5320", 4),
    ("E5430", 4),
    ("E5504", 4),
    ("E5506", 4),
    ("E5520", 4),
    ("E5540", 4),
    ("E5630", 4),
    ("E5620", 4),
    ("E5640", 4),
    ("E5645", 6),
    ("E5649", 6),
    ("L5520", 4),
    ("L5530", 4),
    ("L5420", 4),
    ("L5630", 4),
    ("X5460", 4),
    ("X5560", 4),
    ("X5570", 4),
    ("X5650", 6),
    ("X5660", 6),
    ("X5670", 6),
    ("E5-2640", 6),
    ("E5-2670", 8),
    ("E5-2630", 6),
    ("E5-2650", 8),
    ("E7-8837", 8),
    ("E7- 8837", 8),
    ("E7-4870", 10),
    ("E7- 4870", 10),
    ("Processor 275", 2),
    ("Processor 8216", 2),
    ("Processor 6276", 16),
    ("Dual-Core", 2),
    ("Quad-Core", 4),
    ("Six-Core", 6),
    ("2-core", 2),
    ("4-core", 4),
    ("6-core", 6),
    ("8-core", 8),
];

const CPU_VIRTUAL_LIST: &[&str] = &["bochs", "qemu", "virtual", "vmware", "xen"];

pub const MAC_PREFIX_BLACKLIST: &[&str] = &[
    "505054", "33506F", "009876", "000000", "00000C", "204153", "149120", "020054", "FEFFFF", "1AF920",
    "020820", "DEAD2C", "FEAD4D",
];

const MAX_MODEL_NAME: usize = 50;

pub fn cores_from_model(model_name: &str) -> i32 {
    CPU_CORES
        .iter()
        .find(|(name, _)| model_name.contains(name))
        .map_or(0, |(_, cores)| *cores)
}

pub fn is_virtual_cpu(family: &str) -> bool {
    let family = family.to_lowercase();
    CPU_VIRTUAL_LIST.iter().any(|v| family.contains(v))
}

/// Upper case hex digits without separators; `None` when it is not 12 of them.
pub fn normalize_mac(mac: &str) -> Option<String> {
    let digits: String = mac
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect();
    (digits.len() == 12 && digits.chars().all(|c| c.is_ascii_hexdigit())).then_some(digits)
}

/// A MAC is usable when it normalizes and does not start with a blacklisted
/// (virtual or placeholder) prefix.
pub fn is_mac_valid(mac: &str, blacklist: Option<&[String]>) -> bool {
    let Some(mac) = normalize_mac(mac) else {
        return false;
    };
    match blacklist {
        Some(prefixes) => !prefixes.iter().any(|p| mac.starts_with(&p.to_uppercase())),
        None => !MAC_PREFIX_BLACKLIST.iter().any(|p| mac.starts_with(p)),
    }
}

/// Loose description of a component model; zero and empty values count as
/// not given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentModelSpec {
    pub name: Option<String>,
    pub family: Option<String>,
    pub speed: Option<i32>,
    pub cores: Option<i32>,
    pub size: Option<i64>,
}

/// Builds the canonical model row for the type: memory and disk names are
/// generated, processors get their core count guessed.
pub fn build_component_model(
    component_type: ComponentType,
    spec: &ComponentModelSpec,
) -> Result<component_model::Model, AppError> {
    let speed = spec.speed.filter(|v| *v != 0).unwrap_or(0);
    let mut cores = spec.cores.filter(|v| *v != 0).unwrap_or(0);
    let mut size = spec.size.filter(|v| *v != 0).unwrap_or(0);
    let family = spec.family.clone().filter(|f| !f.is_empty()).unwrap_or_default();
    let custom_name = spec.name.clone().filter(|n| !n.is_empty());

    let name = match component_type {
        ComponentType::Memory => {
            if custom_name.is_some() {
                return Err(AppError::field("name", "Custom name forbidden for memory."));
            }
            let mut name = format!("RAM {family}");
            if size != 0 {
                name.push_str(&format!(" {size}MiB"));
            }
            if speed != 0 {
                name.push_str(&format!(", {speed}MHz"));
            }
            name
        }
        ComponentType::Disk => {
            if custom_name.is_some() {
                return Err(AppError::field("name", "Custom name forbidden for disks."));
            }
            if family.is_empty() {
                return Err(AppError::field("family", "Family is required for disks."));
            }
            let mut name = family.clone();
            if size != 0 {
                name.push_str(&format!(" {size}MiB"));
            }
            if speed != 0 {
                name.push_str(&format!(", {speed}RPM"));
            }
            name
        }
        _ => custom_name.unwrap_or_else(|| family.clone()),
    };
    let name: String = name.chars().take(MAX_MODEL_NAME).collect();

    if component_type == ComponentType::Processor {
        if family.is_empty() {
            return Err(AppError::field("family", "Family is required for processors."));
        }
        let known = if is_virtual_cpu(&family) { 1 } else { cores_from_model(&name) };
        cores = 1.max(cores).max(known);
        size = i64::from(cores);
    }
    Ok(component_model::Model {
        name,
        speed,
        cores,
        size,
        component_type,
        family,
        ..Default::default()
    })
}

/// Core count shown for a processor.
pub fn processor_cores(processor: &component::Model, model: Option<&component_model::Model>) -> i32 {
    match model {
        Some(m) if m.cores != 0 => m.cores,
        _ if processor.cores != 0 => processor.cores,
        _ => 1,
    }
}

pub fn guess_core_count(processor: &component::Model, model: Option<&component_model::Model>) -> i32 {
    match model {
        Some(m) => {
            let known = if is_virtual_cpu(&m.name) { 1 } else { cores_from_model(&m.name) };
            let size = i32::try_from(m.size).unwrap_or(i32::MAX);
            [1, m.cores, processor.cores, size, known].into_iter().max().unwrap_or(1)
        }
        None => 1.max(processor.cores),
    }
}

pub fn storage_size(storage: &component::Model, model: Option<&component_model::Model>) -> i64 {
    match model {
        Some(m) if m.size != 0 => m.size,
        _ => storage.size,
    }
}

pub fn mount_size(mount: &disk_share_mount::Model, share: &disk_share::Model) -> i64 {
    mount.size.unwrap_or_else(|| share.total_size())
}

fn kind_of(component_type: ComponentType) -> ComponentKind {
    match component_type {
        ComponentType::Processor => ComponentKind::Processor,
        ComponentType::Memory => ComponentKind::Memory,
        ComponentType::Disk => ComponentKind::Storage,
        ComponentType::Fibre => ComponentKind::FibreChannel,
        ComponentType::Ethernet => ComponentKind::Ethernet,
        ComponentType::Software => ComponentKind::Software,
        ComponentType::Os => ComponentKind::OperatingSystem,
        _ => ComponentKind::Generic,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentItem {
    #[serde(flatten)]
    pub component: component::Model,
    pub model_name: Option<String>,
    /// processor cores, storage size, ethernet mac validity
    pub cores: Option<i32>,
    pub size: Option<i64>,
    pub mac_valid: Option<bool>,
}

pub struct ComponentService;

impl ComponentService {
    /// Returns the model with the same unique key or stores a new one; the
    /// flag tells whether it was created.
    pub async fn create_model<C: ConnectionTrait>(
        db: &C,
        component_type: ComponentType,
        spec: &ComponentModelSpec,
    ) -> Result<(component_model::Model, bool), AppError> {
        let model = build_component_model(component_type, spec)?;
        if let Some(found) = ComponentRepo::find_model_by_key(db, &model).await? {
            if found.deleted != 0 {
                SeaRepo::restore::<component_model::Entity, _>(db, &found.id).await?;
                return Ok((ComponentRepo::get_model(db, &found.id).await?, false));
            }
            return Ok((found, false));
        }
        let id = SeaRepo::insert_with_default::<component_model::Entity, _>(db, model).await?;
        tracing::debug!(model_id = %id, "component model created");
        Ok((ComponentRepo::get_model(db, &id).await?, true))
    }

    pub async fn count(db: &DbConn, model_id: &str) -> Result<u64, AppError> {
        Ok(ComponentRepo::count_by_model(db, model_id).await?)
    }

    /// Stores a component after the per kind uniqueness rules.
    pub async fn save_component<C: ConnectionTrait>(db: &C, mut model: component::Model) -> Result<String, AppError> {
        let model_row = match model.model_id.as_deref().filter(|m| !m.is_empty()) {
            Some(id) => Some(ComponentRepo::get_model(db, id).await?),
            None => None,
        };
        let siblings = ComponentRepo::of_asset(db, &model.asset_id, Some(model.kind)).await?;
        let others = siblings.iter().filter(|c| c.id != model.id);

        match model.kind {
            ComponentKind::Processor | ComponentKind::Memory => {
                if model.index.is_some() && others.clone().any(|c| c.index == model.index) {
                    return Err(AppError::field("index", "Component with this asset and index already exists."));
                }
                if model.kind == ComponentKind::Processor {
                    if let Some(m) = &model_row {
                        model.cores = m.cores;
                    }
                }
            }
            ComponentKind::Storage => {
                if model.mount_point.is_some() && others.clone().any(|c| c.mount_point == model.mount_point) {
                    return Err(AppError::field("mount_point", "Storage with this mount point already exists."));
                }
            }
            ComponentKind::FibreChannel => {
                if model.physical_id.is_some() && others.clone().any(|c| c.physical_id == model.physical_id) {
                    return Err(AppError::field("physical_id", "Fibre channel with this physical id already exists."));
                }
            }
            ComponentKind::Ethernet => {
                let mac = model.mac.as_deref().unwrap_or_default();
                let mac = normalize_mac(mac).ok_or_else(|| AppError::field("mac", "Enter a valid MAC address."))?;
                if let Some(found) = ComponentRepo::find_by_mac(db, &mac).await? {
                    if found.id != model.id {
                        return Err(AppError::field("mac", "Ethernet with this MAC already exists."));
                    }
                }
                model.mac = Some(mac);
            }
            ComponentKind::Software => {
                if model.path.is_some() && others.clone().any(|c| c.path == model.path) {
                    return Err(AppError::field("path", "Software with this path already exists."));
                }
            }
            ComponentKind::OperatingSystem => {
                if others.clone().next().is_some() {
                    return Err(AppError::field("asset", "This asset already has an operating system."));
                }
            }
            ComponentKind::Generic => {}
        }

        if model.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<component::Entity, _>(db, model).await?)
        } else {
            Ok(SeaRepo::update_model::<component::Entity, _>(db, model).await?.id)
        }
    }

    /// Get-or-create of a software component by (asset, path); an existing
    /// row is returned untouched.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_software<C: ConnectionTrait>(
        db: &C,
        asset_id: &str,
        path: &str,
        model_name: &str,
        label: Option<&str>,
        sn: Option<&str>,
        family: Option<&str>,
        version: Option<&str>,
    ) -> Result<component::Model, AppError> {
        let spec = ComponentModelSpec {
            name: Some(model_name.to_string()),
            family: Some(family.unwrap_or(model_name).to_string()),
            ..Default::default()
        };
        let (model, _) = ComponentService::create_model(db, ComponentType::Software, &spec).await?;
        let existing = ComponentRepo::of_asset(db, asset_id, Some(ComponentKind::Software)).await?;
        if let Some(found) = existing.into_iter().find(|c| c.path.as_deref() == Some(path)) {
            return Ok(found);
        }
        let software = component::Model {
            kind: ComponentKind::Software,
            asset_id: asset_id.to_string(),
            model_id: Some(model.id),
            label: label.unwrap_or(model_name).to_string(),
            sn: sn.map(str::to_string),
            path: Some(path.to_string()),
            version: version.unwrap_or_default().to_string(),
            ..Default::default()
        };
        let id = SeaRepo::insert_with_default::<component::Entity, _>(db, software).await?;
        Ok(SeaRepo::find_by_id::<component::Entity, _>(db, &id).await?)
    }

    /// Get-or-create of the asset's operating system; label and sizes are
    /// always refreshed.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_operating_system<C: ConnectionTrait>(
        db: &C,
        asset_id: &str,
        os_name: &str,
        version: &str,
        memory: Option<i64>,
        storage: Option<i64>,
        cores_count: Option<i32>,
        family: Option<&str>,
    ) -> Result<component::Model, AppError> {
        let spec = ComponentModelSpec {
            name: Some(os_name.to_string()),
            family: Some(family.unwrap_or(os_name).to_string()),
            ..Default::default()
        };
        let (model, _) = ComponentService::create_model(db, ComponentType::Os, &spec).await?;
        let existing = ComponentRepo::of_asset(db, asset_id, Some(ComponentKind::OperatingSystem)).await?;
        let mut os = match existing.into_iter().next() {
            Some(found) => found,
            None => component::Model {
                kind: ComponentKind::OperatingSystem,
                asset_id: asset_id.to_string(),
                model_id: Some(model.id.clone()),
                ..Default::default()
            },
        };
        os.label = format!("{os_name} {version}");
        os.memory = memory.unwrap_or_default();
        os.storage = storage.unwrap_or_default();
        os.cores = cores_count.unwrap_or_default();
        os.version = version.to_string();
        let id = if os.id.is_empty() {
            SeaRepo::insert_with_default::<component::Entity, _>(db, os).await?
        } else {
            SeaRepo::update_model::<component::Entity, _>(db, os).await?.id
        };
        Ok(SeaRepo::find_by_id::<component::Entity, _>(db, &id).await?)
    }

    pub async fn save_disk_share<C: ConnectionTrait>(db: &C, mut share: disk_share::Model) -> Result<String, AppError> {
        share.wwn = share.wwn.trim().to_string();
        if share.wwn.is_empty() {
            return Err(AppError::field("wwn", "This field is required."));
        }
        if let Some(found) = ComponentRepo::find_share_by_wwn(db, &share.wwn).await? {
            if found.id != share.id {
                return Err(AppError::field("wwn", "Disk share with this WWN already exists."));
            }
        }
        if share.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<disk_share::Entity, _>(db, share).await?)
        } else {
            Ok(SeaRepo::update_model::<disk_share::Entity, _>(db, share).await?.id)
        }
    }

    pub async fn save_disk_share_mount<C: ConnectionTrait>(
        db: &C,
        mount: disk_share_mount::Model,
    ) -> Result<String, AppError> {
        SeaRepo::find_by_id::<disk_share::Entity, _>(db, &mount.share_id).await?;
        if let Some(found) = ComponentRepo::find_mount(db, &mount.share_id, &mount.asset_id).await? {
            if found.id != mount.id {
                return Err(AppError::field("__all__", "Disk share mount with this share and asset already exists."));
            }
        }
        if mount.id.is_empty() {
            Ok(SeaRepo::insert_with_default::<disk_share_mount::Entity, _>(db, mount).await?)
        } else {
            Ok(SeaRepo::update_model::<disk_share_mount::Entity, _>(db, mount).await?.id)
        }
    }

    /// Components of the asset with the figures derived from their models.
    pub async fn asset_components(
        db: &DbConn,
        asset_id: &str,
        blacklist: Option<&[String]>,
    ) -> Result<Vec<ComponentItem>, AppError> {
        let mut items = Vec::new();
        for component in ComponentRepo::of_asset(db, asset_id, None).await? {
            let model = match component.model_id.as_deref() {
                Some(id) => ComponentRepo::get_model(db, id).await.ok(),
                None => None,
            };
            let (cores, size, mac_valid) = match component.kind {
                ComponentKind::Processor => (Some(processor_cores(&component, model.as_ref())), None, None),
                ComponentKind::Storage => (None, Some(storage_size(&component, model.as_ref())), None),
                ComponentKind::Ethernet => (
                    None,
                    None,
                    Some(component.mac.as_deref().is_some_and(|m| is_mac_valid(m, blacklist))),
                ),
                _ => (None, None, None),
            };
            items.push(ComponentItem {
                model_name: model.map(|m| m.name),
                component,
                cores,
                size,
                mac_valid,
            });
        }
        Ok(items)
    }

    /// Model rows of the type matching a component kind, for pickers.
    pub async fn models_for_kind<C: ConnectionTrait>(
        db: &C,
        component_type: ComponentType,
    ) -> Result<(ComponentKind, Vec<component_model::Model>), AppError> {
        Ok((kind_of(component_type), ComponentRepo::models_of_type(db, component_type).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::testing::memory_db;

    fn spec(name: Option<&str>, family: Option<&str>, speed: i32, cores: i32, size: i64) -> ComponentModelSpec {
        ComponentModelSpec {
            name: name.map(str::to_string),
            family: family.map(str::to_string),
            speed: Some(speed),
            cores: Some(cores),
            size: Some(size),
        }
    }

    #[test]
    fn generated_names() {
        let ram = build_component_model(ComponentType::Memory, &spec(None, Some("DDR3"), 1333, 0, 4096)).unwrap();
        assert_eq!(ram.name, "RAM DDR3 4096MiB, 1333MHz");
        let disk = build_component_model(ComponentType::Disk, &spec(None, Some("SAS"), 15000, 0, 0)).unwrap();
        assert_eq!(disk.name, "SAS, 15000RPM");
        assert!(build_component_model(ComponentType::Memory, &spec(Some("x"), None, 0, 0, 0)).is_err());
        assert!(build_component_model(ComponentType::Disk, &spec(None, None, 0, 0, 0)).is_err());

        let long = "x".repeat(80);
        let other = build_component_model(ComponentType::Expansion, &spec(Some(&long), None, 0, 0, 0)).unwrap();
        assert_eq!(other.name.len(), 50);
        let by_family = build_component_model(ComponentType::Power, &spec(None, Some("PSU"), 0, 0, 0)).unwrap();
        assert_eq!(by_family.name, "PSU");
    }

    #[test]
    fn processor_cores_guessed() {
        let cpu = build_component_model(
            ComponentType::Processor,
            &spec(Some("Intel Xeon E5-2670 2.6GHz"), Some("Xeon"), 2600, 0, 0),
        )
        .unwrap();
        assert_eq!(cpu.cores, 8);
        assert_eq!(cpu.size, 8);

        let vm = build_component_model(ComponentType::Processor, &spec(Some("QEMU Virtual CPU"), Some("QEMU"), 0, 0, 0)).unwrap();
        assert_eq!(vm.cores, 1);
        assert!(build_component_model(ComponentType::Processor, &spec(Some("cpu"), None, 0, 0, 0)).is_err());

        let processor = component::Model {
            cores: 2,
            ..Default::default()
        };
        assert_eq!(processor_cores(&processor, None), 2);
        assert_eq!(processor_cores(&processor, Some(&cpu)), 8);
        assert_eq!(guess_core_count(&processor, Some(&cpu)), 8);
        assert_eq!(guess_core_count(&component::Model::default(), None), 1);
    }

    #[test]
    fn mac_rules() {
        assert_eq!(normalize_mac("00:1a:2b:3c:4d:5e").as_deref(), Some("001A2B3C4D5E"));
        assert_eq!(normalize_mac("00-1a-2b"), None);
        assert!(is_mac_valid("00:1a:2b:3c:4d:5e", None));
        assert!(!is_mac_valid("50:50:54:00:00:01", None));
        let custom = vec!["001a".to_string()];
        assert!(!is_mac_valid("00:1a:2b:3c:4d:5e", Some(custom.as_slice())));
        assert!(is_mac_valid("50:50:54:00:00:01", Some(custom.as_slice())));
    }

    #[test]
    fn sizes_fall_back() {
        let share = disk_share::Model {
            size: Some(100),
            snapshot_size: Some(20),
            ..Default::default()
        };
        let mut mount = disk_share_mount::Model::default();
        assert_eq!(mount_size(&mount, &share), 120);
        mount.size = Some(7);
        assert_eq!(mount_size(&mount, &share), 7);

        let storage = component::Model {
            size: 500,
            ..Default::default()
        };
        assert_eq!(storage_size(&storage, None), 500);
        let model = component_model::Model {
            size: 900,
            ..Default::default()
        };
        assert_eq!(storage_size(&storage, Some(&model)), 900);
    }

    #[tokio::test]
    async fn model_get_or_create() {
        let db = memory_db().await;
        let ram = spec(None, Some("DDR4"), 2400, 0, 8192);
        let (first, created) = ComponentService::create_model(&db, ComponentType::Memory, &ram).await.unwrap();
        assert!(created);
        let (second, created) = ComponentService::create_model(&db, ComponentType::Memory, &ram).await.unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);

        SeaRepo::delete_by_id::<component_model::Entity, _>(&db, &first.id).await.unwrap();
        let (revived, created) = ComponentService::create_model(&db, ComponentType::Memory, &ram).await.unwrap();
        assert!(!created);
        assert_eq!(revived.id, first.id);
        assert_eq!(revived.deleted, 0);
    }

    #[tokio::test]
    async fn component_uniqueness() {
        let db = memory_db().await;
        let cpu = component::Model {
            kind: ComponentKind::Processor,
            asset_id: "a1".to_string(),
            index: Some(0),
            label: "CPU 0".to_string(),
            ..Default::default()
        };
        ComponentService::save_component(&db, cpu.clone()).await.unwrap();
        assert!(ComponentService::save_component(&db, cpu.clone()).await.is_err());
        // memory indexes are counted separately
        let memory = component::Model {
            kind: ComponentKind::Memory,
            ..cpu
        };
        ComponentService::save_component(&db, memory).await.unwrap();

        let eth = component::Model {
            kind: ComponentKind::Ethernet,
            asset_id: "a1".to_string(),
            mac: Some("00:1a:2b:3c:4d:5e".to_string()),
            ..Default::default()
        };
        let id = ComponentService::save_component(&db, eth.clone()).await.unwrap();
        let saved = SeaRepo::find_by_id::<component::Entity, _>(&db, &id).await.unwrap();
        assert_eq!(saved.mac.as_deref(), Some("001A2B3C4D5E"));
        let other_asset = component::Model {
            asset_id: "a2".to_string(),
            ..eth
        };
        assert!(ComponentService::save_component(&db, other_asset).await.is_err());
    }

    #[tokio::test]
    async fn software_and_os_get_or_create() {
        let db = memory_db().await;
        let first = ComponentService::create_software(&db, "a1", "/usr/bin/nginx", "nginx", None, None, None, Some("1.24"))
            .await
            .unwrap();
        let again = ComponentService::create_software(&db, "a1", "/usr/bin/nginx", "nginx", Some("other"), None, None, None)
            .await
            .unwrap();
        assert_eq!(first.id, again.id);
        assert_eq!(again.label, "nginx");

        let os = ComponentService::create_operating_system(&db, "a1", "Debian", "12", Some(2048), None, Some(4), None)
            .await
            .unwrap();
        let updated = ComponentService::create_operating_system(&db, "a1", "Debian", "13", None, None, None, None)
            .await
            .unwrap();
        assert_eq!(os.id, updated.id);
        assert_eq!(updated.label, "Debian 13");
        assert_eq!(os.memory, 2048);
    }
}
