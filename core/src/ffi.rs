//! Swift-facing API.
//!
//! Ids cross the boundary as strings and timestamps as unix seconds; every
//! value coming in is parsed and validated before it reaches the locker.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::error::GreerError;
use crate::locker::Locker;
use crate::metrics::{CategoryWeights, PackStats, WeightClass};
use crate::models::{AssociationId, Gear, GearAssociation, GearDraft, GearId, GearType, Pack, PackId};
use crate::settings::Settings;
use crate::storage::{GearQuery, MemoryStorage};
use crate::units::{convert, WeightUnit};

#[uniffi::export]
pub fn convert_weight(value: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    convert(value, from, to)
}

#[uniffi::export]
pub fn unit_abbreviation(unit: WeightUnit) -> String {
    unit.abbreviation().to_string()
}

#[uniffi::export]
pub fn classify_weight(weight: f64, unit: WeightUnit) -> WeightClass {
    WeightClass::from_weight(weight, unit)
}

#[uniffi::export]
pub fn weight_class_label(class: WeightClass) -> String {
    class.label().to_string()
}

#[uniffi::export]
pub fn gear_type_icon(gear_type: GearType) -> String {
    gear_type.icon().to_string()
}

#[uniffi::export]
pub fn gear_type_picker_order() -> Vec<GearType> {
    GearType::picker_order()
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct SettingsRecord {
    pub default_gear_weight_unit: WeightUnit,
    pub default_pack_weight_unit: WeightUnit,
    pub icloud_sync: bool,
}

impl From<SettingsRecord> for Settings {
    fn from(r: SettingsRecord) -> Self {
        Settings {
            default_gear_weight_unit: r.default_gear_weight_unit,
            default_pack_weight_unit: r.default_pack_weight_unit,
            icloud_sync: r.icloud_sync,
        }
    }
}

impl From<&Settings> for SettingsRecord {
    fn from(s: &Settings) -> Self {
        SettingsRecord {
            default_gear_weight_unit: s.default_gear_weight_unit,
            default_pack_weight_unit: s.default_pack_weight_unit,
            icloud_sync: s.icloud_sync,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct GearInput {
    pub brand: String,
    pub model: String,
    pub color: String,
    pub weight: f64,
    pub weight_unit: Option<WeightUnit>,
    pub description: String,
    pub url: String,
    pub worn: bool,
    pub consumable: bool,
    pub gear_type: GearType,
}

impl From<GearInput> for GearDraft {
    fn from(i: GearInput) -> Self {
        GearDraft {
            brand: i.brand,
            model: i.model,
            color: i.color,
            weight: i.weight,
            weight_unit: i.weight_unit,
            description: i.description,
            url: i.url,
            worn: i.worn,
            consumable: i.consumable,
            gear_type: i.gear_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct GearRecord {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub weight: f64,
    pub weight_unit: WeightUnit,
    pub description: String,
    pub url: String,
    pub worn: bool,
    pub consumable: bool,
    pub gear_type: GearType,
    pub icon: String,
    pub weight_class: WeightClass,
}

impl From<&Gear> for GearRecord {
    fn from(g: &Gear) -> Self {
        GearRecord {
            id: g.id.to_string(),
            brand: g.brand.clone(),
            model: g.model.clone(),
            color: g.color.clone(),
            weight: g.weight,
            weight_unit: g.weight_unit,
            description: g.description.clone(),
            url: g.url.clone(),
            worn: g.worn,
            consumable: g.consumable,
            gear_type: g.gear_type,
            icon: g.gear_type.icon().to_string(),
            weight_class: WeightClass::from_weight(g.weight, g.weight_unit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct AssociationRecord {
    pub id: String,
    pub gear_id: String,
    pub quantity: u32,
    pub starred: bool,
}

impl From<&GearAssociation> for AssociationRecord {
    fn from(a: &GearAssociation) -> Self {
        AssociationRecord {
            id: a.id.to_string(),
            gear_id: a.gear_id.to_string(),
            quantity: a.quantity,
            starred: a.starred,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct PackRecord {
    pub id: String,
    pub name: String,
    pub created_unix: i64,
    pub start_unix: i64,
    pub end_unix: i64,
    pub weight_unit: WeightUnit,
    pub items: Vec<AssociationRecord>,
    /// `None` while the breakdown is stale.
    pub cached_weights: Option<CategoryWeights>,
    /// Three `[r, g, b]` swatches for the pack icon.
    pub icon: Vec<Vec<f64>>,
}

impl From<&Pack> for PackRecord {
    fn from(p: &Pack) -> Self {
        PackRecord {
            id: p.id.to_string(),
            name: p.name.clone(),
            created_unix: p.created_at.timestamp(),
            start_unix: p.start_date().timestamp(),
            end_unix: p.end_date().timestamp(),
            weight_unit: p.weight_unit(),
            items: p.associations().iter().map(AssociationRecord::from).collect(),
            cached_weights: p.cached_weights(),
            icon: p.icon().iter().map(|swatch| swatch.to_vec()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct PackStatsRecord {
    pub unit: WeightUnit,
    pub total_weight: f64,
    pub weights: CategoryWeights,
    pub gear_count: u32,
    pub item_count: u64,
    pub weight_class: WeightClass,
    pub weight_class_label: String,
}

impl From<PackStats> for PackStatsRecord {
    fn from(s: PackStats) -> Self {
        PackStatsRecord {
            unit: s.unit,
            total_weight: s.total_weight,
            weights: s.weights,
            gear_count: s.gear_count,
            item_count: s.item_count,
            weight_class: s.weight_class,
            weight_class_label: s.weight_class.label().to_string(),
        }
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, GreerError> {
    DateTime::from_timestamp(secs, 0).ok_or(GreerError::InvalidTripDates)
}

fn gear_ids(ids: &[String]) -> Result<Vec<GearId>, GreerError> {
    ids.iter().map(|id| id.parse()).collect()
}

#[derive(uniffi::Object)]
pub struct GearLockerHandle {
    locker: Mutex<Locker<MemoryStorage>>,
}

impl GearLockerHandle {
    fn lock(&self) -> Result<MutexGuard<'_, Locker<MemoryStorage>>, GreerError> {
        self.locker.lock().map_err(|_| GreerError::Storage {
            message: "locker mutex poisoned".to_string(),
        })
    }
}

#[uniffi::export]
impl GearLockerHandle {
    #[uniffi::constructor]
    pub fn new(settings: SettingsRecord) -> Arc<Self> {
        Arc::new(Self {
            locker: Mutex::new(Locker::in_memory(settings.into())),
        })
    }

    /// Restore a locker from a [`GearLockerHandle::snapshot`] string.
    #[uniffi::constructor]
    pub fn from_snapshot(json: String, settings: SettingsRecord) -> Result<Arc<Self>, GreerError> {
        let storage = MemoryStorage::from_json(&json)?;
        Ok(Arc::new(Self {
            locker: Mutex::new(Locker::new(storage, settings.into())),
        }))
    }

    pub fn snapshot(&self) -> Result<String, GreerError> {
        self.lock()?.storage().to_json()
    }

    pub fn settings(&self) -> Result<SettingsRecord, GreerError> {
        Ok(SettingsRecord::from(self.lock()?.settings()))
    }

    pub fn update_settings(&self, settings: SettingsRecord) -> Result<(), GreerError> {
        self.lock()?.set_settings(settings.into());
        Ok(())
    }

    pub fn create_gear(&self, input: GearInput) -> Result<GearRecord, GreerError> {
        let gear = self.lock()?.create_gear(input.into())?;
        Ok(GearRecord::from(&gear))
    }

    pub fn update_gear(&self, id: String, input: GearInput) -> Result<GearRecord, GreerError> {
        let gear = self.lock()?.update_gear(&id.parse()?, input.into())?;
        Ok(GearRecord::from(&gear))
    }

    /// Returns how many pack line items went with the gear.
    pub fn delete_gear(&self, id: String) -> Result<u32, GreerError> {
        let removed = self.lock()?.delete_gear(&id.parse()?)?;
        Ok(u32::try_from(removed).unwrap_or(u32::MAX))
    }

    pub fn list_gear(&self) -> Result<Vec<GearRecord>, GreerError> {
        let gear = self.lock()?.list_gear(&GearQuery::default())?;
        Ok(gear.iter().map(GearRecord::from).collect())
    }

    pub fn search_gear(&self, text: String) -> Result<Vec<GearRecord>, GreerError> {
        let query = GearQuery {
            text: Some(text),
            ..GearQuery::default()
        };
        let gear = self.lock()?.list_gear(&query)?;
        Ok(gear.iter().map(GearRecord::from).collect())
    }

    pub fn add_sample_gear(&self) -> Result<Vec<GearRecord>, GreerError> {
        let gear = self.lock()?.add_sample_gear()?;
        Ok(gear.iter().map(GearRecord::from).collect())
    }

    pub fn create_pack(&self, name: String) -> Result<PackRecord, GreerError> {
        let pack = self.lock()?.create_pack(&name)?;
        Ok(PackRecord::from(&pack))
    }

    pub fn pack(&self, id: String) -> Result<PackRecord, GreerError> {
        let pack = self.lock()?.pack(&id.parse()?)?;
        Ok(PackRecord::from(&pack))
    }

    pub fn list_packs(&self) -> Result<Vec<PackRecord>, GreerError> {
        let packs = self.lock()?.list_packs()?;
        Ok(packs.iter().map(PackRecord::from).collect())
    }

    pub fn delete_pack(&self, id: String) -> Result<(), GreerError> {
        self.lock()?.delete_pack(&id.parse()?)?;
        Ok(())
    }

    pub fn rename_pack(&self, id: String, name: String) -> Result<(), GreerError> {
        self.lock()?.rename_pack(&id.parse()?, &name)
    }

    pub fn set_trip_dates(&self, id: String, start_unix: i64, end_unix: i64) -> Result<(), GreerError> {
        let (start, end) = (timestamp(start_unix)?, timestamp(end_unix)?);
        self.lock()?.set_trip_dates(&id.parse()?, start, end)
    }

    pub fn set_pack_unit(&self, id: String, unit: WeightUnit) -> Result<(), GreerError> {
        self.lock()?.set_pack_unit(&id.parse()?, unit)
    }

    pub fn available_gear(&self, pack_id: String) -> Result<Vec<GearRecord>, GreerError> {
        let gear = self.lock()?.available_gear(&pack_id.parse()?)?;
        Ok(gear.iter().map(GearRecord::from).collect())
    }

    /// Returns the new line item ids, in the order given.
    pub fn add_gear_to_pack(&self, pack_id: String, gear_ids_in: Vec<String>) -> Result<Vec<String>, GreerError> {
        let ids = gear_ids(&gear_ids_in)?;
        let added = self.lock()?.add_gear_to_pack(&pack_id.parse()?, &ids)?;
        Ok(added.iter().map(AssociationId::to_string).collect())
    }

    pub fn remove_from_pack(&self, pack_id: String, item_id: String) -> Result<(), GreerError> {
        let item: AssociationId = item_id.parse()?;
        self.lock()?.remove_from_pack(&pack_id.parse()?, &item)?;
        Ok(())
    }

    pub fn set_quantity(&self, pack_id: String, item_id: String, quantity: i64) -> Result<(), GreerError> {
        let quantity = GearAssociation::checked_quantity(quantity)?;
        let item: AssociationId = item_id.parse()?;
        self.lock()?.set_quantity(&pack_id.parse()?, &item, quantity)
    }

    pub fn toggle_starred(&self, pack_id: String, item_id: String) -> Result<bool, GreerError> {
        let item: AssociationId = item_id.parse()?;
        self.lock()?.toggle_starred(&pack_id.parse()?, &item)
    }

    pub fn pack_stats(&self, pack_id: String) -> Result<PackStatsRecord, GreerError> {
        let pack_id: PackId = pack_id.parse()?;
        let stats = self.lock()?.pack_stats(&pack_id)?;
        Ok(stats.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> Arc<GearLockerHandle> {
        GearLockerHandle::new(SettingsRecord::from(&Settings::default()))
    }

    fn input(weight: f64) -> GearInput {
        GearInput {
            brand: "Zpacks".to_string(),
            model: "Duplex".to_string(),
            color: "#808080".to_string(),
            weight,
            weight_unit: None,
            description: String::new(),
            url: String::new(),
            worn: false,
            consumable: false,
            gear_type: GearType::Tent,
        }
    }

    #[test]
    fn test_free_functions() {
        assert_eq!(convert_weight(16.0, WeightUnit::Ounces, WeightUnit::Pounds), 1.0);
        assert_eq!(unit_abbreviation(WeightUnit::Kilograms), "kg");
        assert_eq!(classify_weight(19.9, WeightUnit::Pounds), WeightClass::Light);
        assert_eq!(weight_class_label(WeightClass::Heavy), "Heavy");
        assert_eq!(gear_type_icon(GearType::Water), "waterbottle.fill");
        assert_eq!(gear_type_picker_order().len(), 15);
    }

    #[test]
    fn test_gear_round_trip_through_handle() {
        let handle = handle();
        let gear = handle.create_gear(input(19.0)).unwrap();
        assert_eq!(gear.weight_unit, WeightUnit::Ounces);
        assert_eq!(gear.icon, "tent.fill");

        let updated = handle.update_gear(gear.id.clone(), input(18.5)).unwrap();
        assert_eq!(updated.weight, 18.5);
        assert_eq!(handle.search_gear("duplex".to_string()).unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_bad_input() {
        let handle = handle();
        assert!(matches!(
            handle.create_gear(input(-3.0)),
            Err(GreerError::InvalidWeight { .. })
        ));
        assert!(matches!(
            handle.pack("not-an-id".to_string()),
            Err(GreerError::InvalidId { .. })
        ));

        let gear = handle.create_gear(input(19.0)).unwrap();
        let pack = handle.create_pack("Trip".to_string()).unwrap();
        let items = handle.add_gear_to_pack(pack.id.clone(), vec![gear.id]).unwrap();
        assert_eq!(
            handle.set_quantity(pack.id.clone(), items[0].clone(), -2),
            Err(GreerError::InvalidQuantity { quantity: -2 })
        );
        assert_eq!(
            handle.set_trip_dates(pack.id, 1_700_000_000, 1_600_000_000),
            Err(GreerError::InvalidTripDates)
        );
    }

    #[test]
    fn test_pack_flow_and_snapshot() {
        let handle = handle();
        let samples = handle.add_sample_gear().unwrap();
        let pack = handle.create_pack("Sierra".to_string()).unwrap();
        assert_eq!(pack.icon.len(), 3);
        assert!(pack.icon.iter().all(|swatch| swatch.len() == 3));
        let ids: Vec<String> = samples.iter().map(|g| g.id.clone()).collect();
        let items = handle.add_gear_to_pack(pack.id.clone(), ids).unwrap();
        assert_eq!(items.len(), 14);

        let before = handle.pack(pack.id.clone()).unwrap();
        assert_eq!(before.cached_weights, None);

        handle.set_pack_unit(pack.id.clone(), WeightUnit::Ounces).unwrap();
        let stats = handle.pack_stats(pack.id.clone()).unwrap();
        assert!((stats.total_weight - 182.5).abs() < 1e-9);
        assert!((stats.weights.consumable - 2.0).abs() < 1e-9);
        assert_eq!(stats.weight_class_label, "Light");
        assert!(handle.pack(pack.id.clone()).unwrap().cached_weights.is_some());

        assert_eq!(handle.delete_gear(samples[0].id.clone()).unwrap(), 1);

        let json = handle.snapshot().unwrap();
        let restored = GearLockerHandle::from_snapshot(json, handle.settings().unwrap()).unwrap();
        assert_eq!(restored.list_gear().unwrap().len(), 13);
        assert_eq!(restored.pack(pack.id.clone()).unwrap().items.len(), 13);
        assert_eq!(restored.pack(pack.id.clone()).unwrap().icon, pack.icon);
        assert!(matches!(
            GearLockerHandle::from_snapshot("[]".to_string(), handle.settings().unwrap()),
            Err(GreerError::Serialization { .. })
        ));
    }
}
