use serde::{Deserialize, Serialize};

use crate::error::GreerError;
use crate::models::{Gear, GearId, GearType, Pack, PackId};

#[derive(Clone, Debug, Default)]
pub struct GearQuery {
    pub gear_type: Option<GearType>,
    pub worn: Option<bool>,
    pub consumable: Option<bool>,
    /// Case-insensitive match against brand, model and description.
    pub text: Option<String>,
}

impl GearQuery {
    pub fn matches(&self, gear: &Gear) -> bool {
        if self.gear_type.is_some_and(|t| t != gear.gear_type) {
            return false;
        }
        if self.worn.is_some_and(|w| w != gear.worn) {
            return false;
        }
        if self.consumable.is_some_and(|c| c != gear.consumable) {
            return false;
        }
        match self.text.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(text) => {
                let needle = text.to_lowercase();
                [&gear.brand, &gear.model, &gear.description]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Persistence seam for gear and packs.
///
/// Implementations store rows verbatim and never cascade; dependent rows are
/// removed explicitly by [`crate::locker::Locker`].
pub trait Storage {
    fn upsert_gear(&mut self, gear: Gear) -> Result<(), GreerError>;
    fn load_gear(&self, id: &GearId) -> Result<Option<Gear>, GreerError>;
    fn list_gear(&self, query: &GearQuery) -> Result<Vec<Gear>, GreerError>;
    fn delete_gear(&mut self, id: &GearId) -> Result<Option<Gear>, GreerError>;

    fn upsert_pack(&mut self, pack: Pack) -> Result<(), GreerError>;
    fn load_pack(&self, id: &PackId) -> Result<Option<Pack>, GreerError>;
    fn list_packs(&self) -> Result<Vec<Pack>, GreerError>;
    fn delete_pack(&mut self, id: &PackId) -> Result<Option<Pack>, GreerError>;
}

/// Insertion-ordered in-memory tables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStorage {
    gear: Vec<Gear>,
    packs: Vec<Pack>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, GreerError> {
        let storage: Self = serde_json::from_str(json)?;
        tracing::debug!(
            gear = storage.gear.len(),
            packs = storage.packs.len(),
            "loaded storage snapshot"
        );
        Ok(storage)
    }

    pub fn to_json(&self) -> Result<String, GreerError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Borrow a gear row without cloning.
    pub fn gear_ref(&self, id: &GearId) -> Option<&Gear> {
        self.gear.iter().find(|g| g.id == *id)
    }
}

impl Storage for MemoryStorage {
    fn upsert_gear(&mut self, gear: Gear) -> Result<(), GreerError> {
        match self.gear.iter_mut().find(|g| g.id == gear.id) {
            Some(existing) => *existing = gear,
            None => self.gear.push(gear),
        }
        Ok(())
    }

    fn load_gear(&self, id: &GearId) -> Result<Option<Gear>, GreerError> {
        Ok(self.gear_ref(id).cloned())
    }

    fn list_gear(&self, query: &GearQuery) -> Result<Vec<Gear>, GreerError> {
        Ok(self
            .gear
            .iter()
            .filter(|g| query.matches(g))
            .cloned()
            .collect())
    }

    fn delete_gear(&mut self, id: &GearId) -> Result<Option<Gear>, GreerError> {
        Ok(self
            .gear
            .iter()
            .position(|g| g.id == *id)
            .map(|index| self.gear.remove(index)))
    }

    fn upsert_pack(&mut self, pack: Pack) -> Result<(), GreerError> {
        match self.packs.iter_mut().find(|p| p.id == pack.id) {
            Some(existing) => *existing = pack,
            None => self.packs.push(pack),
        }
        Ok(())
    }

    fn load_pack(&self, id: &PackId) -> Result<Option<Pack>, GreerError> {
        Ok(self.packs.iter().find(|p| p.id == *id).cloned())
    }

    fn list_packs(&self) -> Result<Vec<Pack>, GreerError> {
        Ok(self.packs.clone())
    }

    fn delete_pack(&mut self, id: &PackId) -> Result<Option<Pack>, GreerError> {
        Ok(self
            .packs
            .iter()
            .position(|p| p.id == *id)
            .map(|index| self.packs.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GearDraft;
    use crate::settings::Settings;
    use crate::units::WeightUnit;
    use chrono::Utc;

    fn gear(brand: &str, model: &str, gear_type: GearType, worn: bool) -> Gear {
        Gear::new(
            GearDraft {
                brand: brand.to_string(),
                model: model.to_string(),
                weight: 3.0,
                weight_unit: Some(WeightUnit::Ounces),
                worn,
                gear_type,
                ..GearDraft::default()
            },
            &Settings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut storage = MemoryStorage::new();
        let a = gear("MSR", "PocketRocket 2", GearType::Cooking, false);
        let b = gear("Petzl", "Grigri+", GearType::Climbing, false);
        storage.upsert_gear(a.clone()).unwrap();
        storage.upsert_gear(b.clone()).unwrap();

        let mut edited = a.clone();
        edited.weight = 2.6;
        storage.upsert_gear(edited).unwrap();

        let all = storage.list_gear(&GearQuery::default()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, a.id);
        assert_eq!(all[0].weight, 2.6);
    }

    #[test]
    fn test_gear_query() {
        let mut storage = MemoryStorage::new();
        storage.upsert_gear(gear("Salomon", "X Ultra 3 GTX", GearType::Footwear, true)).unwrap();
        storage.upsert_gear(gear("Leatherman", "Wave+", GearType::Tools, false)).unwrap();
        storage.upsert_gear(gear("Patagonia", "R1 Pullover", GearType::Clothing, true)).unwrap();

        let worn = GearQuery {
            worn: Some(true),
            ..GearQuery::default()
        };
        assert_eq!(storage.list_gear(&worn).unwrap().len(), 2);

        let text = GearQuery {
            text: Some("wave".to_string()),
            ..GearQuery::default()
        };
        let found = storage.list_gear(&text).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].brand, "Leatherman");

        let typed = GearQuery {
            gear_type: Some(GearType::Clothing),
            worn: Some(false),
            ..GearQuery::default()
        };
        assert!(storage.list_gear(&typed).unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_is_none() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.delete_gear(&GearId::new()).unwrap(), None);
        assert_eq!(storage.delete_pack(&PackId::new()).unwrap(), None);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut storage = MemoryStorage::new();
        let tent = gear("Nemo", "Hornet 2P", GearType::Tent, false);
        let mut pack = Pack::new("Sierra High Route", &Settings::default(), Utc::now());
        pack.add_gear(tent.id).unwrap();
        storage.upsert_gear(tent).unwrap();
        storage.upsert_pack(pack).unwrap();

        let restored = MemoryStorage::from_json(&storage.to_json().unwrap()).unwrap();
        assert_eq!(restored, storage);
    }

    #[test]
    fn test_snapshot_rejects_garbage() {
        assert!(matches!(
            MemoryStorage::from_json("{\"gear\": 3}"),
            Err(GreerError::Serialization { .. })
        ));
    }
}
