//! Gear locker service: gear and pack operations over a [`Storage`].
//!
//! The locker owns the relationships storage does not know about. Deleting
//! gear first strips every pack line item that references it, then deletes
//! the gear row; a failed write rolls the packs back. Editing gear invalidates the cached weights of every pack
//! that carries it.

use chrono::{DateTime, Utc};

use crate::error::GreerError;
use crate::metrics::PackStats;
use crate::models::{AssociationId, Gear, GearAssociation, GearDraft, GearId, Pack, PackId};
use crate::samples::sample_gear;
use crate::settings::Settings;
use crate::storage::{GearQuery, MemoryStorage, Storage};
use crate::units::WeightUnit;

pub struct Locker<S: Storage = MemoryStorage> {
    storage: S,
    settings: Settings,
}

impl Locker<MemoryStorage> {
    pub fn in_memory(settings: Settings) -> Self {
        Self::new(MemoryStorage::new(), settings)
    }
}

impl<S: Storage> Locker<S> {
    pub fn new(storage: S, settings: Settings) -> Self {
        Self { storage, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the defaults used for gear and packs created from now on.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // -- gear ---------------------------------------------------------------

    pub fn create_gear(&mut self, draft: GearDraft) -> Result<Gear, GreerError> {
        let gear = Gear::new(draft, &self.settings)?;
        tracing::debug!(gear = %gear.id, name = %gear.display_name(), "creating gear");
        self.storage.upsert_gear(gear.clone())?;
        Ok(gear)
    }

    pub fn gear(&self, id: &GearId) -> Result<Gear, GreerError> {
        self.storage
            .load_gear(id)?
            .ok_or_else(|| GreerError::GearNotFound { id: id.to_string() })
    }

    pub fn list_gear(&self, query: &GearQuery) -> Result<Vec<Gear>, GreerError> {
        self.storage.list_gear(query)
    }

    pub fn update_gear(&mut self, id: &GearId, draft: GearDraft) -> Result<Gear, GreerError> {
        let mut gear = self.gear(id)?;
        gear.apply(draft)?;
        self.storage.upsert_gear(gear.clone())?;

        for mut pack in self.packs_with_gear(id)? {
            pack.invalidate();
            self.storage.upsert_pack(pack)?;
        }
        tracing::debug!(gear = %id, "updated gear");
        Ok(gear)
    }

    /// Delete gear and every pack line item that references it.
    ///
    /// Every affected pack is loaded and stripped before anything is written.
    /// The stripped packs are written next and the gear row is deleted last.
    /// If a write fails, packs already written are put back and the gear is
    /// left in place.
    ///
    /// Returns the number of line items removed.
    pub fn delete_gear(&mut self, id: &GearId) -> Result<usize, GreerError> {
        self.gear(id)?;

        let originals = self.packs_with_gear(id)?;
        let mut removed = 0;
        let stripped: Vec<Pack> = originals
            .iter()
            .cloned()
            .map(|mut pack| {
                removed += pack.remove_gear(id);
                pack
            })
            .collect();

        for (written, pack) in stripped.into_iter().enumerate() {
            if let Err(err) = self.storage.upsert_pack(pack) {
                self.restore_packs(&originals[..written]);
                return Err(err);
            }
        }
        if let Err(err) = self.storage.delete_gear(id) {
            self.restore_packs(&originals);
            return Err(err);
        }

        tracing::info!(gear = %id, line_items = removed, "deleted gear");
        Ok(removed)
    }

    fn restore_packs(&mut self, packs: &[Pack]) {
        for pack in packs {
            if let Err(err) = self.storage.upsert_pack(pack.clone()) {
                tracing::error!(pack = %pack.id, error = %err, "failed to restore pack");
            }
        }
    }

    /// Seed the locker with the sample gear.
    pub fn add_sample_gear(&mut self) -> Result<Vec<Gear>, GreerError> {
        let gear = sample_gear()
            .into_iter()
            .map(|draft| self.create_gear(draft))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(count = gear.len(), "added sample gear");
        Ok(gear)
    }

    fn packs_with_gear(&self, id: &GearId) -> Result<Vec<Pack>, GreerError> {
        Ok(self
            .storage
            .list_packs()?
            .into_iter()
            .filter(|p| p.contains_gear(id))
            .collect())
    }

    // -- packs --------------------------------------------------------------

    pub fn create_pack(&mut self, name: &str) -> Result<Pack, GreerError> {
        self.create_pack_at(name, Utc::now())
    }

    pub fn create_pack_at(
        &mut self,
        name: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Pack, GreerError> {
        let pack = Pack::new(name, &self.settings, created_at);
        tracing::debug!(pack = %pack.id, name, "creating pack");
        self.storage.upsert_pack(pack.clone())?;
        Ok(pack)
    }

    pub fn pack(&self, id: &PackId) -> Result<Pack, GreerError> {
        self.storage
            .load_pack(id)?
            .ok_or_else(|| GreerError::PackNotFound { id: id.to_string() })
    }

    pub fn list_packs(&self) -> Result<Vec<Pack>, GreerError> {
        self.storage.list_packs()
    }

    /// Delete a pack and its line items. Referenced gear stays in the locker.
    pub fn delete_pack(&mut self, id: &PackId) -> Result<Pack, GreerError> {
        let pack = self
            .storage
            .delete_pack(id)?
            .ok_or_else(|| GreerError::PackNotFound { id: id.to_string() })?;
        tracing::info!(pack = %id, line_items = pack.associations().len(), "deleted pack");
        Ok(pack)
    }

    fn modify_pack<T>(
        &mut self,
        id: &PackId,
        f: impl FnOnce(&mut Pack) -> Result<T, GreerError>,
    ) -> Result<T, GreerError> {
        let mut pack = self.pack(id)?;
        let out = f(&mut pack)?;
        self.storage.upsert_pack(pack)?;
        Ok(out)
    }

    pub fn rename_pack(&mut self, id: &PackId, name: &str) -> Result<(), GreerError> {
        self.modify_pack(id, |pack| {
            pack.name = name.to_string();
            Ok(())
        })
    }

    pub fn set_trip_dates(
        &mut self,
        id: &PackId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), GreerError> {
        self.modify_pack(id, |pack| pack.set_trip_dates(start, end))
    }

    pub fn set_pack_unit(&mut self, id: &PackId, unit: WeightUnit) -> Result<(), GreerError> {
        self.modify_pack(id, |pack| {
            pack.set_weight_unit(unit);
            Ok(())
        })
    }

    // -- pack contents ------------------------------------------------------

    /// Gear that can still be added to the pack.
    pub fn available_gear(&self, id: &PackId) -> Result<Vec<Gear>, GreerError> {
        let pack = self.pack(id)?;
        Ok(self
            .storage
            .list_gear(&GearQuery::default())?
            .into_iter()
            .filter(|g| !pack.contains_gear(&g.id))
            .collect())
    }

    /// Add each gear to the pack with quantity 1. Fails without changes if any
    /// id is unknown or already packed.
    pub fn add_gear_to_pack(
        &mut self,
        id: &PackId,
        gear_ids: &[GearId],
    ) -> Result<Vec<AssociationId>, GreerError> {
        for gear_id in gear_ids {
            self.gear(gear_id)?;
        }
        let added = self.modify_pack(id, |pack| {
            gear_ids
                .iter()
                .map(|gear_id| pack.add_gear(*gear_id))
                .collect::<Result<Vec<_>, _>>()
        })?;
        tracing::debug!(pack = %id, count = added.len(), "added gear to pack");
        Ok(added)
    }

    pub fn remove_from_pack(
        &mut self,
        id: &PackId,
        item: &AssociationId,
    ) -> Result<GearAssociation, GreerError> {
        self.modify_pack(id, |pack| pack.remove_association(item))
    }

    pub fn set_quantity(
        &mut self,
        id: &PackId,
        item: &AssociationId,
        quantity: u32,
    ) -> Result<(), GreerError> {
        self.modify_pack(id, |pack| pack.set_quantity(item, quantity))
    }

    pub fn toggle_starred(&mut self, id: &PackId, item: &AssociationId) -> Result<bool, GreerError> {
        self.modify_pack(id, |pack| pack.toggle_starred(item))
    }

    /// Weight statistics for a pack, recomputing its cached breakdown if stale.
    pub fn pack_stats(&mut self, id: &PackId) -> Result<PackStats, GreerError> {
        let mut pack = self.pack(id)?;
        let gear = self.storage.list_gear(&GearQuery::default())?;
        let lookup = |gear_id: &GearId| gear.iter().find(|g| g.id == *gear_id);

        let weights = match pack.cached_weights() {
            Some(weights) => weights,
            None => {
                let weights = pack.recompute(lookup);
                tracing::debug!(pack = %id, revision = pack.revision(), "recomputed pack weights");
                weights
            }
        };
        let stats = PackStats::with_weights(&pack.items(lookup), pack.weight_unit(), weights);
        self.storage.upsert_pack(pack)?;
        Ok(stats)
    }
}
