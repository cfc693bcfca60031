pub mod color;
pub mod error;
pub mod ffi;
pub mod locker;
pub mod metrics;
pub mod models;
pub mod samples;
pub mod settings;
pub mod storage;
pub mod units;

uniffi::setup_scaffolding!();

pub use error::GreerError;
pub use locker::Locker;
pub use metrics::{aggregate, total_weight, CategoryWeights, PackStats, WeightCategory, WeightClass};
pub use models::{
    AssociationId, Gear, GearAssociation, GearDraft, GearId, GearType, Pack, PackIcon, PackId,
    TypeColor,
};
pub use settings::Settings;
pub use storage::{GearQuery, MemoryStorage, Storage};
pub use units::{convert, WeightUnit};
