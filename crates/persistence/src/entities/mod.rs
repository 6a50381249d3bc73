//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod animal;
pub mod farm;
pub mod feeding;
pub mod grupo;
pub mod health_event;
pub mod lot;
pub mod master_data;
pub mod reproductive_event;
pub mod transaction;
pub mod user;
pub mod weighing;

pub use animal::{
    AnimalEntity, AnimalFactsEntity, AnimalOriginDb, AnimalStatusDb, LocationHistoryEntity,
    ParentRefEntity, SexDb,
};
pub use farm::{FarmAccessGrantEntity, FarmEntity, GrantFactEntity};
pub use feeding::FeedingEntity;
pub use grupo::{GroupMembershipEntity, GrupoEntity};
pub use health_event::{HealthEventEntity, HealthEventTypeDb};
pub use lot::LotEntity;
pub use master_data::MasterDataEntity;
pub use reproductive_event::{
    GestationDiagnosisResultDb, ReproductiveEventEntity, ReproductiveEventTypeDb,
};
pub use transaction::{TransactionEntity, TransactionTypeDb};
pub use user::UserEntity;
pub use weighing::WeighingEntity;
