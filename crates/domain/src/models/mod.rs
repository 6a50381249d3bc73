//! Domain models for the farm access graph.

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

pub use animal::{Animal, AnimalOrigin, AnimalStatus, LocationHistoryEntry, Sex};
pub use farm::{Farm, FarmAccessGrant};
pub use feeding::Feeding;
pub use grupo::{GroupMembership, Grupo};
pub use health_event::{HealthEvent, HealthEventType};
pub use lot::Lot;
pub use master_data::MasterData;
pub use reproductive_event::{GestationDiagnosisResult, ReproductiveEvent, ReproductiveEventType};
pub use transaction::{Transaction, TransactionType};
pub use user::User;
pub use weighing::Weighing;
