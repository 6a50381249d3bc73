//! Repository implementations.

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

pub use animal::AnimalRepository;
pub use farm::FarmRepository;
pub use feeding::FeedingRepository;
pub use grupo::GrupoRepository;
pub use health_event::HealthEventRepository;
pub use lot::LotRepository;
pub use master_data::MasterDataRepository;
pub use reproductive_event::ReproductiveEventRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;
pub use weighing::WeighingRepository;
