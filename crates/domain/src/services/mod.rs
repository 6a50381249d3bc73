pub mod access;
pub mod consistency;

pub use access::{
    authorize_animal_access, authorize_animal_assignment, authorize_feeding_access,
    authorize_group_access, authorize_health_event_access, authorize_parent_reference,
    authorize_reproductive_event_access, authorize_transaction_access, authorize_weighing_access,
    visible_animal_scope, AccessDecision, AnimalFacts, AnimalScope, DenyReason, FarmAccess,
    FeedingFacts, GrantFact, HealthEventFacts, LotFacts, LotLookup, Operation,
    ReproductiveEventFacts, TransactionFacts,
};
pub use consistency::{
    validate_group_membership, validate_location_history, validate_parent_assignment,
    ActiveMembership, LocationRow, PedigreeIndex,
};
