//! Access resolution service.
//!
//! Every authorization rule in the system lives here as a pure function over
//! a snapshot of facts fetched by the caller. Permission derives from a chain
//! of relations rather than a flat ACL: direct ownership, delegated farm
//! sharing grants, and indirect ownership through an animal's current lot.
//!
//! The functions never touch storage. Callers fetch the relevant facts inside
//! one transactional read view, ask for a decision, and act on it within the
//! same transaction.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::DomainError;

/// Requested operation on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Update,
    Delete,
}

/// Why an access request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// A referenced entity does not exist.
    NotFound,
    /// The entity exists but the caller lacks rights to it.
    Forbidden,
}

/// Outcome of an access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// Map the decision to a `Result`, naming the entity kind in the error.
    pub fn require(self, entity: &str) -> Result<(), DomainError> {
        match self {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Deny(DenyReason::NotFound) => {
                Err(DomainError::NotFound(entity.to_string()))
            }
            AccessDecision::Deny(DenyReason::Forbidden) => {
                Err(DomainError::Forbidden(entity.to_string()))
            }
        }
    }
}

/// A farm sharing grant reduced to what the resolver needs.
#[derive(Debug, Clone, Copy)]
pub struct GrantFact {
    pub farm_id: Uuid,
    pub expires_at: Option<DateTime<Utc>>,
}

impl GrantFact {
    fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires| expires > now)
    }
}

/// The set of farms a user may act within, resolved fresh per request.
///
/// Grants can expire, so the set must never be cached across requests; the
/// evaluation instant is fixed at construction.
#[derive(Debug, Clone)]
pub struct FarmAccess {
    user_id: Uuid,
    farm_ids: HashSet<Uuid>,
}

impl FarmAccess {
    /// Build the accessible farm set from owned farms and sharing grants.
    /// Expired grants never count.
    pub fn resolve(
        user_id: Uuid,
        owned_farm_ids: &[Uuid],
        grants: &[GrantFact],
        now: DateTime<Utc>,
    ) -> Self {
        let mut farm_ids: HashSet<Uuid> = owned_farm_ids.iter().copied().collect();
        farm_ids.extend(
            grants
                .iter()
                .filter(|grant| grant.is_active(now))
                .map(|grant| grant.farm_id),
        );
        Self { user_id, farm_ids }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn contains(&self, farm_id: Uuid) -> bool {
        self.farm_ids.contains(&farm_id)
    }

    pub fn farm_ids(&self) -> &HashSet<Uuid> {
        &self.farm_ids
    }
}

/// Authorization-relevant facts about one animal. `farm_id` is the farm of
/// the animal's current lot, absent when the animal is not placed in a lot.
#[derive(Debug, Clone, Copy)]
pub struct AnimalFacts {
    pub owner_user_id: Uuid,
    pub current_lot_id: Option<Uuid>,
    pub farm_id: Option<Uuid>,
}

/// Authorization-relevant facts about one lot.
#[derive(Debug, Clone, Copy)]
pub struct LotFacts {
    pub farm_id: Uuid,
}

/// Facts about a health event and the animals it affects.
#[derive(Debug, Clone)]
pub struct HealthEventFacts {
    pub administered_by_user_id: Uuid,
    pub affected_animals: Vec<AnimalFacts>,
}

/// Facts about a feeding.
#[derive(Debug, Clone, Copy)]
pub struct FeedingFacts {
    pub administered_by_user_id: Uuid,
}

/// Facts about a transaction.
#[derive(Debug, Clone, Copy)]
pub struct TransactionFacts {
    pub from_owner_user_id: Uuid,
    pub to_owner_user_id: Option<Uuid>,
}

/// Facts about a reproductive event: the dam it belongs to and the sire it
/// may reference.
#[derive(Debug, Clone, Copy)]
pub struct ReproductiveEventFacts {
    pub dam: AnimalFacts,
    pub sire: Option<AnimalFacts>,
}

/// Decide whether the user may perform `op` on an animal.
///
/// Read and update are satisfied by ownership or by access to the farm the
/// animal currently sits in. Delete requires strict ownership; shared farm
/// access never authorizes deletion. An animal with no current lot resolves
/// to no farm and is reachable only by its owner.
pub fn authorize_animal_access(
    access: &FarmAccess,
    animal: &AnimalFacts,
    op: Operation,
) -> AccessDecision {
    let is_owner = animal.owner_user_id == access.user_id();
    if is_owner {
        return AccessDecision::Allow;
    }
    if op == Operation::Delete {
        return AccessDecision::Deny(DenyReason::Forbidden);
    }
    match animal.farm_id {
        Some(farm_id) if access.contains(farm_id) => AccessDecision::Allow,
        _ => AccessDecision::Deny(DenyReason::Forbidden),
    }
}

/// Decide whether the user may place an animal into the target lot.
///
/// `lot` is the lookup result for the requested `current_lot_id`; a missing
/// lot denies with `NotFound`, a lot on an inaccessible farm with
/// `Forbidden`.
pub fn authorize_animal_assignment(
    access: &FarmAccess,
    lot: Option<&LotFacts>,
) -> AccessDecision {
    match lot {
        None => AccessDecision::Deny(DenyReason::NotFound),
        Some(lot) if access.contains(lot.farm_id) => AccessDecision::Allow,
        Some(_) => AccessDecision::Deny(DenyReason::Forbidden),
    }
}

/// Decide whether the user may reference the candidate animal as a parent.
///
/// Parent linkage is strict-ownership only; farm sharing does not extend to
/// pedigree edits.
pub fn authorize_parent_reference(
    user_id: Uuid,
    candidate_parent: Option<&AnimalFacts>,
) -> AccessDecision {
    match candidate_parent {
        None => AccessDecision::Deny(DenyReason::NotFound),
        Some(parent) if parent.owner_user_id == user_id => AccessDecision::Allow,
        Some(_) => AccessDecision::Deny(DenyReason::Forbidden),
    }
}

/// Decide whether the user may perform `op` on a group.
///
/// Groups are creator-scoped for every operation. No sharing mechanism
/// exists for groups and farm access must not be consulted here.
pub fn authorize_group_access(
    user_id: Uuid,
    created_by_user_id: Uuid,
    _op: Operation,
) -> AccessDecision {
    if created_by_user_id == user_id {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny(DenyReason::Forbidden)
    }
}

/// Decide whether the user may perform `op` on a health event.
///
/// The administrator always qualifies; otherwise any affected animal the
/// user can read qualifies.
pub fn authorize_health_event_access(
    access: &FarmAccess,
    event: &HealthEventFacts,
    _op: Operation,
) -> AccessDecision {
    if event.administered_by_user_id == access.user_id() {
        return AccessDecision::Allow;
    }
    let any_readable = event
        .affected_animals
        .iter()
        .any(|animal| authorize_animal_access(access, animal, Operation::Read).is_allowed());
    if any_readable {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny(DenyReason::Forbidden)
    }
}

/// Decide whether the user may perform `op` on a feeding.
///
/// Feedings are administrator-only for every operation, narrower than the
/// health event rule.
pub fn authorize_feeding_access(
    user_id: Uuid,
    feeding: &FeedingFacts,
    _op: Operation,
) -> AccessDecision {
    if feeding.administered_by_user_id == user_id {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny(DenyReason::Forbidden)
    }
}

/// Decide whether the user may perform `op` on a transaction.
///
/// Either party may read; only the "from" party may update or delete.
pub fn authorize_transaction_access(
    user_id: Uuid,
    tx: &TransactionFacts,
    op: Operation,
) -> AccessDecision {
    let is_from = tx.from_owner_user_id == user_id;
    let is_to = tx.to_owner_user_id == Some(user_id);
    match op {
        Operation::Read if is_from || is_to => AccessDecision::Allow,
        Operation::Update | Operation::Delete if is_from => AccessDecision::Allow,
        _ => AccessDecision::Deny(DenyReason::Forbidden),
    }
}

/// Decide whether the user may perform `op` on a reproductive event.
///
/// Reading either involved animal qualifies for every operation; the event
/// rides on the dam's and sire's accessibility rather than carrying an
/// administrator of its own.
pub fn authorize_reproductive_event_access(
    access: &FarmAccess,
    event: &ReproductiveEventFacts,
    _op: Operation,
) -> AccessDecision {
    if authorize_animal_access(access, &event.dam, Operation::Read).is_allowed() {
        return AccessDecision::Allow;
    }
    match event.sire {
        Some(sire) if authorize_animal_access(access, &sire, Operation::Read).is_allowed() => {
            AccessDecision::Allow
        }
        _ => AccessDecision::Deny(DenyReason::Forbidden),
    }
}

/// Decide whether the user may perform `op` on a weighing.
///
/// Weighings ride entirely on the animal: anyone who can read the animal may
/// record, see, and correct its weights.
pub fn authorize_weighing_access(
    access: &FarmAccess,
    animal: &AnimalFacts,
    _op: Operation,
) -> AccessDecision {
    authorize_animal_access(access, animal, Operation::Read)
}

/// Lookup result for an optional lot filter on an animal listing.
#[derive(Debug, Clone, Copy)]
pub enum LotLookup {
    Found(LotFacts),
    Missing,
}

/// The maximal visible animal set for a listing query, expressed as a
/// predicate the repository translates into its own filter clauses.
#[derive(Debug, Clone)]
pub struct AnimalScope {
    pub owner_user_id: Uuid,
    pub farm_ids: HashSet<Uuid>,
    pub lot_id: Option<Uuid>,
}

impl AnimalScope {
    /// Whether an animal with the given facts falls inside the scope.
    pub fn permits(&self, animal: &AnimalFacts) -> bool {
        if let Some(lot_id) = self.lot_id {
            if animal.current_lot_id != Some(lot_id) {
                return false;
            }
        }
        if animal.owner_user_id == self.owner_user_id {
            return true;
        }
        animal
            .farm_id
            .map_or(false, |farm_id| self.farm_ids.contains(&farm_id))
    }
}

/// Compute the visible animal scope for a listing, optionally narrowed by a
/// farm or lot filter.
///
/// A farm filter naming an inaccessible farm fails with `Forbidden` rather
/// than silently returning an empty scope. A lot filter naming a missing lot
/// fails with `NotFound`, and one on an inaccessible farm with `Forbidden`.
pub fn visible_animal_scope(
    access: &FarmAccess,
    farm_filter: Option<Uuid>,
    lot_filter: Option<(Uuid, LotLookup)>,
) -> Result<AnimalScope, DenyReason> {
    let mut farm_ids = access.farm_ids().clone();

    if let Some(farm_id) = farm_filter {
        if !access.contains(farm_id) {
            return Err(DenyReason::Forbidden);
        }
        farm_ids = HashSet::from([farm_id]);
    }

    let lot_id = match lot_filter {
        None => None,
        Some((_, LotLookup::Missing)) => return Err(DenyReason::NotFound),
        Some((lot_id, LotLookup::Found(lot))) => {
            if !access.contains(lot.farm_id) {
                return Err(DenyReason::Forbidden);
            }
            Some(lot_id)
        }
    };

    Ok(AnimalScope {
        owner_user_id: access.user_id(),
        farm_ids,
        lot_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn access_for(user_id: Uuid, owned: &[Uuid], grants: &[GrantFact]) -> FarmAccess {
        FarmAccess::resolve(user_id, owned, grants, Utc::now())
    }

    fn owned_animal(owner: Uuid) -> AnimalFacts {
        AnimalFacts {
            owner_user_id: owner,
            current_lot_id: None,
            farm_id: None,
        }
    }

    fn placed_animal(owner: Uuid, lot_id: Uuid, farm_id: Uuid) -> AnimalFacts {
        AnimalFacts {
            owner_user_id: owner,
            current_lot_id: Some(lot_id),
            farm_id: Some(farm_id),
        }
    }

    #[test]
    fn test_farm_access_owned_and_granted() {
        let user = Uuid::new_v4();
        let owned = Uuid::new_v4();
        let granted = Uuid::new_v4();
        let other = Uuid::new_v4();
        let access = access_for(
            user,
            &[owned],
            &[GrantFact {
                farm_id: granted,
                expires_at: None,
            }],
        );
        assert!(access.contains(owned));
        assert!(access.contains(granted));
        assert!(!access.contains(other));
    }

    #[test]
    fn test_farm_access_grant_expiry_matrix() {
        let user = Uuid::new_v4();
        let farm = Uuid::new_v4();
        let now = Utc::now();

        let expired = GrantFact {
            farm_id: farm,
            expires_at: Some(now - Duration::hours(1)),
        };
        let future = GrantFact {
            farm_id: farm,
            expires_at: Some(now + Duration::hours(1)),
        };
        let perpetual = GrantFact {
            farm_id: farm,
            expires_at: None,
        };

        assert!(!FarmAccess::resolve(user, &[], &[expired], now).contains(farm));
        assert!(FarmAccess::resolve(user, &[], &[future], now).contains(farm));
        assert!(FarmAccess::resolve(user, &[], &[perpetual], now).contains(farm));
    }

    #[test]
    fn test_owner_always_allowed() {
        let owner = Uuid::new_v4();
        let access = access_for(owner, &[], &[]);
        let animal = placed_animal(owner, Uuid::new_v4(), Uuid::new_v4());
        for op in [Operation::Read, Operation::Update, Operation::Delete] {
            assert_eq!(
                authorize_animal_access(&access, &animal, op),
                AccessDecision::Allow
            );
        }
    }

    #[test]
    fn test_shared_farm_allows_read_and_update_only() {
        let owner = Uuid::new_v4();
        let viewer = Uuid::new_v4();
        let farm = Uuid::new_v4();
        let access = access_for(
            viewer,
            &[],
            &[GrantFact {
                farm_id: farm,
                expires_at: None,
            }],
        );
        let animal = placed_animal(owner, Uuid::new_v4(), farm);

        assert_eq!(
            authorize_animal_access(&access, &animal, Operation::Read),
            AccessDecision::Allow
        );
        assert_eq!(
            authorize_animal_access(&access, &animal, Operation::Update),
            AccessDecision::Allow
        );
        assert_eq!(
            authorize_animal_access(&access, &animal, Operation::Delete),
            AccessDecision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn test_animal_without_lot_is_owner_only() {
        let owner = Uuid::new_v4();
        let viewer = Uuid::new_v4();
        let farm = Uuid::new_v4();
        // Viewer can reach every farm that exists; it does not matter.
        let access = access_for(viewer, &[farm], &[]);
        let animal = owned_animal(owner);

        assert_eq!(
            authorize_animal_access(&access, &animal, Operation::Read),
            AccessDecision::Deny(DenyReason::Forbidden)
        );

        let owner_access = access_for(owner, &[], &[]);
        assert_eq!(
            authorize_animal_access(&owner_access, &animal, Operation::Read),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_delete_stricter_than_read() {
        // Any pair denied read is also denied delete.
        let owner = Uuid::new_v4();
        let user = Uuid::new_v4();
        let farm = Uuid::new_v4();
        let shared = access_for(
            user,
            &[],
            &[GrantFact {
                farm_id: farm,
                expires_at: None,
            }],
        );
        let stranger = access_for(user, &[], &[]);
        let animal = placed_animal(owner, Uuid::new_v4(), farm);

        for access in [&shared, &stranger] {
            let read = authorize_animal_access(access, &animal, Operation::Read);
            let delete = authorize_animal_access(access, &animal, Operation::Delete);
            if !read.is_allowed() {
                assert!(!delete.is_allowed());
            }
        }
        // The converse does not hold: shared access reads but cannot delete.
        assert!(authorize_animal_access(&shared, &animal, Operation::Read).is_allowed());
        assert!(!authorize_animal_access(&shared, &animal, Operation::Delete).is_allowed());
    }

    #[test]
    fn test_grant_toggles_animal_read() {
        // User U1 owns farm F1 with animal A1; U2 starts with no grant.
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        let f1 = Uuid::new_v4();
        let l1 = Uuid::new_v4();
        let a1 = placed_animal(u1, l1, f1);

        let before = access_for(u2, &[], &[]);
        assert_eq!(
            authorize_animal_access(&before, &a1, Operation::Read),
            AccessDecision::Deny(DenyReason::Forbidden)
        );

        let after = access_for(
            u2,
            &[],
            &[GrantFact {
                farm_id: f1,
                expires_at: None,
            }],
        );
        assert_eq!(
            authorize_animal_access(&after, &a1, Operation::Read),
            AccessDecision::Allow
        );
        // Delete stays owner-only even with the grant.
        assert_eq!(
            authorize_animal_access(&after, &a1, Operation::Delete),
            AccessDecision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn test_assignment_requires_accessible_lot() {
        let user = Uuid::new_v4();
        let farm = Uuid::new_v4();
        let other_farm = Uuid::new_v4();
        let access = access_for(user, &[farm], &[]);

        assert_eq!(
            authorize_animal_assignment(&access, Some(&LotFacts { farm_id: farm })),
            AccessDecision::Allow
        );
        assert_eq!(
            authorize_animal_assignment(&access, Some(&LotFacts { farm_id: other_farm })),
            AccessDecision::Deny(DenyReason::Forbidden)
        );
        assert_eq!(
            authorize_animal_assignment(&access, None),
            AccessDecision::Deny(DenyReason::NotFound)
        );
    }

    #[test]
    fn test_parent_reference_is_strict_ownership() {
        let user = Uuid::new_v4();
        let farm = Uuid::new_v4();
        let mine = owned_animal(user);
        let theirs = placed_animal(Uuid::new_v4(), Uuid::new_v4(), farm);

        assert_eq!(
            authorize_parent_reference(user, Some(&mine)),
            AccessDecision::Allow
        );
        // Shared farm access does not extend to parent linkage.
        assert_eq!(
            authorize_parent_reference(user, Some(&theirs)),
            AccessDecision::Deny(DenyReason::Forbidden)
        );
        assert_eq!(
            authorize_parent_reference(user, None),
            AccessDecision::Deny(DenyReason::NotFound)
        );
    }

    #[test]
    fn test_group_access_creator_only() {
        let creator = Uuid::new_v4();
        let other = Uuid::new_v4();
        for op in [Operation::Read, Operation::Update, Operation::Delete] {
            assert_eq!(
                authorize_group_access(creator, creator, op),
                AccessDecision::Allow
            );
            assert_eq!(
                authorize_group_access(other, creator, op),
                AccessDecision::Deny(DenyReason::Forbidden)
            );
        }
    }

    #[test]
    fn test_health_event_administrator_path() {
        let admin = Uuid::new_v4();
        let access = access_for(admin, &[], &[]);
        let event = HealthEventFacts {
            administered_by_user_id: admin,
            affected_animals: vec![owned_animal(Uuid::new_v4())],
        };
        assert_eq!(
            authorize_health_event_access(&access, &event, Operation::Read),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_health_event_animal_access_path() {
        // Event administered by U3 affecting U1's animal is readable by U1.
        let u1 = Uuid::new_v4();
        let u3 = Uuid::new_v4();
        let a1 = placed_animal(u1, Uuid::new_v4(), Uuid::new_v4());
        let event = HealthEventFacts {
            administered_by_user_id: u3,
            affected_animals: vec![a1],
        };
        let access = access_for(u1, &[], &[]);
        assert_eq!(
            authorize_health_event_access(&access, &event, Operation::Read),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_health_event_denied_without_any_path() {
        let stranger = Uuid::new_v4();
        let access = access_for(stranger, &[], &[]);
        let event = HealthEventFacts {
            administered_by_user_id: Uuid::new_v4(),
            affected_animals: vec![placed_animal(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())],
        };
        assert_eq!(
            authorize_health_event_access(&access, &event, Operation::Read),
            AccessDecision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn test_feeding_administrator_only() {
        let admin = Uuid::new_v4();
        let other = Uuid::new_v4();
        let feeding = FeedingFacts {
            administered_by_user_id: admin,
        };
        for op in [Operation::Read, Operation::Update, Operation::Delete] {
            assert_eq!(
                authorize_feeding_access(admin, &feeding, op),
                AccessDecision::Allow
            );
            assert_eq!(
                authorize_feeding_access(other, &feeding, op),
                AccessDecision::Deny(DenyReason::Forbidden)
            );
        }
    }

    #[test]
    fn test_transaction_read_both_parties_mutate_from_only() {
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let tx = TransactionFacts {
            from_owner_user_id: u1,
            to_owner_user_id: Some(u2),
        };

        assert!(authorize_transaction_access(u1, &tx, Operation::Read).is_allowed());
        assert!(authorize_transaction_access(u2, &tx, Operation::Read).is_allowed());
        assert!(!authorize_transaction_access(stranger, &tx, Operation::Read).is_allowed());

        assert_eq!(
            authorize_transaction_access(u1, &tx, Operation::Update),
            AccessDecision::Allow
        );
        assert_eq!(
            authorize_transaction_access(u2, &tx, Operation::Update),
            AccessDecision::Deny(DenyReason::Forbidden)
        );
        assert_eq!(
            authorize_transaction_access(u2, &tx, Operation::Delete),
            AccessDecision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn test_transaction_without_receiver() {
        let from = Uuid::new_v4();
        let tx = TransactionFacts {
            from_owner_user_id: from,
            to_owner_user_id: None,
        };
        assert!(authorize_transaction_access(from, &tx, Operation::Read).is_allowed());
        assert!(!authorize_transaction_access(Uuid::new_v4(), &tx, Operation::Read).is_allowed());
    }

    #[test]
    fn test_reproductive_event_reachable_through_either_animal() {
        let dam_owner = Uuid::new_v4();
        let sire_owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let event = ReproductiveEventFacts {
            dam: owned_animal(dam_owner),
            sire: Some(owned_animal(sire_owner)),
        };

        for op in [Operation::Read, Operation::Update, Operation::Delete] {
            assert_eq!(
                authorize_reproductive_event_access(&access_for(dam_owner, &[], &[]), &event, op),
                AccessDecision::Allow
            );
            assert_eq!(
                authorize_reproductive_event_access(&access_for(sire_owner, &[], &[]), &event, op),
                AccessDecision::Allow
            );
            assert_eq!(
                authorize_reproductive_event_access(&access_for(stranger, &[], &[]), &event, op),
                AccessDecision::Deny(DenyReason::Forbidden)
            );
        }
    }

    #[test]
    fn test_reproductive_event_sire_farm_access_qualifies() {
        // Viewer reaches the sire's farm through a grant; the dam is foreign.
        let viewer = Uuid::new_v4();
        let farm = Uuid::new_v4();
        let access = access_for(
            viewer,
            &[],
            &[GrantFact {
                farm_id: farm,
                expires_at: None,
            }],
        );
        let event = ReproductiveEventFacts {
            dam: owned_animal(Uuid::new_v4()),
            sire: Some(placed_animal(Uuid::new_v4(), Uuid::new_v4(), farm)),
        };
        assert_eq!(
            authorize_reproductive_event_access(&access, &event, Operation::Read),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_weighing_follows_animal_readability() {
        let owner = Uuid::new_v4();
        let viewer = Uuid::new_v4();
        let farm = Uuid::new_v4();
        let animal = placed_animal(owner, Uuid::new_v4(), farm);

        let shared = access_for(
            viewer,
            &[],
            &[GrantFact {
                farm_id: farm,
                expires_at: None,
            }],
        );
        let stranger = access_for(Uuid::new_v4(), &[], &[]);

        for op in [Operation::Read, Operation::Update, Operation::Delete] {
            assert_eq!(
                authorize_weighing_access(&shared, &animal, op),
                AccessDecision::Allow
            );
            assert_eq!(
                authorize_weighing_access(&stranger, &animal, op),
                AccessDecision::Deny(DenyReason::Forbidden)
            );
        }
    }

    #[test]
    fn test_visible_scope_unfiltered() {
        let user = Uuid::new_v4();
        let farm = Uuid::new_v4();
        let access = access_for(user, &[farm], &[]);
        let scope = visible_animal_scope(&access, None, None).unwrap();

        assert!(scope.permits(&owned_animal(user)));
        assert!(scope.permits(&placed_animal(Uuid::new_v4(), Uuid::new_v4(), farm)));
        assert!(!scope.permits(&placed_animal(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())));
        assert!(!scope.permits(&owned_animal(Uuid::new_v4())));
    }

    #[test]
    fn test_visible_scope_inaccessible_farm_filter_is_forbidden() {
        let user = Uuid::new_v4();
        let access = access_for(user, &[Uuid::new_v4()], &[]);
        let result = visible_animal_scope(&access, Some(Uuid::new_v4()), None);
        assert_eq!(result.unwrap_err(), DenyReason::Forbidden);
    }

    #[test]
    fn test_visible_scope_farm_filter_narrows() {
        let user = Uuid::new_v4();
        let f1 = Uuid::new_v4();
        let f2 = Uuid::new_v4();
        let access = access_for(user, &[f1, f2], &[]);
        let scope = visible_animal_scope(&access, Some(f1), None).unwrap();

        assert!(scope.permits(&placed_animal(Uuid::new_v4(), Uuid::new_v4(), f1)));
        assert!(!scope.permits(&placed_animal(Uuid::new_v4(), Uuid::new_v4(), f2)));
        // Ownership still reaches outside the farm filter.
        assert!(scope.permits(&owned_animal(user)));
    }

    #[test]
    fn test_visible_scope_lot_filter() {
        let user = Uuid::new_v4();
        let farm = Uuid::new_v4();
        let lot = Uuid::new_v4();
        let access = access_for(user, &[farm], &[]);

        let scope = visible_animal_scope(
            &access,
            None,
            Some((lot, LotLookup::Found(LotFacts { farm_id: farm }))),
        )
        .unwrap();
        assert!(scope.permits(&placed_animal(Uuid::new_v4(), lot, farm)));
        assert!(!scope.permits(&placed_animal(Uuid::new_v4(), Uuid::new_v4(), farm)));

        let missing = visible_animal_scope(&access, None, Some((lot, LotLookup::Missing)));
        assert_eq!(missing.unwrap_err(), DenyReason::NotFound);

        let foreign = visible_animal_scope(
            &access,
            None,
            Some((
                lot,
                LotLookup::Found(LotFacts {
                    farm_id: Uuid::new_v4(),
                }),
            )),
        );
        assert_eq!(foreign.unwrap_err(), DenyReason::Forbidden);
    }

    #[test]
    fn test_require_maps_to_domain_errors() {
        assert!(AccessDecision::Allow.require("animal").is_ok());
        assert!(matches!(
            AccessDecision::Deny(DenyReason::NotFound).require("animal"),
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            AccessDecision::Deny(DenyReason::Forbidden).require("animal"),
            Err(DomainError::Forbidden(_))
        ));
    }
}
