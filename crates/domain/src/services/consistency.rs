//! Structural invariants on the entity relationship graph.
//!
//! These checks are independent of who is asking: self-referencing pedigree
//! links, temporal group membership, and farm location history each carry
//! invariants that must hold regardless of access rights. All functions are
//! pure; the caller fetches the relevant rows and passes them in.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::error::RelationViolation;

/// Parent references for a set of animals, keyed by id.
///
/// Ancestor walks run by id lookup in this arena rather than by following
/// live references, with a visited set bounding the walk, so the check
/// terminates even on corrupted data containing a cycle.
#[derive(Debug, Clone, Default)]
pub struct PedigreeIndex {
    parents: HashMap<Uuid, (Option<Uuid>, Option<Uuid>)>,
}

impl PedigreeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, animal_id: Uuid, mother_id: Option<Uuid>, father_id: Option<Uuid>) {
        self.parents.insert(animal_id, (mother_id, father_id));
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Whether `target` appears anywhere in the ancestor chain of `start`,
    /// including `start` itself.
    fn chain_contains(&self, start: Uuid, target: Uuid) -> bool {
        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some((mother, father)) = self.parents.get(&current) {
                stack.extend(mother.iter().copied());
                stack.extend(father.iter().copied());
            }
        }
        false
    }
}

/// Validate a proposed mother/father assignment for an animal.
///
/// Rejects self-parentage and any assignment that would make the animal its
/// own ancestor at any depth.
pub fn validate_parent_assignment(
    index: &PedigreeIndex,
    animal_id: Uuid,
    proposed_mother_id: Option<Uuid>,
    proposed_father_id: Option<Uuid>,
) -> Result<(), RelationViolation> {
    for parent_id in [proposed_mother_id, proposed_father_id].into_iter().flatten() {
        if parent_id == animal_id {
            return Err(RelationViolation::SelfParentage);
        }
        if index.chain_contains(parent_id, animal_id) {
            return Err(RelationViolation::PedigreeCycle);
        }
    }
    Ok(())
}

/// An existing active membership row for a `(animal, group)` pair.
#[derive(Debug, Clone, Copy)]
pub struct ActiveMembership {
    pub assigned_date: NaiveDate,
}

/// Validate a proposed group membership row.
///
/// At most one active row may exist per `(animal, group)` pair; historical
/// rows may repeat. A removal date must not precede the assignment date.
pub fn validate_group_membership(
    existing_active: Option<&ActiveMembership>,
    assigned_date: NaiveDate,
    removed_date: Option<NaiveDate>,
) -> Result<(), RelationViolation> {
    if let Some(removed) = removed_date {
        if removed < assigned_date {
            return Err(RelationViolation::MembershipRemovedBeforeAssigned);
        }
    }
    // A row that arrives already removed is historical and does not collide.
    if removed_date.is_none() && existing_active.is_some() {
        return Err(RelationViolation::DuplicateActiveMembership);
    }
    Ok(())
}

/// An existing location history row consulted when recording a new entry.
#[derive(Debug, Clone, Copy)]
pub struct LocationRow {
    pub farm_id: Uuid,
    pub entry_date: NaiveDate,
    pub exit_date: Option<NaiveDate>,
}

/// Validate a new location history entry against the animal's existing rows.
///
/// Rejects a duplicate `(farm, entry_date)` row and an entry dated after the
/// exit of the row it supersedes.
pub fn validate_location_history(
    existing: &[LocationRow],
    farm_id: Uuid,
    entry_date: NaiveDate,
    superseded: Option<&LocationRow>,
) -> Result<(), RelationViolation> {
    let duplicate = existing
        .iter()
        .any(|row| row.farm_id == farm_id && row.entry_date == entry_date);
    if duplicate {
        return Err(RelationViolation::DuplicateLocationEntry);
    }
    if let Some(row) = superseded {
        if let Some(exit) = row.exit_date {
            if entry_date > exit {
                return Err(RelationViolation::LocationEntryAfterExit);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_self_parentage_rejected() {
        let index = PedigreeIndex::new();
        let x = Uuid::new_v4();
        assert_eq!(
            validate_parent_assignment(&index, x, Some(x), None),
            Err(RelationViolation::SelfParentage)
        );
        assert_eq!(
            validate_parent_assignment(&index, x, None, Some(x)),
            Err(RelationViolation::SelfParentage)
        );
    }

    #[test]
    fn test_grandparent_cycle_rejected() {
        // X's mother is M; assigning X as M's mother closes a cycle,
        // and so does assigning M as X's grandparent through itself.
        let x = Uuid::new_v4();
        let m = Uuid::new_v4();
        let mut index = PedigreeIndex::new();
        index.insert(x, Some(m), None);
        index.insert(m, None, None);

        assert_eq!(
            validate_parent_assignment(&index, m, Some(x), None),
            Err(RelationViolation::PedigreeCycle)
        );
    }

    #[test]
    fn test_deep_cycle_rejected() {
        // Chain a -> b -> c; assigning a as c's father would cycle.
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let mut index = PedigreeIndex::new();
        index.insert(a, Some(b), None);
        index.insert(b, None, Some(c));

        assert_eq!(
            validate_parent_assignment(&index, c, None, Some(a)),
            Err(RelationViolation::PedigreeCycle)
        );
    }

    #[test]
    fn test_unrelated_parent_accepted() {
        let x = Uuid::new_v4();
        let m = Uuid::new_v4();
        let unrelated = Uuid::new_v4();
        let mut index = PedigreeIndex::new();
        index.insert(x, Some(m), None);
        index.insert(m, None, None);
        index.insert(unrelated, None, None);

        assert!(validate_parent_assignment(&index, x, Some(m), Some(unrelated)).is_ok());
    }

    #[test]
    fn test_walk_terminates_on_corrupted_cycle() {
        // Pre-existing cycle in the data must not hang the walk.
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut index = PedigreeIndex::new();
        index.insert(a, Some(b), None);
        index.insert(b, Some(a), None);

        let other = Uuid::new_v4();
        assert!(validate_parent_assignment(&index, other, None, None).is_ok());
        assert_eq!(
            validate_parent_assignment(&index, a, Some(b), None),
            Err(RelationViolation::PedigreeCycle)
        );
    }

    #[test]
    fn test_duplicate_active_membership_rejected() {
        let active = ActiveMembership {
            assigned_date: date(2026, 1, 1),
        };
        assert_eq!(
            validate_group_membership(Some(&active), date(2026, 2, 1), None),
            Err(RelationViolation::DuplicateActiveMembership)
        );
    }

    #[test]
    fn test_historical_membership_may_repeat() {
        // First membership was removed; a fresh assignment is fine.
        assert!(validate_group_membership(None, date(2026, 3, 1), None).is_ok());
        // A row arriving already removed never collides with an active one.
        let active = ActiveMembership {
            assigned_date: date(2026, 1, 1),
        };
        assert!(
            validate_group_membership(Some(&active), date(2025, 6, 1), Some(date(2025, 7, 1)))
                .is_ok()
        );
    }

    #[test]
    fn test_membership_removed_before_assigned_rejected() {
        assert_eq!(
            validate_group_membership(None, date(2026, 5, 10), Some(date(2026, 5, 9))),
            Err(RelationViolation::MembershipRemovedBeforeAssigned)
        );
        assert!(
            validate_group_membership(None, date(2026, 5, 10), Some(date(2026, 5, 10))).is_ok()
        );
    }

    #[test]
    fn test_duplicate_location_entry_rejected() {
        let farm = Uuid::new_v4();
        let rows = [LocationRow {
            farm_id: farm,
            entry_date: date(2026, 4, 1),
            exit_date: None,
        }];
        assert_eq!(
            validate_location_history(&rows, farm, date(2026, 4, 1), None),
            Err(RelationViolation::DuplicateLocationEntry)
        );
        assert!(validate_location_history(&rows, farm, date(2026, 4, 2), None).is_ok());
        assert!(validate_location_history(&rows, Uuid::new_v4(), date(2026, 4, 1), None).is_ok());
    }

    #[test]
    fn test_entry_after_superseded_exit_rejected() {
        let farm = Uuid::new_v4();
        let superseded = LocationRow {
            farm_id: Uuid::new_v4(),
            entry_date: date(2026, 1, 1),
            exit_date: Some(date(2026, 2, 1)),
        };
        assert_eq!(
            validate_location_history(&[], farm, date(2026, 2, 2), Some(&superseded)),
            Err(RelationViolation::LocationEntryAfterExit)
        );
        assert!(validate_location_history(&[], farm, date(2026, 2, 1), Some(&superseded)).is_ok());
        let open = LocationRow {
            exit_date: None,
            ..superseded
        };
        assert!(validate_location_history(&[], farm, date(2026, 6, 1), Some(&open)).is_ok());
    }
}
