//! Domain error taxonomy.
//!
//! `NotFound` and `Forbidden` are terminal access-resolution outcomes;
//! `InvalidRelation` is a rejected write naming the structural rule it would
//! violate. None of these are retried internally - the domain performs no
//! I/O of its own.

use thiserror::Error;

/// A structural invariant that a proposed write would violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RelationViolation {
    #[error("An animal cannot be its own mother or father")]
    SelfParentage,

    #[error("Assigning this parent would create a cycle in the pedigree")]
    PedigreeCycle,

    #[error("The animal already has an active membership in this group")]
    DuplicateActiveMembership,

    #[error("Membership removal date cannot precede its assignment date")]
    MembershipRemovedBeforeAssigned,

    #[error("A location history entry for this animal, farm and entry date already exists")]
    DuplicateLocationEntry,

    #[error("Location entry date cannot fall after the exit date of the record it supersedes")]
    LocationEntryAfterExit,
}

/// Top-level domain error.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Not authorized to access this {0}")]
    Forbidden(String),

    #[error(transparent)]
    InvalidRelation(#[from] RelationViolation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_violation_messages_name_the_rule() {
        assert!(RelationViolation::SelfParentage
            .to_string()
            .contains("its own mother or father"));
        assert!(RelationViolation::PedigreeCycle.to_string().contains("cycle"));
        assert!(RelationViolation::DuplicateActiveMembership
            .to_string()
            .contains("active membership"));
    }

    #[test]
    fn test_domain_error_from_violation() {
        let err: DomainError = RelationViolation::PedigreeCycle.into();
        assert!(matches!(err, DomainError::InvalidRelation(_)));
    }

    #[test]
    fn test_not_found_display() {
        let err = DomainError::NotFound("animal".to_string());
        assert_eq!(err.to_string(), "animal not found");
    }
}
