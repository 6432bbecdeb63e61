//! Access rules for polls and options
//!
//! Anyone may read. Creating requires an authenticated account. Changing or
//! deleting requires being the creator of the poll (for an option, the creator
//! of its parent poll). A non-creator is told the resource does not exist,
//! which keeps other accounts' polls from being probed.

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// What the caller wants to do with a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

impl Operation {
    #[inline]
    pub fn is_read(self) -> bool {
        matches!(self, Self::Read)
    }
}

/// Why a request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Anonymous caller attempted a write
    AuthenticationRequired,
    /// Caller is not the owner; surfaced as absence
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    #[inline]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Turn a denial into the domain error the caller sees.
    ///
    /// `not_found` builds the resource's own not-found error so an owner-scoped
    /// denial is indistinguishable from a missing resource.
    pub fn into_result(self, not_found: impl FnOnce() -> DomainError) -> Result<(), DomainError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(Denial::AuthenticationRequired) => Err(DomainError::AuthenticationRequired),
            Self::Deny(Denial::NotFound) => Err(not_found()),
        }
    }
}

/// Reads are always allowed
#[inline]
pub fn can_read(_identity: Option<Snowflake>) -> bool {
    true
}

/// Writes need the caller to own the resource
#[inline]
pub fn can_modify(identity: Option<Snowflake>, owner: Snowflake) -> bool {
    identity == Some(owner)
}

/// Decide whether `identity` may perform `operation`.
///
/// `owner` is the creator of the targeted poll, or `None` when the operation
/// creates a new top-level resource.
pub fn authorize(
    identity: Option<Snowflake>,
    operation: Operation,
    owner: Option<Snowflake>,
) -> Decision {
    if operation.is_read() && can_read(identity) {
        return Decision::Allow;
    }
    if identity.is_none() {
        return Decision::Deny(Denial::AuthenticationRequired);
    }
    match owner {
        None => Decision::Allow,
        Some(owner) if can_modify(identity, owner) => Decision::Allow,
        Some(_) => Decision::Deny(Denial::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: Snowflake = Snowflake::new(1);
    const OTHER: Snowflake = Snowflake::new(2);

    #[test]
    fn test_reads_always_allowed() {
        for identity in [None, Some(OWNER), Some(OTHER)] {
            assert!(authorize(identity, Operation::Read, Some(OWNER)).is_allowed());
            assert!(authorize(identity, Operation::Read, None).is_allowed());
        }
    }

    #[test]
    fn test_anonymous_writes_need_authentication() {
        for op in [Operation::Create, Operation::Update, Operation::Delete] {
            assert_eq!(
                authorize(None, op, Some(OWNER)),
                Decision::Deny(Denial::AuthenticationRequired)
            );
        }
        assert_eq!(
            authorize(None, Operation::Create, None),
            Decision::Deny(Denial::AuthenticationRequired)
        );
    }

    #[test]
    fn test_authenticated_create_allowed() {
        assert!(authorize(Some(OTHER), Operation::Create, None).is_allowed());
    }

    #[test]
    fn test_owner_may_modify() {
        assert!(authorize(Some(OWNER), Operation::Update, Some(OWNER)).is_allowed());
        assert!(authorize(Some(OWNER), Operation::Delete, Some(OWNER)).is_allowed());
        // adding an option to one's own poll
        assert!(authorize(Some(OWNER), Operation::Create, Some(OWNER)).is_allowed());
    }

    #[test]
    fn test_non_owner_sees_not_found() {
        for op in [Operation::Create, Operation::Update, Operation::Delete] {
            assert_eq!(
                authorize(Some(OTHER), op, Some(OWNER)),
                Decision::Deny(Denial::NotFound)
            );
        }
    }

    #[test]
    fn test_into_result_maps_denials() {
        let err = Decision::Deny(Denial::NotFound)
            .into_result(|| DomainError::PollNotFound("p".into()))
            .unwrap_err();
        assert!(err.is_not_found());

        let err = Decision::Deny(Denial::AuthenticationRequired)
            .into_result(|| DomainError::PollNotFound("p".into()))
            .unwrap_err();
        assert!(matches!(err, DomainError::AuthenticationRequired));

        assert!(Decision::Allow
            .into_result(|| DomainError::PollNotFound("p".into()))
            .is_ok());
    }
}
