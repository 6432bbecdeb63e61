//! Number of option places a poll declares

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::DomainError;

/// The capacity of a poll: a strictly positive, even count of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlacesNumber(i32);

impl PlacesNumber {
    /// Validate a raw places count
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value <= 0 || value % 2 != 0 {
            return Err(DomainError::InvalidPlacesNumber);
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| DomainError::InvalidPlacesNumber)
    }

    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlacesNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for PlacesNumber {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl Serialize for PlacesNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.0)
    }
}
