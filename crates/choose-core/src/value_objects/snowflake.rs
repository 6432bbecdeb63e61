//! Time-ordered 64-bit ids for accounts, polls and options.
//!
//! Newer ids compare greater, which is what the poll listing orders by.
//!
//! ```text
//! | 41 bits: ms since EPOCH | 10 bits: worker | 12 bits: sequence |
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const WORKER_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const WORKER_MASK: u16 = (1 << WORKER_BITS) - 1;
const SEQUENCE_MASK: i64 = (1 << SEQUENCE_BITS) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// 2024-01-01T00:00:00Z in Unix milliseconds
    pub const EPOCH: i64 = 1_704_067_200_000;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Creation time in Unix milliseconds
    pub fn timestamp(&self) -> i64 {
        (self.0 >> (WORKER_BITS + SEQUENCE_BITS)) + Self::EPOCH
    }

    pub fn worker_id(&self) -> u16 {
        ((self.0 >> SEQUENCE_BITS) as u16) & WORKER_MASK
    }

    fn compose(millis: i64, worker_id: u16, sequence: i64) -> Self {
        Self(
            ((millis - Self::EPOCH) << (WORKER_BITS + SEQUENCE_BITS))
                | (i64::from(worker_id) << SEQUENCE_BITS)
                | sequence,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a snowflake id: {0:?}")]
pub struct SnowflakeParseError(pub String);

impl FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i64>() {
            Ok(id) if id >= 0 => Ok(Self(id)),
            _ => Err(SnowflakeParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

// Ids exceed 2^53, so JSON carries them as strings
impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(id) => Ok(Self(id)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Debug, Default)]
struct Clock {
    last_millis: i64,
    sequence: i64,
}

/// Hands out strictly increasing ids, up to 4096 per millisecond.
///
/// One generator is shared by every service through the `ServiceContext`.
#[derive(Debug)]
pub struct SnowflakeGenerator {
    worker_id: u16,
    clock: Mutex<Clock>,
}

impl SnowflakeGenerator {
    /// Only the low 10 bits of `worker_id` are kept.
    pub fn new(worker_id: u16) -> Self {
        Self {
            worker_id: worker_id & WORKER_MASK,
            clock: Mutex::new(Clock::default()),
        }
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }

    pub fn generate(&self) -> Snowflake {
        let mut clock = self
            .clock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        // A clock that went backwards keeps issuing from the last millisecond
        let mut now = now_millis().max(clock.last_millis);
        if now == clock.last_millis {
            clock.sequence = (clock.sequence + 1) & SEQUENCE_MASK;
            if clock.sequence == 0 {
                while now <= clock.last_millis {
                    std::thread::sleep(Duration::from_micros(100));
                    now = now_millis();
                }
            }
        } else {
            clock.sequence = 0;
        }
        clock.last_millis = now;

        Snowflake::compose(now, self.worker_id, clock.sequence)
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(Snowflake::EPOCH, |d| d.as_millis() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_parse_and_display() {
        let sf: Snowflake = "987654321".parse().unwrap();
        assert_eq!(sf, Snowflake::new(987_654_321));
        assert_eq!(sf.to_string(), "987654321");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<Snowflake>().is_err());
        assert!("-5".parse::<Snowflake>().is_err());
        assert!("".parse::<Snowflake>().is_err());
    }

    #[test]
    fn test_json_uses_strings_but_accepts_numbers() {
        let sf = Snowflake::new(123_456_789_012_345_678);
        assert_eq!(
            serde_json::to_string(&sf).unwrap(),
            "\"123456789012345678\""
        );

        let from_str: Snowflake = serde_json::from_str("\"123456789012345678\"").unwrap();
        assert_eq!(from_str, sf);
        let from_num: Snowflake = serde_json::from_str("12345").unwrap();
        assert_eq!(from_num.into_inner(), 12345);
        assert!(serde_json::from_str::<Snowflake>("\"x1\"").is_err());
    }

    #[test]
    fn test_generated_ids_increase() {
        let gen = SnowflakeGenerator::new(3);
        let mut last = Snowflake::default();
        for _ in 0..10_000 {
            let id = gen.generate();
            assert!(id > last);
            last = id;
        }
    }

    #[test]
    fn test_fields_round_trip_through_layout() {
        let gen = SnowflakeGenerator::new(42);
        let before = now_millis();
        let id = gen.generate();

        assert_eq!(id.worker_id(), 42);
        assert!(id.timestamp() >= before);
        assert!(id.timestamp() <= now_millis());
    }

    #[test]
    fn test_worker_id_is_masked() {
        assert_eq!(SnowflakeGenerator::new(1024 + 7).worker_id(), 7);
    }

    #[test]
    fn test_unique_across_threads() {
        let gen = Arc::new(SnowflakeGenerator::new(1));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gen = Arc::clone(&gen);
                thread::spawn(move || (0..1000).map(|_| gen.generate()).collect::<Vec<_>>())
            })
            .collect();

        let ids: HashSet<Snowflake> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(ids.len(), 4000);
    }
}
