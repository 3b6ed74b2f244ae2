//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Logical identity of a physical button.
///
/// Serialized as a bare integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonId(u16);

impl ButtonId {
    /// Creates a ButtonId from its numeric value.
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ButtonId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// Unique identifier for a connected viewer.
///
/// Generated server-side when a client connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Creates a new random ClientId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClientId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_id_serializes_as_integer() {
        let json = serde_json::to_string(&ButtonId::new(2)).unwrap();
        assert_eq!(json, "2");
    }

    #[test]
    fn button_id_parses_with_whitespace() {
        let id: ButtonId = " 7 ".parse().unwrap();
        assert_eq!(id, ButtonId::new(7));
    }

    #[test]
    fn button_id_rejects_non_numeric() {
        assert!("left".parse::<ButtonId>().is_err());
    }

    #[test]
    fn client_ids_are_unique() {
        assert_ne!(ClientId::new(), ClientId::new());
    }

    #[test]
    fn client_id_round_trips_through_display() {
        let id = ClientId::new();
        let parsed: ClientId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.to_string().len(), 36);
    }
}
