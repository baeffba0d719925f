//! Entity Identifiers
//!
//! Ids issued by the Persistence Service and ids minted locally for quick-edit
//! additions share one wire format (a plain string). Inside the engine they are
//! kept apart by `EntityId`, and the prefix check happens only in `parse`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Prefix carried by every locally minted id
pub const SYNTHETIC_PREFIX: &str = "local_";

/// Identity of a tier, column or card
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityId {
    /// Issued by the Persistence Service
    Persisted(String),
    /// Minted on the client for an overlay addition (stored with its prefix)
    Synthetic(String),
}

impl EntityId {
    /// Classify a wire id
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with(SYNTHETIC_PREFIX) {
            EntityId::Synthetic(raw.to_string())
        } else {
            EntityId::Persisted(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EntityId::Persisted(id) | EntityId::Synthetic(id) => id,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, EntityId::Synthetic(_))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        EntityId::parse(raw)
    }
}

impl From<String> for EntityId {
    fn from(raw: String) -> Self {
        EntityId::parse(&raw)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(EntityId::parse(&raw))
    }
}

/// What a synthetic id is minted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticKind {
    Tier,
    Column,
    Card,
}

impl SyntheticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntheticKind::Tier => "tier",
            SyntheticKind::Column => "column",
            SyntheticKind::Card => "card",
        }
    }
}

/// Mint a synthetic id from a millisecond timestamp and a random nonce.
///
/// Format: `local_<kind>_<ms>_<nonce base36>`
pub fn mint_synthetic_id(kind: SyntheticKind, now_ms: u64, nonce: u32) -> EntityId {
    EntityId::Synthetic(format!(
        "{}{}_{}_{}",
        SYNTHETIC_PREFIX,
        kind.as_str(),
        now_ms,
        to_base36(nonce)
    ))
}

/// Mint a synthetic id using the browser clock and RNG
pub fn mint_browser_id(kind: SyntheticKind) -> EntityId {
    let now_ms = js_sys::Date::now() as u64;
    let nonce = (js_sys::Math::random() * u32::MAX as f64) as u32;
    mint_synthetic_id(kind, now_ms, nonce)
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
