//! Id and share-token minting

use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn digest(kind: &str, parts: &[&str]) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(kind.as_bytes());
    for part in parts {
        hasher.update(&[0]);
        hasher.update(part.as_bytes());
    }
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    hasher.update(&nanos.to_le_bytes());
    hasher.update(&COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    hasher.update(&std::process::id().to_le_bytes());
    hasher.finalize()
}

/// 16 hex chars, unique per call
pub fn mint_id(parts: &[&str]) -> String {
    digest("id", parts).to_hex()[..16].to_string()
}

/// 32 hex chars, unique per call
pub fn mint_token(ranking_id: &str, purpose: &str) -> String {
    digest("token", &[ranking_id, purpose]).to_hex()[..32].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_values_are_unique() {
        let a = mint_token("r1", "view");
        let b = mint_token("r1", "view");
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
        assert_eq!(mint_id(&["t1", "alice"]).len(), 16);
    }
}
