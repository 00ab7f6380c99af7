//! Time-seeded token generator for memo keys.
//!
//! Not a hash in any cryptographic sense: the output depends on the wall
//! clock and a random draw, so hashing the same key twice gives two tokens.
//! Collisions are possible and tolerated.

use rand::Rng;

/// Width of the random component added to the microsecond clock.
const SALT_JITTER: u64 = 1_000_000;

pub fn pseudo_hash(key: &str) -> String {
    pseudo_hash_with_salt(key, draw_salt())
}

/// Rolling mix of `key` with a fixed salt. Deterministic for a given salt.
pub fn pseudo_hash_with_salt(key: &str, salt: u64) -> String {
    let mut acc: u64 = 0;
    for c in key.chars() {
        let ord = u64::from(c);
        acc = ord
            .wrapping_add(acc << 4)
            .wrapping_add(acc << 10)
            .wrapping_sub(acc)
            .wrapping_add(ord ^ acc)
            .wrapping_add(salt);
    }
    acc.to_string()
}

fn draw_salt() -> u64 {
    let now = chrono::Utc::now().timestamp_micros().unsigned_abs();
    now.wrapping_add(rand::thread_rng().gen_range(0..SALT_JITTER))
}
