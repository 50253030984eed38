use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SUFFIX_LEN: usize = 6;
const TRACKING_DIGITS: usize = 10;

/// Source of order ids and tracking numbers.
///
/// Formats:
/// - order id: `ORD-<epoch_ms>-<6 uppercase alphanumerics>`
/// - tracking number: `TR<10 digits>`
///
/// Uniqueness against existing records is checked by the repository, which
/// asks again on collision.
pub trait IdGenerator: Send + Sync {
    fn order_id(&self, now: DateTime<Utc>) -> String;
    fn tracking_number(&self) -> String;
}

/// Random ids from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn order_id(&self, now: DateTime<Utc>) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        format!("ORD-{}-{}", now.timestamp_millis(), suffix)
    }

    fn tracking_number(&self) -> String {
        let mut rng = rand::thread_rng();
        let digits: String = (0..TRACKING_DIGITS)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        format!("TR{}", digits)
    }
}

/// Counter-based ids, same formats, fully reproducible.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl IdGenerator for SequentialIds {
    fn order_id(&self, now: DateTime<Utc>) -> String {
        format!("ORD-{}-{:06}", now.timestamp_millis(), self.bump())
    }

    fn tracking_number(&self) -> String {
        format!("TR{:010}", self.bump())
    }
}
