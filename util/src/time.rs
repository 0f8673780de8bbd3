use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub fn now_sec() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|since| since.as_secs())
        .unwrap_or_default()
}

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|since| since.as_millis() as u64)
        .unwrap_or_default()
}

/// Unix timestamp (in seconds) `ttl` from now, rounded up to a whole second.
pub fn expire_at(ttl: Duration) -> u64 {
    now_millis().div_ceil(1000) + ttl.as_secs()
}
