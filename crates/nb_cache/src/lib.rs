use chrono::{DateTime, NaiveTime, Utc};

pub mod backends;

pub use backends::memory::MemoryCache;
pub use backends::supabase::SupabaseCache;

/// Expiration instant for an entry created at `now`: the next UTC midnight.
///
/// The daily anchor deliberately uses UTC rather than server-local time, so
/// the expiry boundary does not move with the deploy region.
pub fn next_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now.date_naive() + chrono::Days::new(1);
    tomorrow.and_time(NaiveTime::MIN).and_utc()
}

pub mod prelude {
    pub use super::{MemoryCache, SupabaseCache};
    pub use nb_core::{cache_key_interests, NewsCache};
}
