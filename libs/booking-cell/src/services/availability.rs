use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::{StoreError, SupabaseClient};

use crate::models::{AvailabilitySnapshot, BookingError, SelectionKey};
use crate::services::slots;

#[derive(Deserialize)]
struct BookedTimeRow {
    time: String,
}

/// Computes the free slots for a (date, practitioner) selection: the fixed
/// daily grid minus the times already reserved. Each resolution fetches from
/// the store; results are kept per selection as a last-known-good fallback,
/// and a fetch only commits if no later fetch for the same selection has
/// started since.
#[derive(Clone)]
pub struct AvailabilityResolver {
    supabase: Arc<SupabaseClient>,
    grid: Arc<Vec<String>>,
    fetch_seq: Arc<AtomicU64>,
    cache: Arc<RwLock<HashMap<SelectionKey, CacheEntry>>>,
}

#[derive(Debug, Default)]
struct CacheEntry {
    latest_started: u64,
    committed_seq: u64,
    free_slots: Option<Vec<String>>,
    as_of: Option<DateTime<Utc>>,
}

impl CacheEntry {
    fn begin(&mut self, seq: u64) {
        if seq > self.latest_started {
            self.latest_started = seq;
        }
    }

    /// Applies a fetch result unless a later fetch for the same selection
    /// started in the meantime; superseded results are discarded.
    fn apply(&mut self, seq: u64, free_slots: Vec<String>, as_of: DateTime<Utc>) -> bool {
        if seq != self.latest_started {
            return false;
        }
        self.committed_seq = seq;
        self.free_slots = Some(free_slots);
        self.as_of = Some(as_of);
        true
    }

    fn to_snapshot(&self, key: &SelectionKey, stale: bool) -> Option<AvailabilitySnapshot> {
        Some(AvailabilitySnapshot {
            date: key.date,
            practitioner_id: key.practitioner_id.clone(),
            free_slots: self.free_slots.clone()?,
            stale,
            as_of: self.as_of?,
        })
    }
}

impl AvailabilityResolver {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
            grid: Arc::new(slots::grid_for(&config.schedule)),
            fetch_seq: Arc::new(AtomicU64::new(0)),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The full candidate grid, independent of any booking.
    pub fn grid(&self) -> &[String] {
        &self.grid
    }

    pub async fn resolve(
        &self,
        key: &SelectionKey,
        auth_token: Option<&str>,
    ) -> Result<AvailabilitySnapshot, BookingError> {
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut cache = self.cache.write().await;
            cache.entry(key.clone()).or_default().begin(seq);
        }

        match self.fetch_booked_times(key, auth_token).await {
            Ok(booked) => {
                let free_slots = slots::subtract(&self.grid, &booked);
                let as_of = Utc::now();

                let mut cache = self.cache.write().await;
                let entry = cache.entry(key.clone()).or_default();
                if !entry.apply(seq, free_slots.clone(), as_of) {
                    debug!(
                        "Discarding superseded availability fetch for {} / {}",
                        key.date, key.practitioner_id
                    );
                    // A later fetch already committed; its result is the
                    // authoritative view of this selection.
                    if entry.committed_seq > seq {
                        if let Some(snapshot) = entry.to_snapshot(key, false) {
                            return Ok(snapshot);
                        }
                    }
                }

                Ok(AvailabilitySnapshot {
                    date: key.date,
                    practitioner_id: key.practitioner_id.clone(),
                    free_slots,
                    stale: false,
                    as_of,
                })
            }
            Err(err) => {
                warn!(
                    "Reservation store fetch failed for {} / {}: {}",
                    key.date, key.practitioner_id, err
                );
                // Keep showing the last list that could be fetched rather
                // than presenting an empty day as authoritative.
                let cache = self.cache.read().await;
                cache
                    .get(key)
                    .and_then(|entry| entry.to_snapshot(key, true))
                    .ok_or_else(|| BookingError::StoreUnavailable(err.to_string()))
            }
        }
    }

    async fn fetch_booked_times(
        &self,
        key: &SelectionKey,
        auth_token: Option<&str>,
    ) -> Result<HashSet<String>, StoreError> {
        let path = format!(
            "/rest/v1/reservations?select=time&date=eq.{}&practitioner_id=eq.{}",
            key.date,
            urlencoding::encode(&key.practitioner_id),
        );

        let rows: Vec<BookedTimeRow> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        Ok(rows.into_iter().map(|row| row.time).collect())
    }
}
