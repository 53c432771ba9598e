//! Redemption ledger
//!
//! Persisted as one JSON blob, newest first, capped at a fixed number of
//! entries. Storage trouble never interrupts a draw: the failing call becomes
//! a no-op and the error is logged and handed to the error hook.
//!
//! If the stored blob could not be read at open time, nothing is written
//! until a later read succeeds, so an unreadable history is never replaced.

use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::consts::LEDGER_CAPACITY;
use crate::error::{Result, WheelError};
use crate::platform::storage::KeyValueStore;
use crate::wheel::{DrawOutcome, Tier};

/// A single redeemed draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Redemption code
    pub code: String,
    pub label: String,
    pub tier: Tier,
    pub recorded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<u64>,
}

impl LedgerEntry {
    pub fn from_outcome(outcome: &DrawOutcome, recorded_at: DateTime<Utc>) -> Self {
        Self {
            code: outcome.code.clone(),
            label: outcome.label.clone(),
            tier: outcome.tier.clone(),
            recorded_at,
            times: outcome.times,
            quota: outcome.quota,
        }
    }

    /// `YYYY-MM-DD HH:MM` in local time
    pub fn display_date(&self) -> String {
        self.display_date_in(&Local)
    }

    pub fn display_date_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        self.recorded_at
            .with_timezone(tz)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }
}

type ErrorHook = Box<dyn FnMut(&WheelError)>;

/// Bounded, persisted, most-recent-first history
pub struct RedemptionLedger {
    store: Box<dyn KeyValueStore>,
    capacity: usize,
    entries: Vec<LedgerEntry>,
    /// The stored blob could not be read; writes wait for a successful reload
    degraded: bool,
    on_error: Option<ErrorHook>,
}

impl RedemptionLedger {
    /// Storage key for the serialized entry list
    pub const STORAGE_KEY: &'static str = "prize_wheel_ledger";

    /// Open the ledger stored in `store`, keeping at most `capacity` entries.
    ///
    /// An unreadable or corrupt blob yields an empty ledger (and a warning).
    pub fn open(store: impl KeyValueStore + 'static, capacity: usize) -> Self {
        let mut ledger = Self {
            store: Box::new(store),
            capacity: capacity.max(1),
            entries: Vec::new(),
            degraded: false,
            on_error: None,
        };
        match ledger.load() {
            Ok(entries) => {
                log::info!("Loaded {} ledger entries", entries.len());
                ledger.entries = entries;
            }
            Err(e) => {
                ledger.degraded = true;
                ledger.report(e);
            }
        }
        ledger
    }

    /// Open with the default capacity
    pub fn with_default_capacity(store: impl KeyValueStore + 'static) -> Self {
        Self::open(store, LEDGER_CAPACITY)
    }

    /// Observability hook for swallowed storage errors
    pub fn set_error_hook(&mut self, hook: impl FnMut(&WheelError) + 'static) {
        self.on_error = Some(Box::new(hook));
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries, newest first
    pub fn list(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&LedgerEntry> {
        self.entries.first()
    }

    /// True while the stored history is unreadable and writes are held back
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Record a draw at the front, dropping the oldest beyond capacity.
    ///
    /// Returns false when storage refused the write, or when the stored
    /// history still cannot be read; the ledger is unchanged either way.
    pub fn append(&mut self, entry: LedgerEntry) -> bool {
        if self.degraded && !self.reload() {
            return false;
        }
        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.push(entry);
        next.extend(self.entries.iter().cloned());
        next.truncate(self.capacity);
        self.commit(next)
    }

    /// Remove every entry. Returns false when storage refused the write.
    pub fn clear(&mut self) -> bool {
        match self.store.remove(Self::STORAGE_KEY) {
            Ok(()) => {
                self.entries.clear();
                self.degraded = false;
                log::info!("Ledger cleared");
                true
            }
            Err(e) => {
                self.report(e.into());
                false
            }
        }
    }

    /// Retry reading the stored history after a failed open
    fn reload(&mut self) -> bool {
        match self.load() {
            Ok(entries) => {
                log::info!("Ledger storage readable again ({} entries)", entries.len());
                self.entries = entries;
                self.degraded = false;
                true
            }
            Err(e) => {
                self.report(e);
                false
            }
        }
    }

    fn load(&self) -> Result<Vec<LedgerEntry>> {
        let Some(json) = self.store.get(Self::STORAGE_KEY)? else {
            return Ok(Vec::new());
        };
        let mut entries: Vec<LedgerEntry> = serde_json::from_str(&json)?;
        entries.truncate(self.capacity);
        Ok(entries)
    }

    fn commit(&mut self, next: Vec<LedgerEntry>) -> bool {
        let saved: Result<()> = serde_json::to_string(&next)
            .map_err(WheelError::from)
            .and_then(|json| {
                self.store
                    .set(Self::STORAGE_KEY, &json)
                    .map_err(WheelError::from)
            });
        match saved {
            Ok(()) => {
                self.entries = next;
                log::info!("Ledger saved ({} entries)", self.entries.len());
                true
            }
            Err(e) => {
                self.report(e);
                false
            }
        }
    }

    fn report(&mut self, err: WheelError) {
        log::warn!("Ledger storage degraded: {err}");
        if let Some(hook) = self.on_error.as_mut() {
            hook(&err);
        }
    }
}
