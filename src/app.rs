use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Instant;

use crate::checklist::Checklist;
use crate::digest::{DigestOutcome, DigestSnapshot, DEFAULT_DIGEST_SIZE};
use crate::filter::{self, FilterChange, FilterState, Visible};
use crate::generator::generate_jobs;
use crate::models::{Job, Preferences};
use crate::scoring::rescore_all;
use crate::status::{JobStatus, StatusRecord, StatusTracker};
use crate::store::{self, KeyValueStore};
use crate::timers::{Debouncer, Level, Notifications};

/// Everything the dashboard works on, loaded from and written back to a
/// key/value store. Each operation leaves the state consistent before
/// returning.
pub struct App<'s> {
    store: &'s dyn KeyValueStore,
    jobs: Vec<Job>,
    preferences: Preferences,
    saved: BTreeSet<String>,
    statuses: StatusTracker,
    checklist: Checklist,
    /// What the user is editing.
    pub filter: FilterState,
    /// What the visible list is computed from; lags `filter` while a search
    /// edit is debounced.
    applied: FilterState,
    debouncer: Debouncer,
    pub notifications: Notifications,
    digest_size: usize,
}

/// Write `value`, turning a failure into a toast. The in-memory change stands.
fn persist<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    notifications: &mut Notifications,
    key: &str,
    value: &T,
    now: Instant,
) -> bool {
    match store::save(store, key, value) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to persist state");
            notifications.push(Level::Error, format!("Could not save {}: {}", key, e), now);
            false
        }
    }
}

impl<'s> App<'s> {
    pub fn load(store: &'s dyn KeyValueStore) -> Self {
        let preferences: Preferences = store::load_or_default(store, store::PREFERENCES);
        let mut jobs: Vec<Job> = store::load_or_default(store, store::JOBS);
        rescore_all(&mut jobs, &preferences);

        Self {
            store,
            jobs,
            preferences,
            saved: store::load_or_default(store, store::SAVED_JOB_IDS),
            statuses: store::load_or_default(store, store::JOB_STATUSES),
            checklist: store::load_or_default(store, store::TEST_CHECKLIST),
            filter: FilterState::default(),
            applied: FilterState::default(),
            debouncer: Debouncer::default(),
            notifications: Notifications::default(),
            digest_size: DEFAULT_DIGEST_SIZE,
        }
    }

    pub fn with_digest_size(mut self, size: usize) -> Self {
        self.digest_size = size;
        self
    }

    // --- Jobs ---

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    /// Replace the session dataset with freshly generated postings.
    ///
    /// New postings reuse the `job-N` ids, so bookmarks and statuses recorded
    /// against the old dataset are dropped with it.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize, now: Instant) {
        self.jobs = generate_jobs(rng, count);
        rescore_all(&mut self.jobs, &self.preferences);
        tracing::info!(count, "generated new job dataset");
        persist(self.store, &mut self.notifications, store::JOBS, &self.jobs, now);

        if !self.saved.is_empty() {
            tracing::info!(dropped = self.saved.len(), "cleared saved jobs of previous dataset");
            self.saved.clear();
            persist(self.store, &mut self.notifications, store::SAVED_JOB_IDS, &self.saved, now);
        }
        let dropped = self.statuses.clear();
        if dropped > 0 {
            tracing::info!(dropped, "cleared statuses of previous dataset");
            persist(self.store, &mut self.notifications, store::JOB_STATUSES, &self.statuses, now);
        }
    }

    /// Generate a dataset only when none has been stored yet.
    pub fn ensure_jobs<R: Rng + ?Sized>(&mut self, rng: &mut R, count: usize, now: Instant) {
        if self.jobs.is_empty() {
            self.regenerate(rng, count, now);
        }
    }

    // --- Preferences ---

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn has_preferences(&self) -> bool {
        self.preferences.is_set()
    }

    pub fn save_preferences(&mut self, preferences: Preferences, now: Instant) {
        self.preferences = preferences;
        rescore_all(&mut self.jobs, &self.preferences);
        if persist(
            self.store,
            &mut self.notifications,
            store::PREFERENCES,
            &self.preferences,
            now,
        ) {
            self.notifications.push(Level::Info, "Preferences saved", now);
        }
    }

    // --- Saved set ---

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.contains(id)
    }

    /// Flip the bookmark for `id`. Unknown ids are ignored and yield `None`.
    pub fn toggle_save(&mut self, id: &str, now: Instant) -> Option<bool> {
        self.job(id)?;
        let saved = if self.saved.remove(id) {
            false
        } else {
            self.saved.insert(id.to_string());
            true
        };
        persist(self.store, &mut self.notifications, store::SAVED_JOB_IDS, &self.saved, now);
        Some(saved)
    }

    pub fn saved_jobs(&self) -> Vec<&Job> {
        filter::saved_jobs(&self.jobs, &self.saved)
    }

    // --- Status ---

    pub fn status_of(&self, id: &str) -> JobStatus {
        self.statuses.status_of(id)
    }

    pub fn status_record(&self, id: &str) -> Option<&StatusRecord> {
        self.statuses.record(id)
    }

    /// Returns false, changing nothing, when `id` is unknown.
    pub fn set_status(&mut self, id: &str, status: JobStatus, today: NaiveDate, now: Instant) -> bool {
        if self.job(id).is_none() {
            return false;
        }
        self.statuses.set_status(id, status, today);
        if persist(self.store, &mut self.notifications, store::JOB_STATUSES, &self.statuses, now) {
            self.notifications.push(Level::Info, format!("Status updated: {}", status), now);
        }
        true
    }

    /// Status changes newest first, joined with their postings.
    pub fn recent_updates(&self) -> Vec<(&Job, &StatusRecord)> {
        self.statuses
            .recent_updates()
            .into_iter()
            .filter_map(|(id, record)| self.job(id).map(|job| (job, record)))
            .collect()
    }

    // --- Filters ---

    /// Search edits are debounced; every other change applies immediately.
    pub fn update_filter(&mut self, change: FilterChange, now: Instant) {
        let debounced = matches!(change, FilterChange::Search(_));
        self.filter.apply(change);
        if debounced {
            self.debouncer.schedule(now);
        } else {
            self.applied = self.filter.clone();
        }
    }

    pub fn toggle_match_filter(&mut self, now: Instant) -> bool {
        let on = !self.filter.match_only;
        self.update_filter(FilterChange::MatchOnly(on), now);
        on
    }

    pub fn recompute_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Advance timers. Returns true when a debounced recompute was applied.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.notifications.prune(now);
        if self.debouncer.fire(now) {
            self.applied = self.filter.clone();
            tracing::debug!(search = %self.applied.search, "applied debounced filter");
            true
        } else {
            false
        }
    }

    /// Apply any pending edit right away, e.g. for one-shot CLI listings.
    pub fn flush_filter(&mut self) {
        self.debouncer.cancel();
        self.applied = self.filter.clone();
    }

    pub fn visible(&self) -> Visible<'_> {
        filter::visible_jobs(
            &self.jobs,
            &self.applied,
            &self.statuses,
            self.preferences.min_match_score,
        )
    }

    // --- Digest ---

    pub fn view_digest(&self, date: NaiveDate) -> Option<DigestSnapshot> {
        store::load(self.store, &store::digest_key(date))
    }

    /// Return the stored digest for `date`, or build and store it once.
    pub fn generate_digest(&mut self, date: NaiveDate, now: Instant) -> DigestOutcome {
        if let Some(existing) = self.view_digest(date) {
            return DigestOutcome::Existing(existing);
        }
        if !self.has_preferences() {
            return DigestOutcome::PreferencesRequired;
        }
        let snapshot = DigestSnapshot::build(date, &self.jobs, self.digest_size);
        tracing::info!(%date, jobs = snapshot.jobs.len(), "generated daily digest");
        persist(
            self.store,
            &mut self.notifications,
            &store::digest_key(date),
            &snapshot,
            now,
        );
        DigestOutcome::Generated(snapshot)
    }

    // --- Checklist ---

    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    pub fn set_check(&mut self, index: usize, passed: bool, now: Instant) -> bool {
        if !self.checklist.set(index, passed) {
            return false;
        }
        persist(self.store, &mut self.notifications, store::TEST_CHECKLIST, &self.checklist, now);
        true
    }

    pub fn reset_checklist(&mut self, now: Instant) {
        self.checklist.reset();
        persist(self.store, &mut self.notifications, store::TEST_CHECKLIST, &self.checklist, now);
    }
}
