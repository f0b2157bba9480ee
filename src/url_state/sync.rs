//! Two-way synchronization between host state and the address bar.
//!
//! The controller is a small state machine:
//!
//! - **Hydrating**: the location is being decoded and pushed into the host
//!   through its setters. State changes reported in this phase are ignored,
//!   so decode-triggered setter calls can never loop back into a write.
//! - **Steady**: state changes are encoded and, when the query differs from
//!   the last one applied, scheduled as a trailing-debounced
//!   `replace_state`.
//!
//! The controller owns no timers. The host reports changes with
//! [`UrlSyncController::on_state_change`], asks
//! [`UrlSyncController::next_deadline`] when to come back, and calls
//! [`UrlSyncController::poll`] to perform any write that is due.

use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};
use url::Url;

use super::codec::UrlStateCodec;
use super::host::{BrowserLocation, StateSetters};
use super::UrlState;

/// Controller tunables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncOptions {
    /// Quiet period after the last state change before the URL is written.
    pub debounce: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
        }
    }
}

/// Controller phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPhase {
    /// Decoding the location into host state. Also the phase before mount
    /// and after teardown.
    Hydrating,
    /// Mirroring host state changes into the location.
    Steady,
}

/// A scheduled history write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingWrite {
    pub query: String,
    pub due: Instant,
}

/// Keeps host state and a [`BrowserLocation`] in sync.
#[derive(Debug)]
pub struct UrlSyncController {
    codec: UrlStateCodec,
    opts: SyncOptions,
    phase: SyncPhase,
    hydrated: bool,
    last_query: Option<String>,
    pending: Option<PendingWrite>,
}

impl Default for UrlSyncController {
    fn default() -> Self {
        Self::new(SyncOptions::default())
    }
}

impl UrlSyncController {
    pub fn new(opts: SyncOptions) -> Self {
        Self::with_codec(UrlStateCodec::default(), opts)
    }

    pub fn with_codec(codec: UrlStateCodec, opts: SyncOptions) -> Self {
        Self {
            codec,
            opts,
            phase: SyncPhase::Hydrating,
            hydrated: false,
            last_query: None,
            pending: None,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// True once the first hydration has completed.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// The query most recently decoded or written.
    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    pub fn pending(&self) -> Option<&PendingWrite> {
        self.pending.as_ref()
    }

    /// When the host should next call [`poll`](Self::poll).
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }

    /// Initial hydration on page load. Returns the decoded state.
    pub fn mount<L, S>(&mut self, location: &L, current: &UrlState, setters: &mut S) -> UrlState
    where
        L: BrowserLocation + ?Sized,
        S: StateSetters + ?Sized,
    {
        let decoded = self.hydrate(location, current, setters);
        self.hydrated = true;
        decoded
    }

    /// Re-hydration after back/forward navigation. Returns the decoded
    /// state.
    pub fn on_popstate<L, S>(&mut self, location: &L, current: &UrlState, setters: &mut S) -> UrlState
    where
        L: BrowserLocation + ?Sized,
        S: StateSetters + ?Sized,
    {
        self.hydrate(location, current, setters)
    }

    fn hydrate<L, S>(&mut self, location: &L, current: &UrlState, setters: &mut S) -> UrlState
    where
        L: BrowserLocation + ?Sized,
        S: StateSetters + ?Sized,
    {
        self.phase = SyncPhase::Hydrating;

        let search = location.search();
        let decoded = self.codec.decode(&search);
        self.last_query = Some(self.codec.encode(&decoded));
        self.pending = None;

        let applied = apply_changed(current, &decoded, setters);
        debug!(
            search = %search,
            setters_called = applied,
            "hydrated state from location"
        );

        self.phase = SyncPhase::Steady;
        decoded
    }

    /// Reports the host's current state.
    ///
    /// Schedules a write `debounce` after `now`, replacing any pending one.
    /// Returns whether a write is now pending. Changes reported before
    /// mount or while hydrating are ignored.
    pub fn on_state_change(&mut self, state: &UrlState, now: Instant) -> bool {
        if !self.hydrated || self.phase == SyncPhase::Hydrating {
            trace!(phase = ?self.phase, "ignoring state change while hydrating");
            return false;
        }

        let query = self.codec.encode(state);
        if self.last_query.as_deref() == Some(query.as_str()) {
            if self.pending.take().is_some() {
                trace!(query = %query, "state returned to applied query; cancelled pending write");
            } else {
                trace!(query = %query, "query unchanged; skipping write");
            }
            return false;
        }

        let due = now + self.opts.debounce;
        trace!(query = %query, "scheduling history write");
        self.pending = Some(PendingWrite { query, due });
        true
    }

    /// Performs the pending write if it is due at `now`. Returns the
    /// relative URL written.
    pub fn poll<L>(&mut self, location: &mut L, now: Instant) -> Option<String>
    where
        L: BrowserLocation + ?Sized,
    {
        if self.pending.as_ref()?.due > now {
            return None;
        }
        let pending = self.pending.take()?;
        let url = relative_url(&location.pathname(), &pending.query, &location.hash());
        location.replace_state(&url);
        debug!(url = %url, "replaced history entry");
        self.last_query = Some(pending.query);
        Some(url)
    }

    /// Absolute URL encoding `state` as it is now, regardless of any
    /// pending write.
    ///
    /// The location's full href is kept and only its query is replaced, so
    /// URLs with an opaque origin (`file://`) stay intact.
    pub fn build_share_url<L>(&self, location: &L, state: &UrlState) -> String
    where
        L: BrowserLocation + ?Sized,
    {
        let query = self.codec.encode(state);
        let href = location.href();
        match Url::parse(&href) {
            Ok(mut url) => {
                url.set_query(Some(&query));
                url.into()
            }
            Err(err) => {
                warn!(href = %href, error = %err, "location href is not a valid URL");
                format!(
                    "{}{}",
                    location.origin(),
                    relative_url(&location.pathname(), &query, &location.hash())
                )
            }
        }
    }

    /// Cancels pending work and forgets the applied query.
    pub fn teardown(&mut self) {
        if self.pending.take().is_some() {
            debug!("teardown cancelled pending history write");
        }
        self.last_query = None;
        self.hydrated = false;
        self.phase = SyncPhase::Hydrating;
    }
}

fn relative_url(path: &str, query: &str, hash: &str) -> String {
    if query.is_empty() {
        format!("{}{}", path, hash)
    } else {
        format!("{}?{}{}", path, query, hash)
    }
}

/// Calls the setters whose values differ between `current` and `next`.
/// Returns how many were called.
fn apply_changed<S>(current: &UrlState, next: &UrlState, setters: &mut S) -> usize
where
    S: StateSetters + ?Sized,
{
    let mut called = 0;
    let (cur, new) = (&current.filters, &next.filters);

    if current.chart != next.chart {
        setters.update_chart(next.chart.to_update());
        called += 1;
    }
    if cur.species != new.species {
        setters.set_species(new.species.clone());
        called += 1;
    }
    if cur.island != new.island {
        setters.set_island(new.island);
        called += 1;
    }
    if cur.sex != new.sex {
        setters.set_sex(new.sex);
        called += 1;
    }
    if cur.diet != new.diet {
        setters.set_diet(new.diet.clone());
        called += 1;
    }
    if cur.life_stage != new.life_stage {
        setters.set_life_stage(new.life_stage);
        called += 1;
    }
    if cur.year_range != new.year_range {
        setters.set_year_range(new.year_range);
        called += 1;
    }

    called
}
