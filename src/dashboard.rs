//! Dataset lifecycle for a dashboard panel.
//!
//! A panel loads its dataset once, exposes a [`LoadState`], and derives
//! series through [`Memo`] caches keyed by the dataset identity, so series
//! are only recomputed when a new dataset arrives.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::aggregators::{Normalize, normalize};
use crate::error::LoadError;
use crate::fetch::{HttpClient, load_source};
use crate::parser::{Format, ParseOutcome, parse};

static NEXT_DATASET_ID: AtomicU64 = AtomicU64::new(1);

/// Normalized rows with a unique identity.
pub struct Dataset<T> {
    id: u64,
    rows: Arc<[T]>,
}

impl<T> Dataset<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            id: NEXT_DATASET_ID.fetch_add(1, Ordering::Relaxed),
            rows: rows.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// Clones share rows and identity.
impl<T> Clone for Dataset<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<T> std::fmt::Debug for Dataset<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("id", &self.id)
            .field("rows", &self.rows.len())
            .finish()
    }
}

/// A derived value cached against the dataset it was computed from.
#[derive(Debug)]
pub struct Memo<R> {
    source: Option<u64>,
    value: Option<R>,
}

impl<R> Default for Memo<R> {
    fn default() -> Self {
        Self {
            source: None,
            value: None,
        }
    }
}

impl<R> Memo<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value, recomputing only when `dataset` differs from
    /// the one the cache was filled from.
    pub fn get_or_compute<T, F>(&mut self, dataset: &Dataset<T>, compute: F) -> &R
    where
        F: FnOnce(&[T]) -> R,
    {
        if self.source != Some(dataset.id()) {
            self.value = None;
        }
        self.source = Some(dataset.id());
        self.value.get_or_insert_with(|| compute(dataset.rows()))
    }
}

/// What a panel shows.
#[derive(Debug)]
pub enum LoadState<T> {
    Loading,
    /// Fetch or parse failed; shown as a blocking error with a retry action.
    Failed(LoadError),
    /// Loaded fine but nothing survived normalization.
    Empty,
    Ready(Dataset<T>),
}

// Cloning shares the dataset rows, so `T` need not be `Clone`.
impl<T> Clone for LoadState<T> {
    fn clone(&self) -> Self {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Failed(e) => LoadState::Failed(e.clone()),
            LoadState::Empty => LoadState::Empty,
            LoadState::Ready(d) => LoadState::Ready(d.clone()),
        }
    }
}

impl<T> LoadState<T> {
    pub fn dataset(&self) -> Option<&Dataset<T>> {
        match self {
            LoadState::Ready(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Turns a parse outcome into a panel state.
///
/// Errors alongside usable rows are logged and otherwise ignored; errors with
/// no rows at all fail the load.
pub fn settle<T: Normalize>(outcome: ParseOutcome) -> LoadState<T> {
    if !outcome.errors.is_empty() {
        if outcome.data.is_empty() {
            return LoadState::Failed(LoadError::Parse(outcome.error_summary()));
        }
        warn!(
            errors = outcome.errors.len(),
            details = %outcome.error_summary(),
            "Parse errors in dataset"
        );
    }

    let records: Vec<T> = normalize(&outcome.data);
    if records.is_empty() {
        info!(raw_rows = outcome.data.len(), "No records after normalization");
        return LoadState::Empty;
    }

    LoadState::Ready(Dataset::new(records))
}

/// Fetches, parses and normalizes the dataset at `location`.
#[tracing::instrument(skip(client))]
pub async fn load<T, C>(client: &C, location: &str) -> LoadState<T>
where
    T: Normalize,
    C: HttpClient,
{
    let bytes = match load_source(client, location).await {
        Ok(b) => b,
        Err(e) => return LoadState::Failed(e),
    };

    let text = String::from_utf8_lossy(&bytes);
    settle(parse(&text, Format::detect(location)))
}

/// Owns the load state of one dashboard for as long as it is shown.
///
/// Loads run on the tokio runtime and hold only a weak reference to the
/// state. Once the panel is dropped, a late result is discarded.
pub struct Panel<T> {
    location: String,
    state: Arc<Mutex<LoadState<T>>>,
}

impl<T> Panel<T>
where
    T: Normalize + Send + Sync + 'static,
{
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            state: Arc::new(Mutex::new(LoadState::Loading)),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LoadState<T> {
        lock(&self.state).clone()
    }

    /// Starts loading; the returned handle completes once the state is set
    /// (or the result was discarded).
    pub fn spawn_load<C>(&self, client: Arc<C>) -> JoinHandle<()>
    where
        C: HttpClient + 'static,
    {
        *lock(&self.state) = LoadState::Loading;

        let state: Weak<Mutex<LoadState<T>>> = Arc::downgrade(&self.state);
        let location = self.location.clone();

        tokio::spawn(async move {
            let result = load::<T, C>(client.as_ref(), &location).await;

            match state.upgrade() {
                Some(state) => *lock(&state) = result,
                None => debug!(location = %location, "Panel dropped before load finished"),
            }
        })
    }

    /// Re-runs the load, typically after a failure.
    pub fn retry<C>(&self, client: Arc<C>) -> JoinHandle<()>
    where
        C: HttpClient + 'static,
    {
        info!(location = %self.location, "Retrying dataset load");
        self.spawn_load(client)
    }
}

fn lock<T>(state: &Mutex<LoadState<T>>) -> MutexGuard<'_, LoadState<T>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
