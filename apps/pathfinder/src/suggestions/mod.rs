use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::api_client::SuggestionSource;
use crate::chips::{AddOutcome, ChipCollection, ChipKind};

pub mod debounce;

use debounce::{Debouncer, Settle};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(220);
pub const LOCAL_LIMIT: usize = 15;
pub const PREVIEW_LIMIT: usize = 10;

/// Search box feeding one chip collection: local filter over the cached master
/// list first, remote search only when nothing local matches.
#[derive(Debug, Clone)]
pub struct SuggestionSearch {
    kind: ChipKind,
    master: Arc<[String]>,
    input: String,
    shown: Vec<String>,
    debouncer: Debouncer,
}

impl SuggestionSearch {
    pub fn new(kind: ChipKind, delay: Duration) -> Self {
        Self {
            kind,
            master: Arc::from(Vec::new()),
            input: String::new(),
            shown: Vec::new(),
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn kind(&self) -> ChipKind {
        self.kind
    }

    /// Fetches the master list. A failure leaves an empty cache.
    pub async fn load_master(&mut self, source: &dyn SuggestionSource) {
        match source.master_list(self.kind).await {
            Ok(items) => {
                debug!("Loaded {} {} suggestions", items.len(), self.kind);
                self.set_master(items);
            }
            Err(e) => {
                warn!("Could not load {} suggestions: {e}", self.kind);
                self.set_master(Vec::new());
            }
        }
    }

    pub fn set_master(&mut self, items: Vec<String>) {
        self.master = Arc::from(items);
        self.shown = self.preview();
    }

    pub fn master(&self) -> &[String] {
        &self.master
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn shown(&self) -> &[String] {
        &self.shown
    }

    pub fn preview(&self) -> Vec<String> {
        preview(&self.master)
    }

    /// Case-insensitive substring match over the cached list.
    pub fn filter_local(&self, query: &str) -> Vec<String> {
        filter_local(&self.master, query)
    }

    /// Resolves a query without debouncing.
    pub async fn lookup(&self, source: &dyn SuggestionSource, query: &str) -> Vec<String> {
        resolve_query(self.kind, &self.master, source, query).await
    }

    /// A keystroke. Takes a debounce ticket now and hands back the lookup to await;
    /// a later keystroke on this box supersedes it.
    pub fn on_input(&mut self, source: Arc<dyn SuggestionSource>, query: &str) -> PendingLookup {
        self.input = query.to_string();
        PendingLookup {
            kind: self.kind,
            query: self.input.clone(),
            master: self.master.clone(),
            source,
            ticket: self.debouncer.ticket(),
            debouncer: self.debouncer.clone(),
        }
    }

    /// Replaces the visible list with a settled lookup's results.
    pub fn show(&mut self, results: Vec<String>) {
        self.shown = results;
    }

    /// Adds a suggestion to `chips`, clears the input and re-shows the preview.
    pub fn pick(&mut self, item: &str, chips: &mut ChipCollection) -> AddOutcome {
        let outcome = chips.add(item, self.kind.cap());
        self.reset();
        outcome
    }

    /// Adds whatever was typed, verbatim.
    pub fn commit(&mut self, chips: &mut ChipCollection) -> AddOutcome {
        let typed = std::mem::take(&mut self.input);
        let outcome = chips.add(&typed, self.kind.cap());
        self.reset();
        outcome
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    fn reset(&mut self) {
        self.input.clear();
        self.shown = self.preview();
    }
}

/// A debounced lookup detached from its search box, so further keystrokes can
/// arrive while it waits.
pub struct PendingLookup {
    kind: ChipKind,
    query: String,
    master: Arc<[String]>,
    source: Arc<dyn SuggestionSource>,
    debouncer: Debouncer,
    ticket: u64,
}

impl PendingLookup {
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Waits out the delay. `None` when a newer keystroke took a ticket meanwhile;
    /// no request is made in that case.
    pub async fn resolve(self) -> Option<Vec<String>> {
        if self.debouncer.settle(self.ticket).await == Settle::Superseded {
            debug!("search-{} for '{}' superseded", self.kind, self.query);
            return None;
        }
        Some(resolve_query(self.kind, &self.master, self.source.as_ref(), &self.query).await)
    }
}

fn preview(master: &[String]) -> Vec<String> {
    master.iter().take(PREVIEW_LIMIT).cloned().collect()
}

fn filter_local(master: &[String], query: &str) -> Vec<String> {
    let needle = query.to_lowercase();
    master
        .iter()
        .filter(|s| s.to_lowercase().contains(&needle))
        .take(LOCAL_LIMIT)
        .cloned()
        .collect()
}

async fn resolve_query(
    kind: ChipKind,
    master: &[String],
    source: &dyn SuggestionSource,
    query: &str,
) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return preview(master);
    }

    let local = filter_local(master, query);
    if !local.is_empty() {
        return local;
    }

    if kind.search_path().is_none() {
        return Vec::new();
    }

    match source.search(kind, query).await {
        Ok(results) => results,
        Err(e) => {
            warn!("search-{kind} failed for '{query}': {e}");
            Vec::new()
        }
    }
}
