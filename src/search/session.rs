//! Result session: the single mutable record behind the search bar.
//!
//! Every lookup is stamped with a generation number when it is issued. A
//! completion is applied only if its stamp still equals the session's current
//! generation; anything older is stale and dropped without touching state.
//! Resets and teardown advance the generation too, which invalidates every
//! lookup still in flight.

use tracing::{debug, warn};

use crate::api::LookupError;
use crate::model::types::Candidate;

/// A lookup the session has committed to, waiting for its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub generation: u64,
    pub query: String,
    pub limit: usize,
}

/// What happened to a lookup response when it reached the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    query: String,
    candidates: Vec<Candidate>,
    panel_open: bool,
    highlighted: Option<usize>,
    loading: bool,
    generation: u64,
    last_error: Option<String>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted_candidate(&self) -> Option<&Candidate> {
        self.highlighted.and_then(|i| self.candidates.get(i))
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Message of the most recent failed lookup, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub(crate) fn set_query(&mut self, query: String) {
        self.query = query;
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: Option<usize>) {
        self.highlighted = highlighted;
    }

    /// Stamp a new lookup for the current query and open the panel so it can
    /// show a loading state before data arrives.
    pub fn issue_lookup(&mut self, limit: usize) -> LookupTicket {
        self.generation += 1;
        self.loading = true;
        self.panel_open = true;
        debug!(generation = self.generation, query = %self.query, "lookup issued");
        LookupTicket {
            generation: self.generation,
            query: self.query.clone(),
            limit,
        }
    }

    /// Apply a lookup response if it belongs to the current generation.
    ///
    /// Panel visibility is left alone: it was opened when the lookup was
    /// issued, and a dismissal since then must stick.
    pub fn complete_lookup(
        &mut self,
        generation: u64,
        result: Result<Vec<Candidate>, LookupError>,
    ) -> Completion {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "discarding stale lookup response"
            );
            return Completion::Stale;
        }

        self.loading = false;
        self.highlighted = None;
        match result {
            Ok(candidates) => {
                debug!(generation, hits = candidates.len(), "lookup applied");
                self.candidates = candidates;
                self.last_error = None;
            }
            Err(err) => {
                warn!(generation, "search error: {err}");
                self.candidates.clear();
                self.last_error = Some(err.to_string());
            }
        }
        Completion::Applied
    }

    /// Close the panel without touching data or in-flight bookkeeping.
    pub fn dismiss(&mut self) {
        self.panel_open = false;
        self.highlighted = None;
    }

    /// Empty the candidate list and close the panel, keeping the query text.
    /// Outstanding lookups are invalidated.
    pub fn clear_results(&mut self) {
        self.invalidate();
        self.candidates.clear();
        self.panel_open = false;
        self.highlighted = None;
        self.last_error = None;
    }

    /// Back to the freshly-mounted state (apart from the generation counter,
    /// which only ever moves forward).
    pub fn reset(&mut self) {
        self.clear_results();
        self.query.clear();
    }

    /// Make every outstanding lookup stale.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.loading = false;
    }
}
