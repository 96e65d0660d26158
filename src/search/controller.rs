//! Search bar controller: debouncer + result session + selector, plus the
//! commit protocol and mount lifecycle.
//!
//! The controller never performs I/O. Every side effect it wants (a lookup, a
//! signature resolution, navigation, recording a recent search) is returned as
//! an [`Effect`] for the host to carry out, and asynchronous results come back
//! through [`SearchBar::complete_lookup`] / [`SearchBar::complete_resolution`].

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::debounce::Debouncer;
use super::selector::{self, NavEvent, Selection};
use super::session::{Completion, LookupTicket, SearchSession};
use crate::api::LookupError;
use crate::config::ClientConfig;
use crate::model::types::Candidate;

/// A pending secondary resolution for a committed candidate without signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTicket {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Lookup(LookupTicket),
    Resolve(ResolveTicket),
    Navigate(String),
    RecordRecent(String),
}

/// How the controller reacted to a navigation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    Ignored,
    Highlighted(Option<usize>),
    Dismissed,
    Committed(Vec<Effect>),
}

#[derive(Debug)]
pub struct SearchBar {
    session: SearchSession,
    debouncer: Debouncer,
    limit: usize,
    committing: Option<u64>,
    next_resolve_id: u64,
    input_focused: bool,
    mounted: bool,
}

impl SearchBar {
    pub fn new(debounce: Duration, limit: usize) -> Self {
        Self {
            session: SearchSession::new(),
            debouncer: Debouncer::new(debounce),
            limit,
            committing: None,
            next_resolve_id: 0,
            input_focused: true,
            mounted: true,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.debounce, config.search_limit)
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn query(&self) -> &str {
        self.session.query()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn focus_input(&mut self) {
        self.input_focused = true;
    }

    /// True while a signature resolution for a commit is outstanding.
    pub fn is_committing(&self) -> bool {
        self.committing.is_some()
    }

    /// When the pending debounced lookup becomes due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Replace the query text. A blank query clears results synchronously;
    /// anything else restarts the settle window.
    pub fn set_query(&mut self, query: impl Into<String>, now: Instant) {
        if !self.mounted {
            return;
        }
        let query = query.into();
        let blank = query.trim().is_empty();
        self.session.set_query(query);
        self.input_focused = true;
        if blank {
            self.debouncer.cancel();
            self.session.clear_results();
        } else {
            self.debouncer.schedule(now);
        }
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        let mut query = self.session.query().to_string();
        query.push(c);
        self.set_query(query, now);
    }

    pub fn pop_char(&mut self, now: Instant) {
        let mut query = self.session.query().to_string();
        query.pop();
        self.set_query(query, now);
    }

    /// Explicit clear (the "x" button): same as typing the field empty.
    pub fn clear(&mut self, now: Instant) {
        self.set_query(String::new(), now);
    }

    /// Advance time. Returns the lookup to dispatch once input has settled.
    pub fn tick(&mut self, now: Instant) -> Option<Effect> {
        if !self.mounted || !self.debouncer.fire(now) {
            return None;
        }
        if self.session.query().trim().is_empty() {
            return None;
        }
        Some(Effect::Lookup(self.session.issue_lookup(self.limit)))
    }

    pub fn complete_lookup(
        &mut self,
        generation: u64,
        result: Result<Vec<Candidate>, LookupError>,
    ) -> Completion {
        if !self.mounted {
            return Completion::Stale;
        }
        self.session.complete_lookup(generation, result)
    }

    pub fn handle(&mut self, event: NavEvent) -> Handled {
        if !self.mounted {
            return Handled::Ignored;
        }
        let selection = selector::step(
            event,
            self.session.highlighted(),
            self.session.candidates().len(),
            self.session.panel_open(),
        );
        match selection {
            Selection::Ignored => Handled::Ignored,
            Selection::Highlight(h) => {
                self.session.set_highlighted(h);
                Handled::Highlighted(h)
            }
            Selection::Dismiss { blur } => {
                self.session.dismiss();
                if blur {
                    self.input_focused = false;
                }
                Handled::Dismissed
            }
            Selection::Commit(index) => self.commit(index),
        }
    }

    fn commit(&mut self, index: usize) -> Handled {
        if let Some(id) = self.committing {
            debug!(pending = id, "commit ignored: resolution still pending");
            return Handled::Ignored;
        }
        let Some(candidate) = self.session.candidates().get(index).cloned() else {
            return Handled::Ignored;
        };

        let typed = self.session.query().trim();
        let recent = if typed.is_empty() {
            candidate.display_name.clone()
        } else {
            typed.to_string()
        };
        let mut effects = vec![Effect::RecordRecent(recent)];

        match candidate.usable_signature() {
            Some(signature) => {
                info!(name = %candidate.display_name, signature, "commit");
                effects.push(Effect::Navigate(signature.to_string()));
            }
            None => {
                self.next_resolve_id += 1;
                let id = self.next_resolve_id;
                self.committing = Some(id);
                info!(name = %candidate.display_name, id, "commit needs signature resolution");
                effects.push(Effect::Resolve(ResolveTicket {
                    id,
                    name: candidate.display_name.clone(),
                }));
            }
        }

        self.debouncer.cancel();
        self.session.reset();
        Handled::Committed(effects)
    }

    /// Finish a pending resolution. Yields the navigation to perform, if the
    /// resolution produced a usable signature and the bar is still mounted.
    pub fn complete_resolution(
        &mut self,
        id: u64,
        result: Result<Option<Candidate>, LookupError>,
    ) -> Option<Effect> {
        if !self.mounted || self.committing != Some(id) {
            debug!(id, "discarding stale resolution");
            return None;
        }
        self.committing = None;
        match result {
            Ok(Some(candidate)) => match candidate.usable_signature() {
                Some(signature) => Some(Effect::Navigate(signature.to_string())),
                None => {
                    debug!(id, name = %candidate.display_name, "resolution miss: no signature");
                    None
                }
            },
            Ok(None) => {
                debug!(id, "resolution miss: no match");
                None
            }
            Err(err) => {
                warn!(id, "resolution failed: {err}");
                None
            }
        }
    }

    /// Tear down: no timer, lookup or resolution may touch state afterwards.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.debouncer.cancel();
        self.session.invalidate();
        self.committing = None;
        debug!("search bar unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTLE: Duration = Duration::from_millis(200);

    fn bar() -> SearchBar {
        SearchBar::new(SETTLE, 8)
    }

    fn lookup_ticket(effect: Option<Effect>) -> LookupTicket {
        match effect {
            Some(Effect::Lookup(t)) => t,
            other => panic!("expected lookup, got {other:?}"),
        }
    }

    fn loaded(candidates: Vec<Candidate>) -> SearchBar {
        let t0 = Instant::now();
        let mut b = bar();
        b.set_query("par", t0);
        let t = lookup_ticket(b.tick(t0 + SETTLE));
        b.complete_lookup(t.generation, Ok(candidates));
        b
    }

    #[test]
    fn rapid_edits_issue_one_lookup_for_final_query() {
        let t0 = Instant::now();
        let mut b = bar();
        b.push_char('a', t0);
        b.push_char('u', t0 + Duration::from_millis(80));
        assert!(b.tick(t0 + Duration::from_millis(150)).is_none());
        b.push_char('g', t0 + Duration::from_millis(160));
        assert!(b.tick(t0 + Duration::from_millis(300)).is_none());
        let t = lookup_ticket(b.tick(t0 + Duration::from_millis(360)));
        assert_eq!(t.query, "aug");
        assert!(b.tick(t0 + Duration::from_millis(900)).is_none());
    }

    #[test]
    fn whitespace_query_never_looks_up() {
        let t0 = Instant::now();
        let mut b = bar();
        b.set_query("   ", t0);
        assert!(b.tick(t0 + SETTLE * 3).is_none());
        assert!(!b.session().panel_open());
    }

    #[test]
    fn commit_without_signature_blocks_reentry() {
        let mut b = loaded(vec![Candidate::new("Paracetamol"), Candidate::new("Dolo")]);
        b.handle(NavEvent::Down);
        let Handled::Committed(effects) = b.handle(NavEvent::Enter) else {
            panic!("expected commit");
        };
        assert!(b.is_committing());
        assert!(matches!(effects.last(), Some(Effect::Resolve(t)) if t.name == "Paracetamol"));

        // A new result list arrives while resolution is pending.
        let t0 = Instant::now();
        b.set_query("dolo", t0);
        let t = lookup_ticket(b.tick(t0 + SETTLE));
        b.complete_lookup(t.generation, Ok(vec![Candidate::new("Dolo").with_signature("S1")]));
        assert_eq!(b.handle(NavEvent::Click(0)), Handled::Ignored);
    }

    #[test]
    fn resolution_for_other_ticket_is_ignored() {
        let mut b = loaded(vec![Candidate::new("Paracetamol")]);
        b.handle(NavEvent::Click(0));
        let hit = Candidate::new("Paracetamol").with_signature("SIG999");
        assert!(b.complete_resolution(42, Ok(Some(hit.clone()))).is_none());
        assert!(b.is_committing());
        assert_eq!(
            b.complete_resolution(1, Ok(Some(hit))),
            Some(Effect::Navigate("SIG999".into()))
        );
        assert!(!b.is_committing());
    }

    #[test]
    fn failed_resolution_releases_commit_guard() {
        let mut b = loaded(vec![Candidate::new("Paracetamol")]);
        b.handle(NavEvent::Click(0));
        let err = LookupError::Status {
            url: "http://api/resolve".into(),
            status: 500,
        };
        assert!(b.complete_resolution(1, Err(err)).is_none());
        assert!(!b.is_committing());
    }

    #[test]
    fn recent_falls_back_to_display_name() {
        let t0 = Instant::now();
        let mut b = loaded(vec![Candidate::new("Augmentin").with_signature("AMX")]);
        // Field emptied after results arrived would normally close the list;
        // a click can still land on a row rendered in the same frame.
        b.session.set_query(String::new());
        let Handled::Committed(effects) = b.handle(NavEvent::Click(0)) else {
            panic!("expected commit");
        };
        assert_eq!(effects[0], Effect::RecordRecent("Augmentin".into()));
        assert!(b.tick(t0 + SETTLE * 5).is_none());
    }

    #[test]
    fn unmount_is_terminal() {
        let t0 = Instant::now();
        let mut b = bar();
        b.unmount();
        b.set_query("crocin", t0);
        assert!(b.tick(t0 + SETTLE).is_none());
        assert_eq!(b.handle(NavEvent::Down), Handled::Ignored);
        assert!(b.query().is_empty());
    }
}
