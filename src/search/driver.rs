//! Async driver for the search bar.
//!
//! Executes the controller's effects: lookups and resolutions run as tokio
//! tasks against a [`Catalog`], and their results are posted back over an
//! mpsc channel. Results are applied only by whoever owns the driver (the TUI
//! event loop, a test), so the session is never mutated from two places.

use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

use super::controller::{Effect, Handled, ResolveTicket, SearchBar};
use super::selector::NavEvent;
use super::session::LookupTicket;
use crate::api::{Catalog, LookupError};
use crate::model::types::Candidate;

/// Routing hand-off for a committed signature. Fire-and-forget.
pub trait Navigator {
    fn navigate(&mut self, signature: &str);
}

/// Best-effort store for committed queries.
pub trait RecentSink {
    fn record_recent(&mut self, query: &str) -> anyhow::Result<()>;
}

/// Navigator that just remembers where it was sent.
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    pub visited: Vec<String>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, signature: &str) {
        self.visited.push(signature.to_string());
    }
}

/// Recent sink for hosts that do not keep history.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRecent;

impl RecentSink for NoRecent {
    fn record_recent(&mut self, _query: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

enum Message {
    Lookup {
        generation: u64,
        result: Result<Vec<Candidate>, LookupError>,
    },
    Resolution {
        id: u64,
        result: Result<Option<Candidate>, LookupError>,
    },
}

pub struct SearchDriver<C, N, R> {
    bar: SearchBar,
    catalog: Arc<C>,
    navigator: N,
    recent: R,
    runtime: Handle,
    tx: UnboundedSender<Message>,
    rx: UnboundedReceiver<Message>,
}

impl<C, N, R> SearchDriver<C, N, R>
where
    C: Catalog,
    N: Navigator,
    R: RecentSink,
{
    pub fn new(bar: SearchBar, catalog: Arc<C>, navigator: N, recent: R, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            bar,
            catalog,
            navigator,
            recent,
            runtime,
            tx,
            rx,
        }
    }

    pub fn bar(&self) -> &SearchBar {
        &self.bar
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn recent(&self) -> &R {
        &self.recent
    }

    pub fn set_query(&mut self, query: impl Into<String>, now: Instant) {
        self.bar.set_query(query, now);
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        self.bar.push_char(c, now);
    }

    pub fn pop_char(&mut self, now: Instant) {
        self.bar.pop_char(now);
    }

    pub fn clear(&mut self, now: Instant) {
        self.bar.clear(now);
    }

    pub fn focus_input(&mut self) {
        self.bar.focus_input();
    }

    /// Fire the debounced lookup if due. Returns true when one was dispatched.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.bar.tick(now) {
            Some(effect) => {
                self.run(effect);
                true
            }
            None => false,
        }
    }

    pub fn handle(&mut self, event: NavEvent) -> Handled {
        let handled = self.bar.handle(event);
        if let Handled::Committed(effects) = &handled {
            for effect in effects.clone() {
                self.run(effect);
            }
        }
        handled
    }

    /// Apply every completion that has already arrived. Non-blocking.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion and apply it. Returns false once the
    /// driver has been unmounted and nothing more can arrive.
    pub async fn next_completion(&mut self) -> bool {
        match self.rx.recv().await {
            Some(message) => {
                self.apply(message);
                true
            }
            None => false,
        }
    }

    pub fn unmount(&mut self) {
        self.bar.unmount();
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }

    fn apply(&mut self, message: Message) {
        match message {
            Message::Lookup { generation, result } => {
                self.bar.complete_lookup(generation, result);
            }
            Message::Resolution { id, result } => {
                if let Some(effect) = self.bar.complete_resolution(id, result) {
                    self.run(effect);
                }
            }
        }
    }

    fn run(&mut self, effect: Effect) {
        if !self.bar.is_mounted() {
            return;
        }
        match effect {
            Effect::Lookup(ticket) => self.spawn_lookup(ticket),
            Effect::Resolve(ticket) => self.spawn_resolve(ticket),
            Effect::Navigate(signature) => self.navigator.navigate(&signature),
            Effect::RecordRecent(query) => {
                if let Err(e) = self.recent.record_recent(&query) {
                    warn!("recording recent search failed: {e:#}");
                }
            }
        }
    }

    fn spawn_lookup(&self, ticket: LookupTicket) {
        let catalog = Arc::clone(&self.catalog);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = catalog.lookup(&ticket.query, ticket.limit).await;
            let _ = tx.send(Message::Lookup {
                generation: ticket.generation,
                result,
            });
        });
    }

    fn spawn_resolve(&self, ticket: ResolveTicket) {
        let catalog = Arc::clone(&self.catalog);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = catalog.resolve_signature(&ticket.name).await;
            let _ = tx.send(Message::Resolution {
                id: ticket.id,
                result,
            });
        });
    }
}
