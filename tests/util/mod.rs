use medi_search::api::{Catalog, LookupError};
use medi_search::model::types::Candidate;
use medi_search::search::driver::{RecentSink, RecordingNavigator};
use medi_search::search::{SearchBar, SearchDriver};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[allow(dead_code)]
pub const SETTLE: Duration = Duration::from_millis(200);

/// Captures tracing output for tests.
#[allow(dead_code)]
pub struct TestTracing {
    buffer: Arc<Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl TestTracing {
    pub fn new() -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.buffer.clone();
        let make_writer = move || TestWriter(writer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn output(&self) -> String {
        let buf = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Assert that the captured log output contains the provided substring.
    pub fn assert_contains(&self, needle: &str) {
        let out = self.output();
        assert!(
            out.contains(needle),
            "expected logs to contain `{needle}`, got:\n{out}"
        );
    }
}

struct TestWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.0.lock().unwrap();
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[allow(dead_code)]
enum Scripted {
    Hits(Vec<Candidate>),
    Fail(u16),
}

/// In-memory catalog with per-query latency, for driving races under a
/// paused tokio clock.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeCatalog {
    lookups: HashMap<String, (Duration, Scripted)>,
    resolutions: HashMap<String, Option<Candidate>>,
    lookup_calls: Mutex<Vec<String>>,
    resolve_calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(mut self, query: &str, delay: Duration, hits: Vec<Candidate>) -> Self {
        self.lookups
            .insert(query.to_string(), (delay, Scripted::Hits(hits)));
        self
    }

    pub fn with_failure(mut self, query: &str, delay: Duration, status: u16) -> Self {
        self.lookups
            .insert(query.to_string(), (delay, Scripted::Fail(status)));
        self
    }

    pub fn with_resolution(mut self, name: &str, resolved: Option<Candidate>) -> Self {
        self.resolutions.insert(name.to_string(), resolved);
        self
    }

    pub fn lookup_calls(&self) -> Vec<String> {
        self.lookup_calls.lock().unwrap().clone()
    }

    pub fn resolve_calls(&self) -> Vec<String> {
        self.resolve_calls.lock().unwrap().clone()
    }
}

impl Catalog for FakeCatalog {
    async fn lookup(&self, query: &str, _limit: usize) -> Result<Vec<Candidate>, LookupError> {
        self.lookup_calls.lock().unwrap().push(query.to_string());
        let Some((delay, scripted)) = self.lookups.get(query) else {
            return Ok(Vec::new());
        };
        tokio::time::sleep(*delay).await;
        match scripted {
            Scripted::Hits(hits) => Ok(hits.clone()),
            Scripted::Fail(status) => Err(LookupError::Status {
                url: format!("fake://search?query={query}"),
                status: *status,
            }),
        }
    }

    async fn resolve_signature(&self, name: &str) -> Result<Option<Candidate>, LookupError> {
        self.resolve_calls.lock().unwrap().push(name.to_string());
        tokio::time::sleep(Duration::from_millis(30)).await;
        Ok(self.resolutions.get(name).cloned().flatten())
    }
}

/// Recent sink that keeps entries in memory.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct MemoryRecent {
    pub entries: Vec<String>,
}

impl RecentSink for MemoryRecent {
    fn record_recent(&mut self, query: &str) -> anyhow::Result<()> {
        self.entries.push(query.to_string());
        Ok(())
    }
}

/// Recent sink whose storage is always broken.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct BrokenRecent;

impl RecentSink for BrokenRecent {
    fn record_recent(&mut self, _query: &str) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }
}

#[allow(dead_code)]
pub fn driver<R: RecentSink>(
    catalog: Arc<FakeCatalog>,
    recent: R,
) -> SearchDriver<FakeCatalog, RecordingNavigator, R> {
    SearchDriver::new(
        SearchBar::new(SETTLE, 8),
        catalog,
        RecordingNavigator::default(),
        recent,
        tokio::runtime::Handle::current(),
    )
}

#[allow(dead_code)]
pub fn names(bar: &SearchBar) -> Vec<String> {
    bar.session()
        .candidates()
        .iter()
        .map(|c| c.display_name.clone())
        .collect()
}
