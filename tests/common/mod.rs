#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use playwright_suite::bridge::{
    BridgeError, BrowserDriver, Download, ElementAction, ElementState, LoadState,
};
use playwright_suite::interaction::{Steps, Utility};
use playwright_suite::locator::{ElementQuery, PageId};
use playwright_suite::reporter::{PlanSuite, SyncError, SyncOutcome, TestPlanApi};
use serde_json::{json, Value};
use tempfile::TempDir;

pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

pub fn write_file(dir: &Path, filename: &str, content: &str) {
    std::fs::write(dir.join(filename), content).expect("Failed to write test file");
}

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub visible: bool,
    pub text: String,
    pub value: String,
}

impl FakeElement {
    pub fn visible(text: &str) -> Self {
        Self {
            visible: true,
            text: text.to_string(),
            value: String::new(),
        }
    }

    pub fn hidden(text: &str) -> Self {
        Self {
            visible: false,
            text: text.to_string(),
            value: String::new(),
        }
    }
}

/// In-memory page: elements keyed by selector, frames ignored
#[derive(Default)]
pub struct FakeDriver {
    elements: Mutex<HashMap<String, Vec<FakeElement>>>,
    actions: Mutex<Vec<(ElementQuery, ElementAction)>>,
    load_waits: Mutex<Vec<LoadState>>,
    failing_load_states: Mutex<Vec<LoadState>>,
    pages_opened: AtomicUsize,
    pages_closed: AtomicUsize,
}

impl FakeDriver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_elements(self: Arc<Self>, selector: &str, elements: Vec<FakeElement>) -> Arc<Self> {
        self.set_elements(selector, elements);
        self
    }

    pub fn set_elements(&self, selector: &str, elements: Vec<FakeElement>) {
        self.elements
            .lock()
            .unwrap()
            .insert(selector.to_string(), elements);
    }

    /// Make `wait_for_load_state(state)` time out
    pub fn fail_load_state(&self, state: LoadState) {
        self.failing_load_states.lock().unwrap().push(state);
    }

    pub fn actions(&self) -> Vec<(ElementQuery, ElementAction)> {
        self.actions.lock().unwrap().clone()
    }

    pub fn load_waits(&self) -> Vec<LoadState> {
        self.load_waits.lock().unwrap().clone()
    }

    pub fn pages_opened(&self) -> usize {
        self.pages_opened.load(Ordering::SeqCst)
    }

    pub fn pages_closed(&self) -> usize {
        self.pages_closed.load(Ordering::SeqCst)
    }

    pub fn utility(self: &Arc<Self>) -> Utility {
        Utility::new(self.clone(), PageId::new("page-1"), Steps::detached())
    }

    fn matches(&self, query: &ElementQuery) -> Vec<FakeElement> {
        self.elements
            .lock()
            .unwrap()
            .get(&query.selector)
            .map(|all| {
                all.iter()
                    .filter(|e| !query.visible_only || e.visible)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn element(&self, query: &ElementQuery) -> Option<FakeElement> {
        self.matches(query).get(query.nth.unwrap_or(0)).cloned()
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn new_page(&self) -> Result<PageId, BridgeError> {
        let n = self.pages_opened.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PageId::new(format!("page-{}", n)))
    }

    async fn close_page(&self, _page: &PageId) -> Result<(), BridgeError> {
        self.pages_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn goto(&self, _page: &PageId, _url: &str) -> Result<(), BridgeError> {
        Ok(())
    }

    async fn url(&self, _page: &PageId) -> Result<String, BridgeError> {
        Ok("about:blank".to_string())
    }

    async fn title(&self, _page: &PageId) -> Result<String, BridgeError> {
        Ok(String::new())
    }

    async fn wait_for_load_state(
        &self,
        _page: &PageId,
        state: LoadState,
        _timeout_ms: Option<u64>,
    ) -> Result<(), BridgeError> {
        self.load_waits.lock().unwrap().push(state);
        if self.failing_load_states.lock().unwrap().contains(&state) {
            return Err(BridgeError::Timeout(format!(
                "waitForLoadState {}",
                state.as_str()
            )));
        }
        Ok(())
    }

    async fn wait_for_timeout(&self, _page: &PageId, _ms: u64) -> Result<(), BridgeError> {
        Ok(())
    }

    async fn count(&self, query: &ElementQuery) -> Result<usize, BridgeError> {
        Ok(self.matches(query).len())
    }

    async fn wait_for(
        &self,
        query: &ElementQuery,
        state: ElementState,
        _timeout_ms: u64,
    ) -> Result<(), BridgeError> {
        let element = self.element(query);
        let reached = match state {
            ElementState::Attached => element.is_some(),
            ElementState::Detached => element.is_none(),
            ElementState::Visible => element.map(|e| e.visible).unwrap_or(false),
            ElementState::Hidden => element.map(|e| !e.visible).unwrap_or(true),
        };
        if reached {
            Ok(())
        } else {
            Err(BridgeError::Timeout(format!("locator.waitFor {}", query)))
        }
    }

    async fn perform(
        &self,
        query: &ElementQuery,
        action: &ElementAction,
    ) -> Result<Value, BridgeError> {
        let element = self
            .element(query)
            .ok_or_else(|| BridgeError::Timeout(format!("{} on {}", action.name(), query)))?;
        self.actions
            .lock()
            .unwrap()
            .push((query.clone(), action.clone()));

        let value = match action {
            ElementAction::InnerText => json!(element.text),
            ElementAction::AllTextContents => {
                json!(self
                    .matches(query)
                    .iter()
                    .map(|e| e.text.clone())
                    .collect::<Vec<_>>())
            }
            ElementAction::InputValue => json!(element.value),
            ElementAction::IsVisible => json!(element.visible),
            ElementAction::Fill { text } => {
                let mut elements = self.elements.lock().unwrap();
                if let Some(e) = elements
                    .get_mut(&query.selector)
                    .and_then(|all| all.get_mut(query.nth.unwrap_or(0)))
                {
                    e.value = text.clone();
                }
                Value::Null
            }
            _ => Value::Null,
        };
        Ok(value)
    }

    async fn keyboard_press(&self, _page: &PageId, _key: &str) -> Result<(), BridgeError> {
        Ok(())
    }

    async fn keyboard_type(
        &self,
        _page: &PageId,
        _text: &str,
        _delay_ms: u64,
    ) -> Result<(), BridgeError> {
        Ok(())
    }

    async fn drag_and_drop(
        &self,
        _source: &ElementQuery,
        _target: &ElementQuery,
        _force: bool,
    ) -> Result<(), BridgeError> {
        Ok(())
    }

    async fn wait_for_popup(
        &self,
        _page: &PageId,
        _timeout_ms: u64,
    ) -> Result<PageId, BridgeError> {
        Ok(PageId::new("popup-1"))
    }

    async fn wait_for_download(
        &self,
        _page: &PageId,
        _timeout_ms: u64,
    ) -> Result<Download, BridgeError> {
        Ok(Download {
            download_id: "download-1".to_string(),
            suggested_filename: "report.csv".to_string(),
        })
    }

    async fn save_download(&self, _download: &Download, _path: &Path) -> Result<(), BridgeError> {
        Ok(())
    }

    async fn wait_for_response(
        &self,
        _page: &PageId,
        _url_glob: &str,
        _timeout_ms: u64,
    ) -> Result<u16, BridgeError> {
        Ok(200)
    }

    async fn clear_cache(&self, _page: &PageId) -> Result<(), BridgeError> {
        Ok(())
    }
}

/// Test plan API where every case sits in `suites_per_case` suites, each with one point
pub struct FakeTestPlanApi {
    pub suites_per_case: u64,
    pub fail_suites_for: Vec<u64>,
    pub suite_calls: Mutex<Vec<u64>>,
    pub point_calls: AtomicUsize,
    pub updates: Mutex<Vec<(u64, SyncOutcome)>>,
}

impl FakeTestPlanApi {
    pub fn new(suites_per_case: u64) -> Arc<Self> {
        Arc::new(Self {
            suites_per_case,
            fail_suites_for: Vec::new(),
            suite_calls: Mutex::new(Vec::new()),
            point_calls: AtomicUsize::new(0),
            updates: Mutex::new(Vec::new()),
        })
    }

    pub fn failing_for(suites_per_case: u64, case_ids: Vec<u64>) -> Arc<Self> {
        Arc::new(Self {
            suites_per_case,
            fail_suites_for: case_ids,
            suite_calls: Mutex::new(Vec::new()),
            point_calls: AtomicUsize::new(0),
            updates: Mutex::new(Vec::new()),
        })
    }

    pub fn suite_calls(&self) -> Vec<u64> {
        let mut calls = self.suite_calls.lock().unwrap().clone();
        calls.sort_unstable();
        calls
    }

    pub fn updates(&self) -> Vec<(u64, SyncOutcome)> {
        let mut updates = self.updates.lock().unwrap().clone();
        updates.sort_by_key(|(point, _)| *point);
        updates
    }
}

#[async_trait]
impl TestPlanApi for FakeTestPlanApi {
    async fn suites_for_case(&self, case_id: u64) -> Result<Vec<PlanSuite>, SyncError> {
        self.suite_calls.lock().unwrap().push(case_id);
        if self.fail_suites_for.contains(&case_id) {
            return Err(SyncError::Status {
                call: "suites".to_string(),
                status: 500,
            });
        }
        Ok((0..self.suites_per_case)
            .map(|i| PlanSuite {
                plan_id: 10,
                suite_id: case_id * 100 + i,
            })
            .collect())
    }

    async fn test_point(&self, suite: PlanSuite, _case_id: u64) -> Result<Option<u64>, SyncError> {
        self.point_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(suite.suite_id))
    }

    async fn update_outcome(
        &self,
        _suite: PlanSuite,
        point_id: u64,
        outcome: SyncOutcome,
    ) -> Result<(), SyncError> {
        self.updates.lock().unwrap().push((point_id, outcome));
        Ok(())
    }
}
