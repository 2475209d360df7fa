// Dashboard session store - shared filter/data state for one dashboard view

use crate::domain::filters::{FilterState, ViewMode};
use crate::domain::market::DataRow;
use std::sync::Mutex;

/// Notifications emitted on every store mutation so consumers re-derive
/// their views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    FiltersChanged,
    DataReplaced,
    LoadingChanged(bool),
}

type Listener = Box<dyn Fn(SessionEvent) + Send + Sync>;

struct SessionState {
    filters: FilterState,
    view_mode: ViewMode,
    data: Option<Vec<DataRow>>,
    loading: bool,
    /// Monotonic fetch counter. Responses carrying an older sequence than
    /// the latest issued one are discarded instead of overwriting newer
    /// data.
    latest_fetch: u64,
}

/// Single shared store per dashboard session, passed by reference to every
/// consumer. Explicit object instead of ambient context; subscribers are
/// notified on mutation.
pub struct DashboardSession {
    state: Mutex<SessionState>,
    listeners: Mutex<Vec<Listener>>,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardSession {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SessionState {
                filters: FilterState::default(),
                view_mode: ViewMode::default(),
                data: None,
                loading: false,
                latest_fetch: 0,
            }),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, listener: Listener) {
        self.listeners.lock().unwrap().push(listener);
    }

    fn notify(&self, event: SessionEvent) {
        for listener in self.listeners.lock().unwrap().iter() {
            listener(event);
        }
    }

    pub fn filters(&self) -> FilterState {
        self.state.lock().unwrap().filters.clone()
    }

    /// Apply a mutation to the filter state. The whole state is replaced
    /// under one lock, so concurrent setters never interleave fields.
    pub fn update_filters(&self, mutate: impl FnOnce(&mut FilterState)) {
        {
            let mut state = self.state.lock().unwrap();
            let mut filters = state.filters.clone();
            mutate(&mut filters);
            state.filters = filters;
        }
        self.notify(SessionEvent::FiltersChanged);
    }

    pub fn set_metric(&self, metric: &str) {
        self.update_filters(|f| f.metric = metric.to_string());
    }

    pub fn set_industry(&self, industry: &str) {
        self.update_filters(|f| f.industry = industry.to_string());
    }

    pub fn view_mode(&self) -> ViewMode {
        self.state.lock().unwrap().view_mode
    }

    pub fn set_view_mode(&self, mode: ViewMode) {
        self.state.lock().unwrap().view_mode = mode;
        self.notify(SessionEvent::FiltersChanged);
    }

    pub fn data(&self) -> Option<Vec<DataRow>> {
        self.state.lock().unwrap().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    /// Replace the shared data outside the fetch path (the chat console's
    /// data_context push).
    pub fn replace_data(&self, rows: Vec<DataRow>) {
        self.state.lock().unwrap().data = Some(rows);
        self.notify(SessionEvent::DataReplaced);
    }

    /// Start a fetch: bumps the sequence counter and raises the loading
    /// flag. The returned token must be handed back to `complete_fetch`.
    pub fn begin_fetch(&self) -> u64 {
        let seq = {
            let mut state = self.state.lock().unwrap();
            state.latest_fetch += 1;
            state.loading = true;
            state.latest_fetch
        };
        self.notify(SessionEvent::LoadingChanged(true));
        seq
    }

    /// Finish a fetch. Stale completions (a newer fetch has started since)
    /// are dropped entirely: they neither store rows nor clear the loading
    /// flag. Returns whether the completion was applied. `None` rows means
    /// the fetch failed and the previous data stays in place.
    pub fn complete_fetch(&self, seq: u64, rows: Option<Vec<DataRow>>) -> bool {
        let (applied, replaced) = {
            let mut state = self.state.lock().unwrap();
            if seq < state.latest_fetch {
                (false, false)
            } else {
                let replaced = rows.is_some();
                if let Some(rows) = rows {
                    state.data = Some(rows);
                }
                state.loading = false;
                (true, replaced)
            }
        };
        if replaced {
            self.notify(SessionEvent::DataReplaced);
        }
        if applied {
            self.notify(SessionEvent::LoadingChanged(false));
        }
        applied
    }
}
