use crate::config::DashboardConfig;
use crate::debounce::Debouncer;
use crate::errors::{AppError, AppResult};
use crate::filter::{Criteria, FilterEngine};
use crate::pagination::{paginate, Page, PageLabel, Pager, RecordRange};
use crate::record::Record;
use serde::Serialize;
use std::sync::Arc;
use tokio::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewPhase {
    Idle,
    Filtering,
    Paginating,
    Rendered,
}

#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub search_fields: Vec<String>,
    pub items_per_page: usize,
    pub page_size_options: Vec<usize>,
    pub search_debounce: Duration,
}

impl ViewConfig {
    pub fn from_dashboard(config: &DashboardConfig, search_fields: &[&str]) -> Self {
        Self {
            search_fields: search_fields.iter().map(|field| field.to_string()).collect(),
            items_per_page: config.default_page_size,
            page_size_options: config.page_size_options.clone(),
            search_debounce: config.search_debounce(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub criteria: Criteria,
    pub search_input: String,
    pub current_page: usize,
    pub items_per_page: usize,
    pub total_filtered_count: usize,
    pub total_pages: usize,
    pub phase: ViewPhase,
}

/// Filter → paginate pipeline for one table screen.
///
/// Category filters apply immediately. Free-text input is echoed at once but
/// only reaches the filter after the debounce quiet period, via
/// [`ViewController::settle`] or [`ViewController::poll_search`]. Any change
/// to criteria or source returns to page 1.
#[derive(Debug)]
pub struct ViewController<R: Record> {
    engine: FilterEngine,
    source: Arc<Vec<R>>,
    filtered: Arc<Vec<R>>,
    criteria: Criteria,
    search_input: String,
    search: Debouncer<String>,
    pager: Pager,
    page_size_options: Vec<usize>,
    phase: ViewPhase,
    last_pass: Vec<ViewPhase>,
    filter_runs: u64,
}

impl<R: Record> ViewController<R> {
    pub fn new(source: impl Into<Arc<Vec<R>>>, config: ViewConfig) -> Self {
        let mut view = Self {
            engine: FilterEngine::new(config.search_fields),
            source: source.into(),
            filtered: Arc::new(Vec::new()),
            criteria: Criteria::new(),
            search_input: String::new(),
            search: Debouncer::new(config.search_debounce),
            pager: Pager::new(config.items_per_page),
            page_size_options: config.page_size_options,
            phase: ViewPhase::Idle,
            last_pass: Vec::new(),
            filter_runs: 0,
        };
        view.refilter();
        view
    }

    pub fn source(&self) -> Arc<Vec<R>> {
        Arc::clone(&self.source)
    }

    pub fn filtered(&self) -> Arc<Vec<R>> {
        Arc::clone(&self.filtered)
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// The search text currently feeding the filter.
    pub fn active_query(&self) -> Option<&str> {
        self.criteria.text()
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    /// Phases walked by the most recent pass, starting at `Idle`. A page move
    /// skips `Filtering`.
    pub fn last_pass(&self) -> &[ViewPhase] {
        &self.last_pass
    }

    /// How many times the filter has been evaluated since mount, mount included.
    pub fn filter_runs(&self) -> u64 {
        self.filter_runs
    }

    pub fn is_search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn input_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.search_input.clone_from(&text);
        self.search.push(text);
    }

    /// Waits for the pending search text to settle. Returns `None` when
    /// nothing is pending; otherwise the settled text, not yet applied.
    pub async fn next_search(&mut self) -> Option<String> {
        self.search.settled().await
    }

    /// Feeds settled search text to the filter. Returns whether it changed.
    pub fn apply_search(&mut self, query: &str) -> bool {
        if !self.criteria.set_text(query) {
            return false;
        }
        self.refilter();
        true
    }

    /// Waits for the pending search text, if any, and applies it.
    pub async fn settle(&mut self) -> bool {
        match self.next_search().await {
            Some(query) => self.apply_search(&query),
            None => false,
        }
    }

    /// Applies the search text if its quiet period is already over.
    pub fn poll_search(&mut self) -> bool {
        match self.search.poll_ready() {
            Some(query) => self.apply_search(&query),
            None => false,
        }
    }

    /// Sets or clears (`None`, empty or `all`) one category filter.
    pub fn set_filter(&mut self, field: &str, value: Option<&str>) -> bool {
        if !self.criteria.set_equals(field, value) {
            return false;
        }
        self.refilter();
        true
    }

    pub fn clear_filters(&mut self) -> bool {
        self.search.cancel();
        self.search_input.clear();
        if !self.criteria.clear() {
            return false;
        }
        self.refilter();
        true
    }

    pub fn replace_source(&mut self, source: impl Into<Arc<Vec<R>>>) {
        self.source = source.into();
        self.refilter();
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        if !self.pager.go_to(page) {
            return false;
        }
        self.repaginate();
        true
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.pager.next();
        if moved {
            self.repaginate();
        }
        moved
    }

    pub fn previous_page(&mut self) -> bool {
        let moved = self.pager.previous();
        if moved {
            self.repaginate();
        }
        moved
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) -> AppResult<()> {
        if !self.page_size_options.contains(&items_per_page) {
            tracing::warn!(items_per_page, "rejected page size");
            return Err(AppError::Validation(format!(
                "Page size {} is not one of {:?}",
                items_per_page, self.page_size_options
            )));
        }
        self.pager.set_items_per_page(items_per_page);
        self.repaginate();
        Ok(())
    }

    pub fn page(&self) -> Page<R> {
        paginate(&self.filtered, self.pager.current_page(), self.pager.items_per_page())
    }

    pub fn visible(&self) -> Vec<R> {
        self.page().items
    }

    pub fn labels(&self) -> Vec<PageLabel> {
        self.pager.labels()
    }

    pub fn range(&self) -> RecordRange {
        self.pager.range()
    }

    pub fn has_previous(&self) -> bool {
        self.pager.has_previous()
    }

    pub fn has_next(&self) -> bool {
        self.pager.has_next()
    }

    pub fn state(&self) -> ViewState {
        ViewState {
            criteria: self.criteria.clone(),
            search_input: self.search_input.clone(),
            current_page: self.pager.current_page(),
            items_per_page: self.pager.items_per_page(),
            total_filtered_count: self.filtered.len(),
            total_pages: self.pager.total_pages(),
            phase: self.phase,
        }
    }

    /// Tears the view down, discarding any search still waiting to settle.
    /// Returns whether one was discarded.
    pub fn unmount(mut self) -> bool {
        let discarded = self.search.cancel();
        if discarded {
            tracing::debug!("discarded pending search on unmount");
        }
        discarded
    }

    fn begin_pass(&mut self) {
        self.last_pass.clear();
        self.enter(ViewPhase::Idle);
    }

    fn enter(&mut self, phase: ViewPhase) {
        self.phase = phase;
        self.last_pass.push(phase);
    }

    fn refilter(&mut self) {
        self.begin_pass();
        self.enter(ViewPhase::Filtering);
        self.filtered = Arc::new(self.engine.apply(&self.source, &self.criteria));
        self.filter_runs += 1;
        self.pager.reset(self.filtered.len());
        tracing::debug!(
            source = self.source.len(),
            matched = self.filtered.len(),
            "view refiltered"
        );
        self.paginate_and_render();
    }

    fn repaginate(&mut self) {
        self.begin_pass();
        self.paginate_and_render();
    }

    fn paginate_and_render(&mut self) {
        self.enter(ViewPhase::Paginating);
        tracing::trace!(
            page = self.pager.current_page(),
            per_page = self.pager.items_per_page(),
            total_pages = self.pager.total_pages(),
            "view paginated"
        );
        self.enter(ViewPhase::Rendered);
    }
}
