//! Editing session: selection → fetch → edit → save → refetch.
//!
//! # Data Flow
//! ```text
//! select_*()  → generation += 1, draft cleared
//!             → FetchTicket { generation, selector }     (if selection is ready)
//! ticket.execute(api) → FetchResponse                    (may resolve late)
//! apply_fetch(response)
//!             → generation behind?  discard (Stale)
//!             → Ok:  baseline = live = tree
//!             → Err: baseline = live = None, one notification
//! record_edit(path, raw) → editor validation → DraftStore
//! save()      → draft.commit(live) → shape adapter → PUT update-all
//!             → Ok:  draft cleared, refetch replaces baseline
//!             → Err: draft and live form kept, one notification
//! ```
//!
//! # Design Decisions
//! - The session is owned by one task; no locks around draft state
//! - Fetching is split into ticket/execute/apply so a caller can keep driving
//!   the selector while a request is in flight
//! - The server copy after save is authoritative, never the local draft

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::api::{ApiError, ApiResult, PricingApi};
use crate::editors::{EditorKind, EditorSchema, FieldError, RenderedField};
use crate::observability::metrics;
use crate::pricing::adapter::{AdapterRegistry, ShapeError};
use crate::pricing::cascade::{SelectionInvalid, SelectionState, Selector, SelectorCascade};
use crate::pricing::draft::DraftStore;
use crate::pricing::flow::FlowTree;
use crate::pricing::notify::{Notification, Notifier};
use crate::pricing::ConfigTree;

/// Errors surfaced by session operations. None of them end the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("selection is not ready: {0}")]
    SelectionInvalid(#[from] SelectionInvalid),

    #[error("no configuration loaded")]
    NotLoaded,

    #[error("could not load the service flow: {0}")]
    FlowUnavailable(#[source] ApiError),

    #[error("fetch failed: {0}")]
    FetchFailed(#[source] ApiError),

    #[error("save failed: {0}")]
    SaveFailed(#[source] ApiError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Field(#[from] FieldError),
}

/// A pending read for one selection generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub selector: Selector,
}

impl FetchTicket {
    /// Perform the read. Holds no reference to the session.
    pub async fn execute(self, api: &dyn PricingApi) -> FetchResponse {
        let result = api.fetch_config(&self.selector).await;
        FetchResponse {
            ticket: self,
            result,
        }
    }
}

/// A completed read, not yet applied.
#[derive(Debug)]
pub struct FetchResponse {
    pub ticket: FetchTicket,
    pub result: ApiResult<ConfigTree>,
}

/// What applying a fetch response did.
#[derive(Debug)]
pub enum FetchOutcome {
    Loaded,
    Failed(ApiError),
    /// A newer selection superseded this response; state untouched.
    Stale,
}

impl FetchOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchOutcome::Loaded)
    }
}

/// Result of a successful save.
#[derive(Debug)]
pub struct SaveReport {
    pub selector: Selector,
    /// Exactly what was sent.
    pub body: serde_json::Value,
    /// Outcome of the resynchronizing refetch.
    pub refresh: FetchOutcome,
}

/// Last loaded subtree for one selector.
#[derive(Debug, Clone)]
struct Loaded {
    selector: Selector,
    /// Server copy as fetched; read-only for the session.
    baseline: ConfigTree,
    /// Form value edits are merged onto at save time.
    live: ConfigTree,
}

/// One operator's pricing-editor session.
pub struct ConfigSession {
    api: Arc<dyn PricingApi>,
    notifier: Arc<dyn Notifier>,
    cascade: SelectorCascade,
    adapters: AdapterRegistry,
    editor_overrides: HashMap<String, EditorKind>,
    generation: u64,
    loaded: Option<Loaded>,
    draft: DraftStore,
}

impl ConfigSession {
    pub fn new(api: Arc<dyn PricingApi>, flow: FlowTree, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            cascade: SelectorCascade::new(flow),
            adapters: AdapterRegistry::default(),
            editor_overrides: HashMap::new(),
            generation: 0,
            loaded: None,
            draft: DraftStore::new(),
        }
    }

    /// Fetch the flow tree once and start a session over it.
    pub async fn open(api: Arc<dyn PricingApi>, notifier: Arc<dyn Notifier>) -> Result<Self, SessionError> {
        match api.fetch_flow().await {
            Ok(flow) => {
                tracing::info!(services = flow.services().len(), "Service flow loaded");
                Ok(Self::new(api, flow, notifier))
            }
            Err(e) => {
                report(notifier.as_ref(), "Failed to load services", &e);
                Err(SessionError::FlowUnavailable(e))
            }
        }
    }

    pub fn with_adapters(mut self, adapters: AdapterRegistry) -> Self {
        self.adapters = adapters;
        self
    }

    pub fn with_editor_overrides(mut self, overrides: HashMap<String, EditorKind>) -> Self {
        self.editor_overrides = overrides;
        self
    }

    pub fn api(&self) -> Arc<dyn PricingApi> {
        self.api.clone()
    }

    pub fn cascade(&self) -> &SelectorCascade {
        &self.cascade
    }

    pub fn selection(&self) -> &SelectionState {
        self.cascade.state()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ── Selection ────────────────────────────────────────────────────────

    pub fn select_service(&mut self, key: impl Into<String>) -> Option<FetchTicket> {
        self.cascade.select_service(key);
        self.selection_changed()
    }

    pub fn select_category(&mut self, key: impl Into<String>) -> Option<FetchTicket> {
        self.cascade.select_category(key);
        self.selection_changed()
    }

    pub fn select_sub(&mut self, key: impl Into<String>) -> Option<FetchTicket> {
        self.cascade.select_sub(key);
        self.selection_changed()
    }

    /// Any selection change closes the current edit session and supersedes
    /// every outstanding fetch.
    fn selection_changed(&mut self) -> Option<FetchTicket> {
        self.draft.clear();
        self.loaded = None;
        match self.cascade.selector() {
            Ok(selector) => Some(self.issue_ticket(selector)),
            Err(reason) => {
                self.generation += 1;
                tracing::debug!(%reason, generation = self.generation, "Selection not ready, nothing to fetch");
                None
            }
        }
    }

    fn issue_ticket(&mut self, selector: Selector) -> FetchTicket {
        self.generation += 1;
        tracing::debug!(%selector, generation = self.generation, "Issuing fetch");
        FetchTicket {
            generation: self.generation,
            selector,
        }
    }

    // ── Fetch ────────────────────────────────────────────────────────────

    /// Apply a completed read, unless a newer selection superseded it.
    pub fn apply_fetch(&mut self, response: FetchResponse) -> FetchOutcome {
        let FetchResponse { ticket, result } = response;
        if ticket.generation != self.generation {
            metrics::record_stale_response();
            tracing::debug!(
                selector = %ticket.selector,
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale configuration response"
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(tree) => {
                metrics::record_fetch("ok");
                tracing::info!(selector = %ticket.selector, "Pricing configuration loaded");
                self.loaded = Some(Loaded {
                    selector: ticket.selector,
                    baseline: tree.clone(),
                    live: tree,
                });
                FetchOutcome::Loaded
            }
            Err(e) => {
                metrics::record_fetch("error");
                tracing::warn!(selector = %ticket.selector, error = %e, "Pricing configuration fetch failed");
                self.loaded = None;
                report(self.notifier.as_ref(), "Failed to load pricing", &e);
                FetchOutcome::Failed(e)
            }
        }
    }

    /// Execute and apply `ticket` in one step.
    pub async fn load(&mut self, ticket: FetchTicket) -> FetchOutcome {
        if ticket.generation != self.generation {
            metrics::record_stale_response();
            return FetchOutcome::Stale;
        }
        let api = self.api.clone();
        let response = ticket.execute(api.as_ref()).await;
        self.apply_fetch(response)
    }

    /// Re-read the current selection, e.g. after a failed fetch.
    pub async fn refresh(&mut self) -> Result<FetchOutcome, SessionError> {
        let selector = self.cascade.selector()?;
        let ticket = self.issue_ticket(selector);
        Ok(self.load(ticket).await)
    }

    // ── Editing ──────────────────────────────────────────────────────────

    pub fn selector(&self) -> Option<&Selector> {
        self.loaded.as_ref().map(|l| &l.selector)
    }

    /// Last server copy, `None` when nothing is loaded.
    pub fn config_data(&self) -> Option<&ConfigTree> {
        self.loaded.as_ref().map(|l| &l.baseline)
    }

    pub fn live_form(&self) -> Option<&ConfigTree> {
        self.loaded.as_ref().map(|l| &l.live)
    }

    pub fn draft(&self) -> &DraftStore {
        &self.draft
    }

    /// Unvalidated access for callers that bring their own field list.
    pub fn draft_mut(&mut self) -> &mut DraftStore {
        &mut self.draft
    }

    pub fn editor_kind(&self) -> Option<EditorKind> {
        let selector = self.selector()?;
        Some(EditorKind::for_service(&selector.category, &self.editor_overrides))
    }

    pub fn editor(&self) -> Option<EditorSchema> {
        self.editor_kind().map(EditorKind::schema)
    }

    /// Fields of the active editor with their current display values.
    pub fn fields(&self) -> Vec<RenderedField> {
        match (&self.loaded, self.editor()) {
            (Some(loaded), Some(editor)) => editor.render(&loaded.baseline, &self.draft, &loaded.selector),
            _ => Vec::new(),
        }
    }

    /// Validate `raw` against the active editor and record it.
    pub fn record_edit(&mut self, path: &str, raw: &str) -> Result<(), SessionError> {
        let (Some(loaded), Some(editor)) = (&self.loaded, self.editor()) else {
            return Err(SessionError::NotLoaded);
        };
        editor.record(&mut self.draft, &loaded.selector, path, raw)?;
        Ok(())
    }

    /// Drop pending edits and show the server copy again.
    pub fn cancel(&mut self) {
        self.draft.clear();
        if let Some(loaded) = &mut self.loaded {
            loaded.live = loaded.baseline.clone();
        }
    }

    // ── Save ─────────────────────────────────────────────────────────────

    /// Merge, shape and send the edits, then resynchronize from the server.
    ///
    /// On failure the draft and live form are left exactly as they were.
    pub async fn save(&mut self) -> Result<SaveReport, SessionError> {
        let Some(loaded) = &self.loaded else {
            return Err(SessionError::NotLoaded);
        };
        let selector = loaded.selector.clone();
        let form = self.draft.commit(&loaded.live);

        let body = match self.adapters.shape(&form, &selector) {
            Ok(body) => body,
            Err(e) => {
                metrics::record_save("rejected");
                self.notifier.notify(Notification::error(e.to_string()));
                return Err(e.into());
            }
        };

        tracing::info!(%selector, edits = self.draft.len(), "Saving pricing configuration");
        if let Err(e) = self.api.update_all(&selector, &body).await {
            metrics::record_save("error");
            tracing::warn!(%selector, error = %e, "Pricing update rejected");
            report(self.notifier.as_ref(), "Save failed", &e);
            return Err(SessionError::SaveFailed(e));
        }

        metrics::record_save("ok");
        self.notifier.notify(Notification::success("Pricing updated"));
        self.draft.clear();

        let ticket = self.issue_ticket(selector.clone());
        let refresh = self.load(ticket).await;
        Ok(SaveReport {
            selector,
            body,
            refresh,
        })
    }
}

impl std::fmt::Debug for ConfigSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigSession")
            .field("selection", self.cascade.state())
            .field("generation", &self.generation)
            .field("loaded", &self.selector())
            .field("pending_edits", &self.draft.len())
            .finish()
    }
}

/// Raise one notification for a failed backend call.
///
/// A rejected credential is the auth collaborator's to report.
fn report(notifier: &dyn Notifier, context: &str, error: &ApiError) {
    if matches!(error, ApiError::Unauthorized) {
        return;
    }
    notifier.notify(Notification::error(format!("{}: {}", context, error.user_message())));
}
