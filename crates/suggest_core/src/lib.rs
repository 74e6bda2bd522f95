use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use reqwest::Client;
use shared::{
    domain::{fields, Query, Suggestion},
    protocol::{NormalizeRequest, NormalizedLocation, SuggestResponse},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use url::Url;

pub mod config;
pub mod error;
mod selection;

pub use config::{load_settings, Settings};
pub use error::LookupError;
pub use selection::SelectionResult;

/// Render seam for the suggestion list.
///
/// Implementations must preserve the order suggestions are handed in.
pub trait SuggestionView: Send + Sync {
    fn show(&self, suggestions: &[Suggestion]);
    fn clear(&self);
}

/// View that renders nothing, for constructing a controller before the
/// surrounding UI is wired up.
pub struct NullSuggestionView;

impl SuggestionView for NullSuggestionView {
    fn show(&self, _suggestions: &[Suggestion]) {}
    fn clear(&self) {}
}

/// Form seam: the named fields a selection projects into. Both operations
/// are synchronous; the controller is the only writer.
pub trait FormBinding: Send + Sync {
    fn set_field(&self, name: &str, value: &str);
    fn clear_field(&self, name: &str);
}

pub struct NullFormBinding;

impl FormBinding for NullFormBinding {
    fn set_field(&self, _name: &str, _value: &str) {}
    fn clear_field(&self, _name: &str) {}
}

/// Application-level notifications emitted by the controller.
///
/// Lookup and normalize failures are deliberately not shown in the
/// suggestion flow itself; they surface here for callers that want
/// diagnostics.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    SuggestionsRendered { count: usize },
    SelectionApplied { result: SelectionResult },
    LookupFailed { reason: String },
    NormalizeFailed { reason: String },
}

/// Owns the lifecycle of one text input's search-as-you-type interaction:
/// debounces keystrokes, keeps at most one lookup in flight, cancels
/// superseded requests, renders the list through [`SuggestionView`] and on
/// selection projects the result into [`FormBinding`] fields.
pub struct SuggestionController {
    http: Client,
    suggest_url: Url,
    normalize_url: Url,
    debounce: Duration,
    min_query_len: usize,
    view: Arc<dyn SuggestionView>,
    form: Arc<dyn FormBinding>,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<ControllerEvent>,
}

struct ControllerState {
    /// Cancellation token for the in-flight lookup: a response may touch
    /// the view only while its generation is still current.
    generation: u64,
    /// Scheduled-but-not-yet-fired (or still in-flight) lookup task.
    pending_lookup: Option<JoinHandle<()>>,
    last_query: String,
}

impl SuggestionController {
    pub fn new(
        settings: Settings,
        view: Arc<dyn SuggestionView>,
        form: Arc<dyn FormBinding>,
    ) -> Result<Arc<Self>> {
        let suggest_url = Url::parse(&settings.suggest_url)
            .with_context(|| format!("invalid suggest url '{}'", settings.suggest_url))?;
        let normalize_url = Url::parse(&settings.normalize_url)
            .with_context(|| format!("invalid normalize url '{}'", settings.normalize_url))?;

        let (events, _) = broadcast::channel(256);
        Ok(Arc::new(Self {
            http: Client::new(),
            suggest_url,
            normalize_url,
            debounce: Duration::from_millis(settings.debounce_ms),
            min_query_len: settings.min_query_len,
            view,
            form,
            inner: Mutex::new(ControllerState {
                generation: 0,
                pending_lookup: None,
                last_query: String::new(),
            }),
            events,
        }))
    }

    /// Construct without view or form wiring; events still fire.
    pub fn detached(settings: Settings) -> Result<Arc<Self>> {
        Self::new(settings, Arc::new(NullSuggestionView), Arc::new(NullFormBinding))
    }

    /// One keystroke. Clears the rendered list and the provider-derived
    /// fields immediately, then either cancels everything (input below the
    /// minimum length) or schedules a lookup after the debounce interval,
    /// replacing any lookup scheduled for an earlier keystroke.
    pub async fn handle_input(self: &Arc<Self>, text: &str) {
        let mut guard = self.inner.lock().await;

        self.view.clear();
        for name in fields::PROVIDER_DERIVED {
            self.form.clear_field(name);
        }

        if let Some(pending) = guard.pending_lookup.take() {
            pending.abort();
        }

        let Some(query) = Query::parse(text, self.min_query_len) else {
            // Below the threshold: cancel any in-flight request outright.
            guard.generation = guard.generation.wrapping_add(1);
            guard.last_query.clear();
            return;
        };

        debug!(query = %query, debounce_ms = self.debounce.as_millis() as u64, "suggest: lookup scheduled");
        guard.last_query = query.as_str().to_string();

        let controller = Arc::clone(self);
        let debounce = self.debounce;
        guard.pending_lookup = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            controller.fire_lookup(query).await;
        }));
    }

    /// Issues the lookup carrying a fresh generation. Invalidates the prior
    /// generation first, so at most one request's result can ever be
    /// applied; a response arriving for a stale generation is dropped
    /// without touching the view.
    async fn fire_lookup(&self, query: Query) {
        let generation = {
            let mut guard = self.inner.lock().await;
            guard.generation = guard.generation.wrapping_add(1);
            guard.generation
        };

        let outcome = self.lookup(query.as_str()).await;

        let guard = self.inner.lock().await;
        let outcome = if guard.generation == generation {
            outcome
        } else {
            Err(LookupError::Canceled)
        };

        match outcome {
            Ok(suggestions) => self.render(&suggestions),
            Err(LookupError::Canceled) => {
                debug!(query = %query, "suggest: dropping superseded lookup");
            }
            Err(err) => {
                warn!(query = %query, "suggest: lookup failed: {err}");
                self.view.clear();
                let _ = self.events.send(ControllerEvent::LookupFailed {
                    reason: err.to_string(),
                });
            }
        }
    }

    async fn lookup(&self, query: &str) -> std::result::Result<Vec<Suggestion>, LookupError> {
        let response = self
            .http
            .get(self.suggest_url.clone())
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::BadStatus(status));
        }

        let payload: SuggestResponse = response.json().await?;
        Ok(payload.into_suggestions())
    }

    /// Renders in response order; an empty list hides the container.
    fn render(&self, suggestions: &[Suggestion]) {
        if suggestions.is_empty() {
            self.view.clear();
        } else {
            self.view.show(suggestions);
        }
        debug!(count = suggestions.len(), "suggest: rendered suggestions");
        let _ = self.events.send(ControllerEvent::SuggestionsRendered {
            count: suggestions.len(),
        });
    }

    /// User activated a suggestion: project it into the bound fields
    /// (overwriting field-by-field, clearing mapped fields the suggestion
    /// does not carry), clear the list, notify listeners, and hand the
    /// selection to the normalization endpoint. Normalization transport
    /// failures are absorbed here and surfaced only as diagnostics.
    pub async fn select(&self, suggestion: &Suggestion) {
        let request = {
            let guard = self.inner.lock().await;
            let result = SelectionResult::from_suggestion(suggestion, &guard.last_query);
            result.apply(self.form.as_ref());
            self.view.clear();

            let selected_text = if suggestion.text.is_empty() {
                guard.last_query.clone()
            } else {
                suggestion.text.clone()
            };
            info!(label = suggestion.label(), "suggest: selection applied");
            let _ = self
                .events
                .send(ControllerEvent::SelectionApplied { result });

            NormalizeRequest {
                provider_ref: suggestion.provider_ref.clone(),
                selected_text,
                provider: suggestion.provider.clone(),
            }
        };

        if let Err(err) = self.post_normalize(&request).await {
            warn!(provider_ref = %request.provider_ref, "suggest: normalize request failed: {err}");
            let _ = self.events.send(ControllerEvent::NormalizeFailed {
                reason: err.to_string(),
            });
        }
    }

    /// The response body is the partial-update layer's concern; this core
    /// only checks that the endpoint accepted the selection.
    async fn post_normalize(&self, request: &NormalizeRequest) -> Result<()> {
        self.http
            .post(self.normalize_url.clone())
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Applies a fully normalized location delivered by the normalization
    /// layer: every bound field is set or cleared, then the list is
    /// cleared.
    pub async fn apply_normalized(&self, location: &NormalizedLocation) {
        let _guard = self.inner.lock().await;
        SelectionResult::from_normalized(location).apply(self.form.as_ref());
        self.view.clear();
    }

    /// Interaction outside the input and list region: hide the list,
    /// leaving already-applied form fields untouched.
    pub async fn dismiss(&self) {
        let _guard = self.inner.lock().await;
        self.view.clear();
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
