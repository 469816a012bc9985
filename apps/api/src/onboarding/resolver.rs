//! Postal-Code Resolver — cancellable lookups keyed to the latest code typed.
//!
//! Each lookup owns a `CancellationToken` and a generation number. Starting a
//! new lookup (or editing the code below eight digits) cancels the previous
//! token, which drops the in-flight request. A lookup that still completes
//! only commits its result if its generation is the active one.
//!
//! Spawns onto the ambient tokio runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::form::StepForm;
use super::record::PersonalData;
use super::validation::{digits_only, Field, ZIP_LENGTH};
use super::zip::{normalize_zip_payload, ZipLookupResult};
use crate::config::{Config, ZIPS_PROXY_PATH};
use crate::upstream::{error_message_from_body, ApiClient, UpstreamError};

pub const ZIP_LOOKUP_FALLBACK: &str = "Não foi possível consultar o CEP informado.";
const ZIP_LOADING_MESSAGE: &str = "Aguarde a consulta do CEP.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZipLookupError {
    /// The collaborator answered with a non-2xx status.
    #[error("{0}")]
    Rejected(String),

    /// The request never produced a response.
    #[error("{0}")]
    Unavailable(String),
}

/// The external postal-lookup collaborator.
#[async_trait]
pub trait ZipLookup: Send + Sync + 'static {
    async fn lookup(&self, code: &str) -> Result<Value, ZipLookupError>;
}

/// Looks codes up through this service's `/api/zips/{code}` proxy.
#[derive(Clone)]
pub struct HttpZipLookup {
    api: ApiClient,
}

impl HttpZipLookup {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Bound to `PUBLIC_BASE_URL`.
    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        Ok(Self::new(ApiClient::new(&config.public_base_url)?))
    }
}

#[async_trait]
impl ZipLookup for HttpZipLookup {
    async fn lookup(&self, code: &str) -> Result<Value, ZipLookupError> {
        let response = self
            .api
            .get_raw(&format!("{ZIPS_PROXY_PATH}/{code}"))
            .await
            .map_err(|e| {
                warn!("Zip lookup for {code} failed: {e}");
                ZipLookupError::Unavailable(ZIP_LOOKUP_FALLBACK.to_string())
            })?;

        let text = String::from_utf8_lossy(&response.body);
        if !response.is_success() {
            return Err(ZipLookupError::Rejected(error_message_from_body(
                &text,
                &["message"],
                ZIP_LOOKUP_FALLBACK,
            )));
        }
        // An unreadable body still resolves, to just the requested code.
        Ok(serde_json::from_str(&text).unwrap_or(Value::Null))
    }
}

/// What the zip field shows at any moment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ZipLookupState {
    pub code: String,
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<ZipLookupResult>,
}

impl ZipLookupState {
    pub fn city(&self) -> Option<&str> {
        self.result.as_ref().and_then(|r| r.city.as_deref())
    }

    pub fn state(&self) -> Option<&str> {
        self.result.as_ref().and_then(|r| r.state.as_deref())
    }

    pub fn summary(&self) -> Option<String> {
        self.result.as_ref().map(ZipLookupResult::summary)
    }
}

struct ActiveLookup {
    generation: u64,
    token: CancellationToken,
}

struct Shared {
    state: watch::Sender<ZipLookupState>,
    active: Mutex<Option<ActiveLookup>>,
    generations: AtomicU64,
}

impl Shared {
    fn lock_active(&self) -> std::sync::MutexGuard<'_, Option<ActiveLookup>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_active(&self) {
        if let Some(previous) = self.lock_active().take() {
            debug!("Cancelling zip lookup #{}", previous.generation);
            previous.token.cancel();
        }
    }

    /// Commits a finished lookup, unless a newer one superseded it.
    fn complete(&self, generation: u64, code: &str, outcome: Result<Value, ZipLookupError>) {
        let mut active = self.lock_active();
        match active.as_ref() {
            Some(current) if current.generation == generation => {}
            _ => {
                debug!("Discarding superseded zip lookup #{generation} for {code}");
                return;
            }
        }
        *active = None;

        let next = match outcome {
            Ok(payload) => ZipLookupState {
                code: code.to_string(),
                loading: false,
                error: None,
                result: Some(normalize_zip_payload(&payload, code)),
            },
            Err(e) => {
                warn!("Zip lookup for {code} failed: {e}");
                let message = e.to_string();
                ZipLookupState {
                    code: code.to_string(),
                    loading: false,
                    error: Some(if message.trim().is_empty() {
                        ZIP_LOOKUP_FALLBACK.to_string()
                    } else {
                        message
                    }),
                    result: None,
                }
            }
        };
        self.state.send_replace(next);
    }
}

pub struct ZipResolver<L: ZipLookup> {
    lookup: Arc<L>,
    shared: Arc<Shared>,
}

impl<L: ZipLookup> ZipResolver<L> {
    pub fn new(lookup: L) -> Self {
        let (state, _) = watch::channel(ZipLookupState::default());
        Self {
            lookup: Arc::new(lookup),
            shared: Arc::new(Shared {
                state,
                active: Mutex::new(None),
                generations: AtomicU64::new(0),
            }),
        }
    }

    pub fn state(&self) -> ZipLookupState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ZipLookupState> {
        self.shared.state.subscribe()
    }

    /// Feeds the zip field's new raw value. Returns the sanitized code.
    ///
    /// Fewer than eight digits cancels any lookup and clears the state
    /// synchronously; exactly eight starts a fresh lookup.
    ///
    /// # Panics
    ///
    /// A complete code spawns the lookup with `tokio::spawn`, so this panics
    /// when called outside a tokio runtime.
    pub fn set_code(&self, raw: &str) -> String {
        let code: String = digits_only(raw).chars().take(ZIP_LENGTH).collect();

        if code.len() < ZIP_LENGTH {
            self.shared.cancel_active();
            self.shared.state.send_replace(ZipLookupState {
                code: code.clone(),
                ..ZipLookupState::default()
            });
            return code;
        }

        let token = CancellationToken::new();
        let generation = self.shared.generations.fetch_add(1, Ordering::Relaxed) + 1;
        {
            let mut active = self.shared.lock_active();
            if let Some(previous) = active.take() {
                debug!("Zip lookup #{} superseded by #{generation}", previous.generation);
                previous.token.cancel();
            }
            *active = Some(ActiveLookup {
                generation,
                token: token.clone(),
            });
            self.shared.state.send_replace(ZipLookupState {
                code: code.clone(),
                loading: true,
                error: None,
                result: None,
            });
        }

        let lookup = Arc::clone(&self.lookup);
        let shared = Arc::clone(&self.shared);
        let lookup_code = code.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => return,
                outcome = lookup.lookup(&lookup_code) => outcome,
            };
            shared.complete(generation, &lookup_code, outcome);
        });

        code
    }

    /// Abandons the in-flight lookup without touching the displayed state.
    pub fn cancel(&self) {
        self.shared.cancel_active();
    }
}

impl<L: ZipLookup> Drop for ZipResolver<L> {
    fn drop(&mut self) {
        self.shared.cancel_active();
    }
}

impl StepForm<PersonalData> {
    /// Copies the resolver's view into the personal step: derived address
    /// fields from a result, and loading/lookup errors onto the zip field.
    pub fn sync_zip(&mut self, lookup: &ZipLookupState) {
        let values = self.values_mut();
        match &lookup.result {
            Some(result) => values.apply_zip(result),
            None => values.clear_zip_derived(),
        }

        let external = if lookup.loading {
            Some(ZIP_LOADING_MESSAGE.to_string())
        } else {
            lookup.error.clone()
        };
        self.set_external_error(Field::ZipCode, external);
    }
}
