/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is the central state container. It holds:
 * - The typed `Settings`
 * - The persistence layer (`dyn Store`)
 * - The object store for document files (`dyn ObjectStore`)
 * - The JWT issuer and the Google ID token verifier
 * - The activity logger and analytics service
 *
 * # Thread Safety
 *
 * Every service is behind an `Arc` (or is cheap to clone), so cloning the
 * state per request is cheap and all services are shared.
 *
 * # Construction
 *
 * `AppState::builder(settings)` fills in defaults for anything not
 * supplied: an in-memory store, a local object store under `UPLOAD_DIR`
 * and the Google tokeninfo verifier. The test suite swaps in its own
 * pieces through the builder.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::activity::ActivityLogger;
use crate::backend::analytics::AnalyticsService;
use crate::backend::auth::{GoogleTokenVerifier, IdTokenVerifier, TokenIssuer};
use crate::backend::server::config::Settings;
use crate::backend::storage::{LinkSigner, LocalObjectStore, ObjectStore};
use crate::backend::store::{MemoryStore, Store};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Server settings loaded at startup
    pub settings: Arc<Settings>,

    /// Users, documents, categories, folders, activity and analytics
    pub store: Arc<dyn Store>,

    /// Document file storage
    pub objects: Arc<dyn ObjectStore>,

    /// Access/refresh token issuer
    pub tokens: TokenIssuer,

    /// Google ID token verification
    pub google: Arc<dyn IdTokenVerifier>,

    /// Signs and verifies local download links
    pub link_signer: LinkSigner,

    /// Audit trail writer
    pub activity: ActivityLogger,

    /// Analytics event writer
    pub analytics: AnalyticsService,
}

impl AppState {
    pub fn builder(settings: Settings) -> AppStateBuilder {
        AppStateBuilder {
            settings,
            store: None,
            objects: None,
            google: None,
        }
    }
}

/// Builder for [`AppState`]
pub struct AppStateBuilder {
    settings: Settings,
    store: Option<Arc<dyn Store>>,
    objects: Option<Arc<dyn ObjectStore>>,
    google: Option<Arc<dyn IdTokenVerifier>>,
}

impl AppStateBuilder {
    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn objects(mut self, objects: Arc<dyn ObjectStore>) -> Self {
        self.objects = Some(objects);
        self
    }

    pub fn google(mut self, google: Arc<dyn IdTokenVerifier>) -> Self {
        self.google = Some(google);
        self
    }

    /// Signing key for local download links, derived from the JWT secret
    pub fn link_signer(settings: &Settings) -> LinkSigner {
        LinkSigner::new(format!("docnest-files:{}", settings.jwt_secret_key))
    }

    pub fn build(self) -> AppState {
        let settings = self.settings;
        let link_signer = Self::link_signer(&settings);

        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let objects = self.objects.unwrap_or_else(|| {
            Arc::new(LocalObjectStore::new(
                &settings.upload_dir,
                link_signer.clone(),
                &settings.files_url(),
            ))
        });
        let google = self
            .google
            .unwrap_or_else(|| Arc::new(GoogleTokenVerifier::new(settings.google_client_id.clone())));

        AppState {
            tokens: TokenIssuer::from_settings(&settings),
            activity: ActivityLogger::new(store.clone()),
            analytics: AnalyticsService::new(store.clone()),
            settings: Arc::new(settings),
            store,
            objects,
            google,
            link_signer,
        }
    }
}

impl FromRef<AppState> for Arc<Settings> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.settings.clone()
    }
}

impl FromRef<AppState> for Arc<dyn Store> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ObjectStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.objects.clone()
    }
}

impl FromRef<AppState> for TokenIssuer {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for ActivityLogger {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.activity.clone()
    }
}

impl FromRef<AppState> for AnalyticsService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.analytics.clone()
    }
}
