//! Test application setup

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use tempfile::TempDir;

use docnest::backend::auth::{AuthError, GoogleIdentity, IdTokenVerifier};
use docnest::backend::routes::create_router;
use docnest::backend::server::config::Settings;
use docnest::backend::server::state::AppState;
use docnest::backend::store::MemoryStore;

pub const VALID_GOOGLE_TOKEN: &str = "valid-google-token";
pub const GOOGLE_SUBJECT: &str = "google-subject-123";

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF";
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

/// Accepts exactly one token and maps it to a fixed identity
pub struct StubGoogleVerifier {
    pub email: String,
}

#[async_trait]
impl IdTokenVerifier for StubGoogleVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, AuthError> {
        if id_token != VALID_GOOGLE_TOKEN {
            return Err(AuthError::Google("Invalid token".to_string()));
        }
        Ok(GoogleIdentity {
            subject: GOOGLE_SUBJECT.to_string(),
            email: self.email.clone(),
            name: Some("Google User".to_string()),
            picture: Some("https://example.com/avatar.png".to_string()),
        })
    }
}

/// A running test application
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_settings(|_| {})
    }

    /// Build an app from development settings adjusted by `configure`
    pub fn with_settings(configure: impl FnOnce(&mut Settings)) -> Self {
        let upload_dir = tempfile::tempdir().expect("create upload dir");

        let mut settings = Settings::development();
        settings.bcrypt_cost = 4;
        settings.upload_dir = upload_dir.path().to_string_lossy().into_owned();
        settings.public_base_url = "http://localhost".to_string();
        configure(&mut settings);

        let store = Arc::new(MemoryStore::new());
        let state = AppState::builder(settings)
            .store(store.clone())
            .google(Arc::new(StubGoogleVerifier {
                email: "google.user@example.com".to_string(),
            }))
            .build();

        let server = TestServer::new(create_router(state.clone())).expect("start test server");

        Self {
            server,
            state,
            store,
            upload_dir,
        }
    }
}

/// Multipart form for creating a document
pub fn document_form(name: &str, category: &str, filename: &str, bytes: &[u8]) -> MultipartForm {
    MultipartForm::new()
        .add_text("name", name.to_string())
        .add_text("category", category.to_string())
        .add_part("file", file_part(filename, bytes))
}

pub fn file_part(filename: &str, bytes: &[u8]) -> Part {
    Part::bytes(bytes.to_vec())
        .file_name(filename.to_string())
        .mime_type("application/octet-stream")
}

/// Number of files below `dir`
pub fn count_files(dir: &std::path::Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| {
            let path = entry.path();
            if path.is_dir() {
                count_files(&path)
            } else {
                1
            }
        })
        .sum()
}
