use crate::auth::AdminCredentials;
use crate::store::Store;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub uploads_dir: PathBuf,
    pub admin: Arc<AdminCredentials>,
}
