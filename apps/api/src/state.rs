use std::sync::Arc;

use crate::jobs::store::JobStore;
use crate::resume::record::{Clock, IdGenerator};
use crate::resume::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub resumes: Arc<dyn ResumeStore>,
    pub jobs: Arc<dyn JobStore>,
    /// Identity and time for new records. Swapped for fixed fakes in tests.
    pub ids: Arc<dyn IdGenerator>,
    pub clock: Arc<dyn Clock>,
}
