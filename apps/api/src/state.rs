use std::sync::Arc;

use tokio::sync::watch;

use crate::interview::integrity::DisplayDirective;
use crate::interview::station::StationHandle;
use crate::services::InterviewServices;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single interview station owned by this process.
    pub station: StationHandle,
    /// Backs the `/api/*` service endpoints. Always in-process.
    pub ai: Arc<dyn InterviewServices>,
    /// Latest fullscreen directive for the browser host.
    pub display: watch::Receiver<DisplayDirective>,
}
