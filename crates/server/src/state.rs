use std::sync::Arc;

use vigil_core::config::SmtpConfig;
use vigil_registry::ContainerRegistry;
use vigil_status::StatusStore;

/// Capabilities shared with the HTTP handlers.
///
/// The manual report trigger builds its own sink per request (the
/// recipient comes from the request), so only the SMTP settings are held
/// here, not a sink.
pub struct AppState {
    pub store: Arc<dyn StatusStore>,
    pub registry: Arc<dyn ContainerRegistry>,
    pub smtp: SmtpConfig,
}
