use docchat_core::Controller;
use tokio::sync::Mutex;

/// Shared application state accessible from all handlers.
///
/// There is a single session. The mutex is held for the whole of each
/// event (extraction or completion included), so events never interleave.
pub struct AppState {
    pub controller: Mutex<Controller>,
}

impl AppState {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller: Mutex::new(controller),
        }
    }
}
