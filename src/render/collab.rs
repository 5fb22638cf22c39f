use crate::node::Action;
use tracing::info;

/// Host callback for user interactions.
pub trait ActionHandler: Send + Sync {
    fn handle_action(&self, action: &Action);
}

/// Logs every action. Used when the host registers no handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingActionHandler;

impl ActionHandler for LoggingActionHandler {
    fn handle_action(&self, action: &Action) {
        match action.action_type.as_str() {
            "navigate" => info!(
                destination = action.destination.as_deref().unwrap_or_default(),
                params = ?action.params,
                "navigate"
            ),
            "api_call" => info!(params = ?action.params, "api call"),
            other => info!(action = other, params = ?action.params, "unhandled action"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageConstraints {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub circular: bool,
}

/// An image as the loader hands it to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHandle {
    pub url: String,
    pub constraints: ImageConstraints,
}

pub trait ImageLoader: Send + Sync {
    fn load_image(&self, url: &str, constraints: &ImageConstraints) -> ImageHandle;
}

/// Hands the url straight to the backend, which fetches it itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughImageLoader;

impl ImageLoader for PassthroughImageLoader {
    fn load_image(&self, url: &str, constraints: &ImageConstraints) -> ImageHandle {
        ImageHandle {
            url: url.to_string(),
            constraints: *constraints,
        }
    }
}
