//! Built-in view descriptions.
//!
//! A view is described by the backend resource that populates it. Rendering
//! is left to the consumer.

use serde::Serialize;

use crate::error::CoreError;
use crate::router::{ViewId, ViewLoader};

/// What a consumer needs to render a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSpec {
    pub id: ViewId,
    pub title: &'static str,
    /// REST resource holding the view's data. `None` for views backed by
    /// local state only.
    pub data_endpoint: Option<&'static str>,
}

impl ViewSpec {
    pub fn for_view(id: ViewId) -> Self {
        let data_endpoint = match id {
            ViewId::Dashboard => Some("/api/stats"),
            ViewId::Teams => Some("/api/teams"),
            ViewId::History => Some("/api/bets"),
            ViewId::Settings => None,
        };
        Self {
            id,
            title: id.title(),
            data_endpoint,
        }
    }
}

/// Loader for the views compiled into the client.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinViews;

impl ViewLoader for BuiltinViews {
    type View = ViewSpec;

    async fn load(&self, id: ViewId) -> Result<ViewSpec, CoreError> {
        Ok(ViewSpec::for_view(id))
    }
}
