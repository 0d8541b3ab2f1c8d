use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error_handling::types::WebError;
use crate::model::PostId;
use crate::storage::context::Context;
use crate::storage::storage_trait::Storage;

/// Dependencies handed to every route.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, request_timeout: Duration) -> Self {
        Self {
            storage,
            request_timeout,
        }
    }

    /// Execution context bounding the storage call of one request.
    pub fn request_context(&self) -> Context {
        Context::with_timeout(self.request_timeout)
    }
}

/// Query string and form body fields of a request, body taking precedence.
#[derive(Debug, Clone, Default)]
pub struct FormParams(HashMap<String, String>);

impl FormParams {
    pub fn merge(query: HashMap<String, String>, body: HashMap<String, String>) -> Self {
        let mut fields = query;
        fields.extend(body);
        Self(fields)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn required(&self, name: &'static str) -> Result<&str, WebError> {
        self.get(name).ok_or(WebError::MissingField(name))
    }

    /// The `id` field, if one was submitted. An empty value counts as absent.
    pub fn id(&self) -> Result<Option<PostId>, WebError> {
        match self.get("id").map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<PostId>()
                .map(Some)
                .map_err(|_| WebError::Validation(format!("id is not an integer: {:?}", raw))),
        }
    }

    pub fn required_id(&self) -> Result<PostId, WebError> {
        self.id()?.ok_or(WebError::MissingId)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormParams {
    fn from(fields: [(&str, &str); N]) -> Self {
        Self(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
