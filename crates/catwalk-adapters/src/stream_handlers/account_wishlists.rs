//! `account-wishlists` stream: the wishlists of the logged-in account.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use catwalk_core::{
    application::{StreamError, ports::StreamHandler},
    domain::{Context, Parameters, Stream},
};

/// Errors raised by a [`WishlistApi`].
#[derive(Debug, Error)]
pub enum WishlistApiError {
    #[error("Wishlist backend unavailable: {0}")]
    Unavailable(String),
}

/// Backend access for wishlists.
#[async_trait]
pub trait WishlistApi: Send + Sync {
    async fn wishlists(&self, account_id: &str) -> Result<Vec<Value>, WishlistApiError>;
}

/// Resolves the current account's wishlists.
///
/// Anonymous sessions get an empty list without calling the backend. The
/// account id always comes from the session, never from stream configuration.
pub struct AccountWishlists {
    api: Arc<dyn WishlistApi>,
}

impl AccountWishlists {
    pub const STREAM_TYPE: &'static str = "account-wishlists";

    pub fn new(api: Arc<dyn WishlistApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl StreamHandler for AccountWishlists {
    fn stream_type(&self) -> &str {
        Self::STREAM_TYPE
    }

    async fn handle(
        &self,
        _stream: &Stream,
        context: &Context,
        _parameters: &Parameters,
    ) -> Result<Value, StreamError> {
        let Some(account_id) = context.account_id() else {
            return Ok(Value::Array(Vec::new()));
        };

        let wishlists = self.api.wishlists(account_id).await?;
        Ok(Value::Array(wishlists))
    }
}

/// Wishlists held in memory, keyed by account id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWishlistApi {
    wishlists: Arc<RwLock<HashMap<String, Vec<Value>>>>,
}

impl InMemoryWishlistApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wishlists(account_id: impl Into<String>, wishlists: Vec<Value>) -> Self {
        let api = Self::new();
        if let Ok(mut inner) = api.wishlists.write() {
            inner.insert(account_id.into(), wishlists);
        }
        api
    }
}

#[async_trait]
impl WishlistApi for InMemoryWishlistApi {
    async fn wishlists(&self, account_id: &str) -> Result<Vec<Value>, WishlistApiError> {
        let inner = self
            .wishlists
            .read()
            .map_err(|_| WishlistApiError::Unavailable("wishlist store poisoned".into()))?;
        Ok(inner.get(account_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catwalk_core::domain::Session;
    use serde_json::json;

    struct Down;

    #[async_trait]
    impl WishlistApi for Down {
        async fn wishlists(&self, _account_id: &str) -> Result<Vec<Value>, WishlistApiError> {
            Err(WishlistApiError::Unavailable("timeout".into()))
        }
    }

    fn handler() -> AccountWishlists {
        AccountWishlists::new(Arc::new(InMemoryWishlistApi::with_wishlists(
            "acc-1",
            vec![json!({ "wishlistId": "w1" })],
        )))
    }

    #[tokio::test]
    async fn anonymous_session_gets_empty_list() {
        let payload = handler()
            .handle(
                &Stream::new("s1", AccountWishlists::STREAM_TYPE),
                &Context::default(),
                &Parameters::new(),
            )
            .await
            .unwrap();

        assert_eq!(payload, json!([]));
    }

    #[tokio::test]
    async fn logged_in_session_gets_its_wishlists() {
        let context = Context::default().with_session(Session::logged_in("acc-1"));

        let payload = handler()
            .handle(
                &Stream::new("s1", AccountWishlists::STREAM_TYPE),
                &context,
                &Parameters::new(),
            )
            .await
            .unwrap();

        assert_eq!(payload, json!([{ "wishlistId": "w1" }]));
    }

    #[tokio::test]
    async fn backend_errors_become_stream_errors() {
        let context = Context::default().with_session(Session::logged_in("acc-1"));

        let error = AccountWishlists::new(Arc::new(Down))
            .handle(&Stream::new("s1", "account-wishlists"), &context, &Parameters::new())
            .await
            .unwrap_err();

        assert_eq!(error.message(), "Wishlist backend unavailable: timeout");
    }
}
