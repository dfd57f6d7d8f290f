use crate::error::Result;
use crate::upstream::Backend;
use serde_json::{Value, json};

/// Proxy for order placement, ticket retrieval and gate redemption. Every
/// call forwards the caller's access token; the upstream enforces ownership.
#[derive(Clone, Debug)]
pub struct OrderService {
    backend: Backend,
}

impl OrderService {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    #[tracing::instrument(skip(self, access_token, payload), err(level = "warn"))]
    pub async fn create_order(&self, access_token: &str, payload: Value) -> Result<Value> {
        self.backend.post("orders", &payload, Some(access_token)).await
    }

    #[tracing::instrument(skip(self, access_token), err(level = "warn"))]
    pub async fn list_orders(&self, access_token: &str) -> Result<Value> {
        self.backend.get("orders", Some(access_token)).await
    }

    #[tracing::instrument(skip(self, access_token), err(level = "warn"))]
    pub async fn list_tickets(&self, access_token: &str) -> Result<Value> {
        self.backend.get("tickets", Some(access_token)).await
    }

    /// Marks a ticket as redeemed at the gate. The role gate lives in the
    /// handler; the upstream checks it again.
    #[tracing::instrument(skip(self, access_token), err(level = "warn"))]
    pub async fn redeem_ticket(&self, access_token: &str, code: String) -> Result<Value> {
        self.backend.post("tickets/redeem", &json!({ "code": code }), Some(access_token)).await
    }
}
