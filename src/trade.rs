//! Order entry and order query endpoints.
//!
//! Order fields are forwarded verbatim; `qty` and `price` are always sent as
//! strings.

use crate::{endpoint::Endpoint, AbfinanceClient, ApiResponse, Params, Result};

pub const PLACE_ORDER: Endpoint = Endpoint::private_post(
    "/v5/order/create",
    &["category", "symbol", "side", "orderType", "qty"],
);
pub const AMEND_ORDER: Endpoint = Endpoint::private_post("/v5/order/amend", &["category", "symbol"]);
pub const CANCEL_ORDER: Endpoint =
    Endpoint::private_post("/v5/order/cancel", &["category", "symbol"]);
pub const GET_OPEN_ORDERS: Endpoint = Endpoint::private_get("/v5/order/realtime", &["category"]);
pub const CANCEL_ALL_ORDERS: Endpoint = Endpoint::private_post("/v5/order/cancel-all", &["category"]);
pub const GET_ORDER_HISTORY: Endpoint = Endpoint::private_get("/v5/order/history", &["category"]);
pub const GET_EXECUTIONS: Endpoint = Endpoint::private_get("/v5/execution/list", &["category"]);
pub const BATCH_PLACE_ORDER: Endpoint =
    Endpoint::private_post("/v5/order/create-batch", &["category", "request"]);
pub const BATCH_AMEND_ORDER: Endpoint =
    Endpoint::private_post("/v5/order/amend-batch", &["category", "request"]);
pub const BATCH_CANCEL_ORDER: Endpoint =
    Endpoint::private_post("/v5/order/cancel-batch", &["category", "request"]);

/// Trading capability of an [`AbfinanceClient`].
#[derive(Clone, Copy, Debug)]
pub struct TradeApi<'a> {
    client: &'a AbfinanceClient,
}

impl<'a> TradeApi<'a> {
    pub(crate) fn new(client: &'a AbfinanceClient) -> Self {
        Self { client }
    }

    pub async fn place_order(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&PLACE_ORDER, params).await
    }

    /// Modifies price or quantity of an open order, by `orderId` or `orderLinkId`.
    pub async fn amend_order(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&AMEND_ORDER, params).await
    }

    pub async fn cancel_order(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&CANCEL_ORDER, params).await
    }

    pub async fn get_open_orders(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_OPEN_ORDERS, params).await
    }

    pub async fn cancel_all_orders(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&CANCEL_ALL_ORDERS, params).await
    }

    pub async fn get_order_history(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_ORDER_HISTORY, params).await
    }

    pub async fn get_executions(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_EXECUTIONS, params).await
    }

    /// `request` is a JSON array of order objects, see [`crate::Value::json`].
    pub async fn place_batch_order(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&BATCH_PLACE_ORDER, params).await
    }

    pub async fn amend_batch_order(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&BATCH_AMEND_ORDER, params).await
    }

    pub async fn cancel_batch_order(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&BATCH_CANCEL_ORDER, params).await
    }
}
