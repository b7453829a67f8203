//! Public market data endpoints.

use crate::{endpoint::Endpoint, AbfinanceClient, ApiResponse, Params, Result};

pub const GET_SERVER_TIME: Endpoint = Endpoint::public_get("/v5/market/time", &[]);
pub const GET_KLINE: Endpoint =
    Endpoint::public_get("/v5/market/kline", &["category", "symbol", "interval"]);
pub const GET_INSTRUMENTS_INFO: Endpoint =
    Endpoint::public_get("/v5/market/instruments-info", &["category"]);
pub const GET_ORDERBOOK: Endpoint =
    Endpoint::public_get("/v5/market/orderbook", &["category", "symbol"]);
pub const GET_TICKERS: Endpoint = Endpoint::public_get("/v5/market/tickers", &["category"]);
pub const GET_PUBLIC_TRADE_HISTORY: Endpoint =
    Endpoint::public_get("/v5/market/recent-trade", &["category", "symbol"]);
pub const GET_PRICE_LIMIT: Endpoint = Endpoint::public_get("/v5/market/price-limit", &["symbol"]);
pub const GET_RPI_ORDERBOOK: Endpoint =
    Endpoint::public_get("/v5/market/rpi_orderbook", &["category", "symbol"]);
pub const GET_INDEX_PRICE_COMPONENTS: Endpoint =
    Endpoint::public_get("/v5/market/index-price-components", &["symbol"]);

/// Market data capability of an [`AbfinanceClient`].
#[derive(Clone, Copy, Debug)]
pub struct MarketApi<'a> {
    client: &'a AbfinanceClient,
}

impl<'a> MarketApi<'a> {
    pub(crate) fn new(client: &'a AbfinanceClient) -> Self {
        Self { client }
    }

    pub async fn get_server_time(&self) -> Result<ApiResponse> {
        self.client.call(&GET_SERVER_TIME, ()).await
    }

    /// Klines grouped by `interval`.
    pub async fn get_kline(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_KLINE, params).await
    }

    pub async fn get_instruments_info(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_INSTRUMENTS_INFO, params).await
    }

    pub async fn get_orderbook(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_ORDERBOOK, params).await
    }

    /// Latest price snapshot, best bid/ask and 24h volume.
    pub async fn get_tickers(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_TICKERS, params).await
    }

    pub async fn get_public_trade_history(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_PUBLIC_TRADE_HISTORY, params).await
    }

    pub async fn get_price_limit(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_PRICE_LIMIT, params).await
    }

    pub async fn get_rpi_orderbook(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_RPI_ORDERBOOK, params).await
    }

    pub async fn get_index_price_components(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_INDEX_PRICE_COMPONENTS, params).await
    }
}
