//! Unified account endpoints.

use crate::{endpoint::Endpoint, AbfinanceClient, ApiResponse, Params, Result};

pub const GET_WALLET_BALANCE: Endpoint =
    Endpoint::private_get("/v5/account/wallet-balance", &["accountType"]);
pub const GET_TRANSFERABLE_AMOUNT: Endpoint =
    Endpoint::private_get("/v5/account/withdrawal", &["coinName"]);
pub const GET_BORROW_HISTORY: Endpoint = Endpoint::private_get("/v5/account/borrow-history", &[]);
pub const GET_COLLATERAL_INFO: Endpoint = Endpoint::private_get("/v5/account/collateral-info", &[]);
pub const SET_COLLATERAL_COIN: Endpoint = Endpoint::private_post(
    "/v5/account/set-collateral-switch",
    &["coin", "collateralSwitch"],
);
pub const BATCH_SET_COLLATERAL_COIN: Endpoint =
    Endpoint::private_post("/v5/account/set-collateral-switch-batch", &["request"]);
pub const GET_FEE_RATE: Endpoint = Endpoint::private_get("/v5/account/fee-rate", &[]);
pub const GET_ACCOUNT_INFO: Endpoint = Endpoint::private_get("/v5/account/info", &[]);
pub const GET_TRANSACTION_LOG: Endpoint = Endpoint::private_get("/v5/account/transaction-log", &[]);
pub const GET_MMP_STATE: Endpoint = Endpoint::private_get("/v5/account/mmp-state", &["baseCoin"]);
pub const GET_INSTRUMENTS_INFO: Endpoint =
    Endpoint::private_get("/v5/account/instruments-info", &[]);
pub const QUERY_DCP_INFO: Endpoint = Endpoint::private_get("/v5/account/query-dcp-info", &[]);
pub const GET_SMP_GROUP: Endpoint = Endpoint::private_get("/v5/account/smp-group", &[]);
pub const SET_LIMIT_PRICE_ACTION: Endpoint =
    Endpoint::private_post("/v5/account/set-limit-px-action", &["limitPxAction"]);

/// Account capability of an [`AbfinanceClient`].
#[derive(Clone, Copy, Debug)]
pub struct AccountApi<'a> {
    client: &'a AbfinanceClient,
}

impl<'a> AccountApi<'a> {
    pub(crate) fn new(client: &'a AbfinanceClient) -> Self {
        Self { client }
    }

    /// Wallet balance and risk rate. `accountType` is `UNIFIED` or `CONTRACT`.
    pub async fn get_wallet_balance(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_WALLET_BALANCE, params).await
    }

    pub async fn get_transferable_amount(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_TRANSFERABLE_AMOUNT, params).await
    }

    pub async fn get_borrow_history(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_BORROW_HISTORY, params).await
    }

    pub async fn get_collateral_info(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_COLLATERAL_INFO, params).await
    }

    /// `collateralSwitch` is `ON` or `OFF`.
    pub async fn set_collateral_coin(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&SET_COLLATERAL_COIN, params).await
    }

    pub async fn batch_set_collateral_coin(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&BATCH_SET_COLLATERAL_COIN, params).await
    }

    pub async fn get_fee_rates(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_FEE_RATE, params).await
    }

    pub async fn get_account_info(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_ACCOUNT_INFO, params).await
    }

    pub async fn get_transaction_log(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_TRANSACTION_LOG, params).await
    }

    pub async fn get_mmp_state(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_MMP_STATE, params).await
    }

    pub async fn get_instruments_info(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_INSTRUMENTS_INFO, params).await
    }

    pub async fn query_dcp_info(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&QUERY_DCP_INFO, params).await
    }

    pub async fn get_smp_group(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_SMP_GROUP, params).await
    }

    /// `limitPxAction` is `ForceAdjust` or `RejectOrder`.
    pub async fn set_limit_price_action(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&SET_LIMIT_PRICE_ACTION, params).await
    }
}
