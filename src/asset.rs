//! Transfer, deposit and withdrawal endpoints.

use crate::{endpoint::Endpoint, AbfinanceClient, ApiResponse, Params, Result};

pub const GET_COIN_EXCHANGE_RECORDS: Endpoint =
    Endpoint::private_get("/v5/asset/exchange/order-record", &[]);
pub const GET_ALL_COINS_BALANCE: Endpoint = Endpoint::private_get(
    "/v5/asset/transfer/query-account-coins-balance",
    &["accountType"],
);
pub const GET_SINGLE_COIN_BALANCE: Endpoint = Endpoint::private_get(
    "/v5/asset/transfer/query-account-coin-balance",
    &["accountType", "coin"],
);
pub const GET_TRANSFERABLE_COIN: Endpoint = Endpoint::private_get(
    "/v5/asset/transfer/query-transfer-coin-list",
    &["fromAccountType", "toAccountType"],
);
pub const CREATE_INTERNAL_TRANSFER: Endpoint = Endpoint::private_post(
    "/v5/asset/transfer/inter-transfer",
    &["transferId", "coin", "amount", "fromAccountType", "toAccountType"],
);
pub const GET_INTERNAL_TRANSFER_RECORDS: Endpoint =
    Endpoint::private_get("/v5/asset/transfer/query-inter-transfer-list", &[]);
pub const GET_SUB_UID: Endpoint =
    Endpoint::private_get("/v5/asset/transfer/query-sub-member-list", &[]);
pub const CREATE_UNIVERSAL_TRANSFER: Endpoint = Endpoint::private_post(
    "/v5/asset/transfer/universal-transfer",
    &[
        "transferId",
        "coin",
        "amount",
        "fromMemberId",
        "toMemberId",
        "fromAccountType",
        "toAccountType",
    ],
);
pub const GET_UNIVERSAL_TRANSFER_RECORDS: Endpoint =
    Endpoint::private_get("/v5/asset/transfer/query-universal-transfer-list", &[]);
pub const SET_DEPOSIT_ACCOUNT: Endpoint =
    Endpoint::private_post("/v5/asset/deposit/deposit-to-account", &["accountType"]);
pub const GET_DEPOSIT_RECORDS: Endpoint =
    Endpoint::private_get("/v5/asset/deposit/query-record", &[]);
pub const GET_SUB_ACCOUNT_DEPOSIT_RECORDS: Endpoint =
    Endpoint::private_get("/v5/asset/deposit/query-sub-member-record", &["subMemberId"]);
pub const GET_INTERNAL_DEPOSIT_RECORDS: Endpoint =
    Endpoint::private_get("/v5/asset/deposit/query-internal-record", &[]);
pub const GET_MASTER_DEPOSIT_ADDRESS: Endpoint =
    Endpoint::private_get("/v5/asset/deposit/query-address", &["coin"]);
pub const GET_SUB_DEPOSIT_ADDRESS: Endpoint = Endpoint::private_get(
    "/v5/asset/deposit/query-sub-member-address",
    &["coin", "chainType", "subMemberId"],
);
pub const GET_COIN_INFO: Endpoint = Endpoint::private_get("/v5/asset/coin/query-info", &[]);
pub const GET_WITHDRAWAL_ADDRESS_LIST: Endpoint =
    Endpoint::private_get("/v5/asset/withdraw/query-address", &[]);
pub const GET_WITHDRAWAL_RECORDS: Endpoint =
    Endpoint::private_get("/v5/asset/withdraw/query-record", &[]);
pub const GET_WITHDRAWABLE_AMOUNT: Endpoint =
    Endpoint::private_get("/v5/asset/withdraw/withdrawable-amount", &["coin"]);
pub const WITHDRAW: Endpoint = Endpoint::private_post(
    "/v5/asset/withdraw/create",
    &["coin", "chain", "address", "amount", "timestamp"],
);
pub const CANCEL_WITHDRAWAL: Endpoint = Endpoint::private_post("/v5/asset/withdraw/cancel", &["id"]);

/// Asset capability of an [`AbfinanceClient`].
#[derive(Clone, Copy, Debug)]
pub struct AssetApi<'a> {
    client: &'a AbfinanceClient,
}

impl<'a> AssetApi<'a> {
    pub(crate) fn new(client: &'a AbfinanceClient) -> Self {
        Self { client }
    }

    pub async fn get_coin_exchange_records(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_COIN_EXCHANGE_RECORDS, params).await
    }

    /// Balances of every coin in one account type; `memberId` selects a sub account.
    pub async fn get_coins_balance(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_ALL_COINS_BALANCE, params).await
    }

    pub async fn get_coin_balance(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_SINGLE_COIN_BALANCE, params).await
    }

    pub async fn get_transferable_coin(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_TRANSFERABLE_COIN, params).await
    }

    /// `transferId` must be a caller-generated UUID.
    pub async fn create_internal_transfer(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&CREATE_INTERNAL_TRANSFER, params).await
    }

    pub async fn get_internal_transfer_records(
        &self,
        params: impl Into<Params>,
    ) -> Result<ApiResponse> {
        self.client.call(&GET_INTERNAL_TRANSFER_RECORDS, params).await
    }

    pub async fn get_sub_uid(&self) -> Result<ApiResponse> {
        self.client.call(&GET_SUB_UID, ()).await
    }

    pub async fn create_universal_transfer(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&CREATE_UNIVERSAL_TRANSFER, params).await
    }

    pub async fn get_universal_transfer_records(
        &self,
        params: impl Into<Params>,
    ) -> Result<ApiResponse> {
        self.client.call(&GET_UNIVERSAL_TRANSFER_RECORDS, params).await
    }

    pub async fn set_deposit_account(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&SET_DEPOSIT_ACCOUNT, params).await
    }

    pub async fn get_deposit_records(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_DEPOSIT_RECORDS, params).await
    }

    pub async fn get_sub_deposit_records(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_SUB_ACCOUNT_DEPOSIT_RECORDS, params).await
    }

    pub async fn get_internal_deposit_records(
        &self,
        params: impl Into<Params>,
    ) -> Result<ApiResponse> {
        self.client.call(&GET_INTERNAL_DEPOSIT_RECORDS, params).await
    }

    pub async fn get_master_deposit_address(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_MASTER_DEPOSIT_ADDRESS, params).await
    }

    pub async fn get_sub_deposit_address(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_SUB_DEPOSIT_ADDRESS, params).await
    }

    pub async fn get_coin_info(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_COIN_INFO, params).await
    }

    pub async fn get_withdrawal_address_list(
        &self,
        params: impl Into<Params>,
    ) -> Result<ApiResponse> {
        self.client.call(&GET_WITHDRAWAL_ADDRESS_LIST, params).await
    }

    pub async fn get_withdrawal_records(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_WITHDRAWAL_RECORDS, params).await
    }

    pub async fn get_withdrawable_amount(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&GET_WITHDRAWABLE_AMOUNT, params).await
    }

    /// `timestamp` (epoch millis) guards against withdrawal replay.
    pub async fn withdraw(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&WITHDRAW, params).await
    }

    pub async fn cancel_withdrawal(&self, params: impl Into<Params>) -> Result<ApiResponse> {
        self.client.call(&CANCEL_WITHDRAWAL, params).await
    }
}
