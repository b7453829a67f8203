use abfinance_http::{AbfinanceClient, Params, Value};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // ABFINANCE_API_KEY / ABFINANCE_API_SECRET, ABFINANCE_TESTNET=1
    let client = AbfinanceClient::from_env()?;
    let trade = client.trade();

    let order = trade
        .place_order(
            Params::new()
                .with("category", "spot")
                .with("symbol", "BTCUSDT")
                .with("side", "Buy")
                .with("orderType", "Limit")
                .with("qty", "0.001")
                .with("price", 50000),
        )
        .await?;
    println!("placed: {}", order.body);

    let order_id = order
        .result()
        .and_then(|result| result.get("orderId"))
        .and_then(|id| id.as_str())
        .map(str::to_owned);

    println!(
        "open orders: {}",
        trade
            .get_open_orders([("category", "spot"), ("symbol", "BTCUSDT")])
            .await?
            .body
    );

    if let Some(order_id) = order_id {
        let amended = trade
            .amend_order(
                Params::new()
                    .with("category", "spot")
                    .with("symbol", "BTCUSDT")
                    .with("orderId", order_id.as_str())
                    .with("price", "49000"),
            )
            .await?;
        println!("amended: {}", amended.body);

        let cancelled = trade
            .cancel_order(
                Params::new()
                    .with("category", "spot")
                    .with("symbol", "BTCUSDT")
                    .with("orderId", order_id),
            )
            .await?;
        println!("cancelled: {}", cancelled.body);
    }

    let batch = trade
        .place_batch_order(Params::new().with("category", "spot").with(
            "request",
            Value::json(json!([
                {"symbol": "BTCUSDT", "side": "Buy", "orderType": "Limit", "qty": "0.001", "price": "48000"},
                {"symbol": "BTCUSDT", "side": "Buy", "orderType": "Limit", "qty": "0.001", "price": "47000"}
            ])),
        ))
        .await?;
    println!("batch: {}", batch.body);

    println!(
        "cancel all: {}",
        trade.cancel_all_orders([("category", "spot"), ("symbol", "BTCUSDT")]).await?.body
    );

    let executions = trade
        .get_executions(
            Params::new()
                .with("category", "spot")
                .with("symbol", "BTCUSDT")
                .with("limit", 5),
        )
        .await?;
    println!("executions: {}", executions.body);

    Ok(())
}
