use abfinance_http::{AbfinanceClient, ClientOptions, Params};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let client = AbfinanceClient::public().with_options(ClientOptions {
        testnet: true,
        log_requests: true,
        record_request_time: true,
        ..ClientOptions::default()
    });

    let time = client.market().get_server_time().await?;
    println!("server time: {:?}", time.result());

    let tickers = client
        .market()
        .get_tickers(Params::new().with("category", "spot").with("symbol", "BTCUSDT"))
        .await?;
    println!("tickers ({:?}): {}", tickers.elapsed, tickers.body);

    let book = client
        .market()
        .get_orderbook([("category", "spot"), ("symbol", "BTCUSDT")])
        .await?;
    println!("orderbook: {}", book.body);

    Ok(())
}
