use order_assembly::config::OrdersConfig;
use order_assembly::lifecycle::{setup_tracing, OrderSystem};
use order_assembly::model::OrderRequest;
use order_assembly::orders::response_status;
use tracing::{info, info_span, Instrument};

/// Reads one order request as JSON from stdin, runs it, and prints the outcome.
#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = OrdersConfig::from_env().map_err(|e| e.to_string())?;
    let request: OrderRequest =
        serde_json::from_reader(std::io::stdin()).map_err(|e| format!("Invalid request: {e}"))?;

    let system = OrderSystem::with_http(&config).map_err(|e| e.to_string())?;

    info!("Submitting order");
    let result = system
        .workflow
        .create_order(request)
        .instrument(info_span!("order_submission"))
        .await;
    let status = response_status(&result);

    match &result {
        Ok(order) => {
            let body = serde_json::to_string_pretty(order).map_err(|e| e.to_string())?;
            println!("{status}\n{body}");
        }
        Err(e) => println!("{status}\n{}", e.public_message()),
    }

    system.shutdown().await
}
