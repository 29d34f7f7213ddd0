//! Example: Querying the tax status of a RUT.
//!
//! Run with: cargo run --example query_stc -- 76795561 8

use sii_stc::SiiClient;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output (optional)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut args = std::env::args().skip(1);
    let rut = args.next().unwrap_or_else(|| "76795561".to_string());
    let dv = args.next().unwrap_or_else(|| "8".to_string());

    let client = SiiClient::builder()
        // Optionally add proxy:
        // .proxy("http://127.0.0.1:8080")
        .timeout(Duration::from_secs(30))
        .build()?;

    match client.situacion_tributaria(&rut, &dv).await {
        Ok(status) => println!("{}", serde_json::to_string_pretty(&status)?),
        Err(e) => println!("Failed: {}", e),
    }

    Ok(())
}
