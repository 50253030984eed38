use std::sync::Arc;

use reship_core::config;
use reship_core::domain::order::ShippingAddress;
use reship_core::domain::product::NewProduct;
use reship_core::metrics::Metrics;
use reship_core::telemetry;
use reship_core::OrderService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    telemetry::init();

    tracing::info!("🚀 Starting order lifecycle demo");

    // === 1. Configuration and storage ===
    let config = config::load_config()?;
    let metrics = Arc::new(Metrics::new()?);
    let service = OrderService::from_config(&config)
        .await?
        .with_metrics(metrics.clone());

    // === 2. Catalog ===
    let product = service
        .add_product(
            NewProduct::from_url("Wireless earbuds", "https://aliexpress.com/item/1005001", 29.99)?
                .with_weight(0.5),
        )
        .await?;

    let quote = service.quote_product(&product.id).await?;
    tracing::info!(
        product = %product.name,
        total = %format!("{:.2}", quote.cost.total),
        profit = %format!("{:.2}", quote.revenue.total_profit),
        "💰 Quote"
    );

    // === 3. Place an order ===
    let address = ShippingAddress {
        full_name: "Carlos Rodríguez".to_string(),
        street: "Calle 72 con Av. 3E, Edif. Lago".to_string(),
        city: "Maracaibo".to_string(),
        state: "Zulia".to_string(),
        postal_code: "4002".to_string(),
        country: "VE".to_string(),
        phone: None,
    };
    let order = service
        .place_order(&product.id, "cust-demo", "carlos@example.com", address)
        .await?;

    tracing::info!(
        order_id = %order.id,
        tracking_number = %order.tracking_number,
        "✅ Order placed"
    );

    // === 4. Run the simulation to completion ===
    loop {
        let report = service.tick().await?;
        if report.advanced.is_empty() {
            break;
        }
    }

    let finished = service.get_order_by_tracking(&order.tracking_number).await?;
    for event in finished.tracking_events.iter().rev() {
        tracing::info!(
            at = %event.timestamp.format("%Y-%m-%d"),
            location = %event.location,
            "{}",
            event.title
        );
    }

    let summary = service.revenue_summary().await?;
    tracing::info!(
        orders = summary.order_count,
        completed = summary.completed_count,
        gross_sales = %format!("{:.2}", summary.gross_sales),
        profit = %format!("{:.2}", summary.total_profit),
        "📊 Revenue summary"
    );

    println!("{}", metrics.render()?);

    tracing::info!("🎉 Demo complete!");
    Ok(())
}
