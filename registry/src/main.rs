//! Taxpayer registry demo
//!
//! Walks through one session against the configured backend: load every
//! record, search for ID 2, then add a taxpayer through the form.
//!
//! # Usage
//!
//! ```bash
//! # In-memory backend seeded with one record
//! cargo run --bin taxpayer-registry
//!
//! # Real backend
//! REGISTRY_BACKEND_URL=http://localhost:4943/api cargo run --bin taxpayer-registry
//! ```

use taxpayer_registry::{
    Config, FormField, InMemoryTaxpayerClient, RegistryApp, RegistryError, Taxpayer, TaxpayerId,
    client,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), RegistryError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        backend = config.backend.url.as_deref().unwrap_or("in-memory"),
        response_policy = %config.controller.response_policy,
        rows_per_page = config.table.rows_per_page,
        "Configuration loaded"
    );

    let seed = InMemoryTaxpayerClient::with_taxpayers(vec![Taxpayer::new(
        TaxpayerId::new(1),
        "Ann",
        "Lee",
        "1 Main St",
    )]);
    let client = client::from_config_or(&config.backend, seed)?;

    let app = RegistryApp::with_client(&config, client);
    let settle = config.controller.settle_timeout();

    app.mount().await?;
    app.settle(settle).await?;
    println!("{}", app.view().await.render_text());

    println!(">>> Search by TID: 2\n");
    app.type_search("2").await?;
    app.search().await?;
    app.settle(settle).await?;
    println!("{}", app.view().await.render_text());

    println!(">>> Add New TaxPayer: Bo Ng, 2 Oak Rd\n");
    app.add_new().await?;
    app.edit_field(FormField::FirstName, "Bo").await?;
    app.edit_field(FormField::LastName, "Ng").await?;
    app.edit_field(FormField::Address, "2 Oak Rd").await?;
    app.submit_form().await?;
    app.settle(settle).await?;

    let view = app.view().await;
    println!("{}", view.render_text());
    tracing::info!(records = view.records.len(), form_open = view.is_form_open, "Session complete");

    app.store().shutdown(settle).await?;
    Ok(())
}
