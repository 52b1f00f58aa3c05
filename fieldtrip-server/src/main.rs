use std::sync::Arc;

use fieldtrip_server::config::AppConfig;
use fieldtrip_server::credentials::{CredentialProvider, EnvCredentials};
use fieldtrip_server::datastore::DatastoreClient;
use fieldtrip_server::fieldtrip::FieldTripService;
use fieldtrip_server::otp::OtpClient;
use fieldtrip_server::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG overrides, e.g. RUST_LOG=fieldtrip_server=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    // Credentials are read per request; warn early if they are missing
    if let Err(e) = EnvCredentials.credentials() {
        warn!(error = %e, "datastore calls will fail until credentials are set");
    }

    let otp = OtpClient::new(config.otp.clone())?;
    let datastore = DatastoreClient::new(config.datastore.clone(), Arc::new(EnvCredentials))?;
    let capacities = config.planning.capacities.clone();
    let service = FieldTripService::new(otp, datastore, config.planning.clone())
        .with_default_group_size(config.default_group_size);

    let app = create_router(AppState::new(service, capacities));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        planner = %config.otp.base_url,
        datastore = %config.datastore.base_url,
        "field trip planner listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
