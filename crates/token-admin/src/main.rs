//! Token Admin: a native dashboard for a lockup-capable ERC-20 token

use eframe::egui;
use eyre::WrapErr;

use token_admin_adapters::{
    AdapterConfig, Eip1193Adapter, StaticAddressResolver, TokenContractAdapter,
};
use token_admin_core::network::DEFAULT_CHAIN_ID;
use token_admin_core::Orchestrator;

mod app;
mod state;
mod ui;

fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Token Admin");

    let config = AdapterConfig::from_env().wrap_err("invalid TOKEN_ADMIN_* configuration")?;
    let controller = build_controller(config);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Token Admin")
            .with_inner_size([960.0, 760.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Token Admin",
        native_options,
        Box::new(|cc| Ok(Box::new(app::App::new(cc, controller)))),
    )
    .map_err(|e| eyre::eyre!("dashboard exited with error: {e}"))
}

fn build_controller(config: AdapterConfig) -> app::Controller {
    let wallet = Eip1193Adapter::with_config(config.clone());
    if wallet.is_deterministic() {
        tracing::warn!("no EIP-1193 proxy configured; using the deterministic wallet");
    }
    let resolver = StaticAddressResolver::new(config.contract_addresses.clone(), DEFAULT_CHAIN_ID);
    let contract = TokenContractAdapter::new(wallet.clone(), resolver.cell(), &config);

    Orchestrator::new(wallet, contract, state::DashboardUi::default())
        .with_resolver(Box::new(resolver))
        .with_gas_policy(config.gas_policy())
        .with_token_logo_url(config.token_logo_url.clone())
}
