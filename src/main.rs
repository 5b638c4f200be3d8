mod app;
mod ui;

use anyhow::{Context, Result};
use app::InsightDashApp;
use clap::Parser;
use eframe::egui;
use insight_dash::cli::Cli;
use insight_dash::state::AppState;
use insight_dash::{DashboardSummary, load_orders, load_rules};

fn main() -> Result<()> {
    env_logger::init();
    run(Cli::parse()).inspect_err(|e| log::error!("{e:#}"))
}

fn run(cli: Cli) -> Result<()> {
    let orders = load_orders(&cli.orders)
        .with_context(|| format!("loading orders from {}", cli.orders.display()))?;
    let rules = load_rules(&cli.rules)
        .with_context(|| format!("loading association rules from {}", cli.rules.display()))?;
    let selection = cli.selection(&orders);

    if cli.summary {
        let summary = DashboardSummary::compute(&orders, &rules, &selection);
        println!("{}", summary.to_json().context("serializing summary")?);
        return Ok(());
    }

    let state = AppState::with_selection(orders, rules, selection);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Insightful Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(InsightDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
