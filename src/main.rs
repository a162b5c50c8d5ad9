mod cli;

use clap::Parser;
use cli::{non_blank, prompt, Cli, Commands};
use colored::*;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use staking_rewards_report::{
    config::Config,
    error::{self, RewardsError},
    network::Network,
    price::{self as price_lookup, PriceClient},
    report::{self, ReportBuilder, ReportMeta, RewardReport},
    rewards::{Quarter, RewardCollector, TimeWindow},
    subscan::SubscanClient,
    utils,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("staking_rewards_report=info,staking_rewards=info,warn")
            }),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Report {
            network,
            year,
            quarter,
            address,
            price,
            output_dir,
        } => match resolve_report_request(&config, network, year, quarter, address, price) {
            Ok(request) => {
                let output_dir = output_dir.unwrap_or_else(|| config.report.output_dir.clone());
                run_report(&config, request, Path::new(&output_dir)).await
            }
            Err(e) => Err(e),
        },

        Commands::Price { network } => show_price(&config, network).await,
    };

    if let Err(e) = result {
        error!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

/// Inputs of a report run after flags and prompts are merged
struct ReportRequest {
    network: Network,
    year: i32,
    quarter: Quarter,
    address: String,
    price: Option<f64>,
}

fn resolve_report_request(
    config: &Config,
    network: Option<Network>,
    year: Option<String>,
    quarter: Option<Quarter>,
    address: Option<String>,
    price: Option<String>,
) -> error::Result<ReportRequest> {
    let network = match network {
        Some(network) => network,
        None => prompt::select_network()?,
    };

    let year = match year {
        Some(year) => year,
        None => prompt::input_year()?,
    };
    if !prompt::is_valid_year(&year) {
        return Err(RewardsError::InvalidWindow(format!("invalid year: {}", year)));
    }
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| RewardsError::InvalidWindow(format!("invalid year: {}", year)))?;

    let quarter = match quarter {
        Some(quarter) => quarter,
        None => prompt::select_quarter()?,
    };

    let address = match non_blank(address) {
        Some(address) => address,
        None => prompt::input_address()?,
    };

    let price = match non_blank(price) {
        Some(price) => Some(price),
        None => prompt::input_price(&config.price.currency)?,
    };
    let price = price.as_deref().map(price_lookup::parse_price).transpose()?;

    Ok(ReportRequest {
        network,
        year,
        quarter,
        address,
        price,
    })
}

async fn run_report(
    config: &Config,
    request: ReportRequest,
    output_dir: &Path,
) -> error::Result<()> {
    let window = TimeWindow::for_quarter(request.year, request.quarter)?;
    let currency = config.price.currency.clone();

    let price = match request.price {
        Some(price) => price,
        None => {
            println!("Fetching token price for {} from CoinGecko...", request.network);
            let client =
                PriceClient::new(&config.price.base_url, &currency, config.request_timeout())?;
            let price = client.fetch_price(request.network).await?;
            println!(
                "Token price for {}: {}",
                request.network,
                utils::format_fiat(price, &currency)
            );
            price
        }
    };

    println!(
        "{}",
        format!(
            "Fetching staking rewards for {} on {} from {}...",
            request.address, request.network, window
        )
        .cyan()
    );

    let source = SubscanClient::new(
        config.endpoint_for(request.network),
        config.subscan.api_key.clone(),
        config.subscan.page_size,
        config.request_timeout(),
    )?;
    let mut collector = RewardCollector::new(source, config.collector_settings());
    let collection = collector.collect_detailed(&request.address, &window).await?;

    if !collection.stats.backoff_waits.is_empty() {
        info!(
            "Rate limited {} times during collection",
            collection.stats.backoff_waits.len()
        );
    }

    if collection.records.is_empty() {
        println!("{}", "No rewards found for the given period.".yellow());
        return Ok(());
    }

    let report = ReportBuilder::build(
        &collection.records,
        price,
        ReportMeta {
            network: request.network,
            year: request.year,
            quarter: request.quarter,
            address: request.address,
            currency,
        },
    );

    let path = report::write_csv(&report, output_dir)?;
    print_summary(&report);
    println!("\n{} {}", "✓ Spreadsheet created:".green(), path.display());

    Ok(())
}

fn print_summary(report: &RewardReport) {
    let meta = &report.meta;

    println!("\n{}", "=== Staking Rewards ===".cyan().bold());
    println!("Account:   {}", utils::format_address(&meta.address));
    println!("Network:   {}", meta.network.display_name());
    println!("Period:    {} {}", meta.year, meta.quarter);
    println!("Rewards:   {}", report.rows.len());
    println!("Total:     {}", utils::format_tokens(report.total_amount, meta.network));
    println!(
        "Value:     {} ({} per token)",
        utils::format_fiat(report.total_value, &meta.currency),
        utils::format_fiat(report.price, &meta.currency)
    );

    println!();
    utils::print_table_border(70);
    utils::print_table_row(&["Date", "Era", "Amount", "Value"], &[12, 8, 24, 18]);
    utils::print_table_border(70);
    for row in &report.rows {
        utils::print_table_row(
            &[
                &row.date,
                &row.era.to_string(),
                &utils::format_tokens(row.amount, meta.network),
                &utils::format_fiat(row.value, &meta.currency),
            ],
            &[12, 8, 24, 18],
        );
    }
    utils::print_table_border(70);
}

async fn show_price(config: &Config, network: Option<Network>) -> error::Result<()> {
    let network = match network {
        Some(network) => network,
        None => prompt::select_network()?,
    };

    let client = PriceClient::new(
        &config.price.base_url,
        &config.price.currency,
        config.request_timeout(),
    )?;
    let price = client.fetch_price(network).await?;

    println!(
        "{} ({}): {}",
        network.display_name(),
        network.symbol(),
        utils::format_fiat(price, client.currency()).green()
    );
    Ok(())
}
