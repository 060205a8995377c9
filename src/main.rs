//! House Price Prediction - Main Entry Point
//!
//! Serves the prediction form and JSON API, or runs one-off predictions from the shell.

use clap::Parser;
use house_price::cli::{cmd_info, cmd_predict, cmd_serve, Cli, Commands, PredictArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "house_price=debug,tower_http=debug"
    } else {
        "house_price=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    match cli.command {
        Some(Commands::Serve { port, host, model }) => {
            cmd_serve(host, port, model).await?;
        }
        Some(Commands::Predict {
            model,
            overall_qual,
            gr_liv_area,
            total_bsmt_sf,
            garage_cars,
            year_built,
            neighborhood,
            json,
        }) => {
            let args = PredictArgs {
                overall_qual: &overall_qual,
                gr_liv_area: &gr_liv_area,
                total_bsmt_sf: &total_bsmt_sf,
                garage_cars: &garage_cars,
                year_built: &year_built,
                neighborhood: &neighborhood,
            };
            cmd_predict(&model, &args, json)?;
        }
        Some(Commands::Info { model }) => {
            cmd_info(&model)?;
        }
        None => {
            // Default: serve with environment configuration
            cmd_serve(None, None, None).await?;
        }
    }

    Ok(())
}
