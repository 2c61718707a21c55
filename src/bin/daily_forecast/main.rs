//! Daily forecast command-line entry point: serve the web page or export the table to files.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use daily_forecast::logging::setup_logger;
use daily_forecast::web::{self, AppState};
use daily_forecast::{load_config, save_output_files, AppConfig, DailyForecast};
use log::{error, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "daily-forecast")]
#[command(version, about = "Fetch a daily weather forecast and serve or export it", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the forecast page and JSON endpoint
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Fetch the forecast and write it as CSV and JSON
    Export {
        /// Directory the files are written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Fetch the forecast and print the table
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    setup_logger(&config.logging).context("Logger setup failed")?;
    info!(
        "starting daily-forecast version: {}",
        env!("CARGO_PKG_VERSION")
    );

    let forecast = DailyForecast::from_settings(&config.forecast)?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            web::serve(&config.server.address(), AppState::new(forecast))
                .await
                .context("Web server failed")?;
        }
        Commands::Export { output_dir } => {
            if let Some(dir) = output_dir {
                config.files.output_dir = dir;
            }
            let Ok(table) = forecast.fetch_table().await else {
                error!("Forecast export failed. Output files not created.");
                bail!("no forecast data available");
            };
            let files = &config.files;
            let report = save_output_files(
                &table,
                &files.output_dir,
                &files.csv_file,
                &files.json_file,
            );
            if !report.is_complete() {
                bail!("not every output file could be written");
            }
            info!(
                "Forecast files saved: {} rows x {} columns",
                table.height(),
                table.frame().width()
            );
        }
        Commands::Show => match forecast.fetch_table().await {
            Ok(table) => println!("{}", table),
            Err(e) => bail!("no forecast data available: {}", e),
        },
    }

    info!("daily-forecast finished");
    Ok(())
}
