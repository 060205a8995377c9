//! House price CLI module
//!
//! Command-line interface for serving, one-shot prediction and model info.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::artifact::ModelPackage;
use crate::inference::predict_price;
use crate::server::{format_currency, ALGORITHM_NAME};
use crate::validation::{validate_input, RawFields};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "house-price")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "House price prediction service")]
#[command(long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Server port [env: API_PORT, default 5000]
        #[arg(short, long)]
        port: Option<u16>,

        /// Server host [env: API_HOST, default 0.0.0.0]
        #[arg(long)]
        host: Option<String>,

        /// Model artifact [env: MODEL_PATH]
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Predict the price of one house
    Predict {
        /// Model artifact
        #[arg(short, long, default_value = crate::artifact::DEFAULT_MODEL_PATH)]
        model: PathBuf,

        /// Overall material and finish quality (1-10)
        #[arg(long)]
        overall_qual: String,

        /// Above grade living area in sq ft
        #[arg(long)]
        gr_liv_area: String,

        /// Total basement area in sq ft
        #[arg(long)]
        total_bsmt_sf: String,

        /// Garage capacity in cars (0-4)
        #[arg(long)]
        garage_cars: String,

        /// Original construction year
        #[arg(long)]
        year_built: String,

        /// Neighborhood name
        #[arg(long)]
        neighborhood: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show model metrics and neighborhoods
    Info {
        /// Model artifact
        #[arg(short, long, default_value = crate::artifact::DEFAULT_MODEL_PATH)]
        model: PathBuf,
    },
}

/// Raw inputs of the `predict` subcommand
pub struct PredictArgs<'a> {
    pub overall_qual: &'a str,
    pub gr_liv_area: &'a str,
    pub total_bsmt_sf: &'a str,
    pub garage_cars: &'a str,
    pub year_built: &'a str,
    pub neighborhood: &'a str,
}

impl PredictArgs<'_> {
    fn to_fields(&self) -> RawFields {
        [
            ("overall_qual", self.overall_qual),
            ("gr_liv_area", self.gr_liv_area),
            ("total_bsmt_sf", self.total_bsmt_sf),
            ("garage_cars", self.garage_cars),
            ("year_built", self.year_built),
            ("neighborhood", self.neighborhood),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

fn load_model(path: &Path) -> anyhow::Result<ModelPackage> {
    step_run(&format!("Loading {}", path.display()));
    let start = Instant::now();
    let package = ModelPackage::load(path)?;
    step_done(&format!(
        "{} trees (depth {}), {} features in {:?}",
        package.model.n_estimators(),
        package.model.max_depth(),
        package.feature_columns.len(),
        start.elapsed()
    ));
    Ok(package)
}

pub fn cmd_predict(model_path: &Path, args: &PredictArgs<'_>, json: bool) -> anyhow::Result<()> {
    let features = validate_input(&args.to_fields())?;

    if json {
        let package = ModelPackage::load(model_path)?;
        let prediction = predict_price(&package, &features)?;
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    section("Predict");
    let package = load_model(model_path)?;
    let prediction = predict_price(&package, &features)?;

    println!();
    println!(
        "  {:<16} {}",
        muted("Price"),
        format_currency(prediction.predicted_price).white().bold()
    );
    println!(
        "  {:<16} {} - {}",
        muted(&format!("{}% interval", prediction.confidence)),
        format_currency(prediction.lower_bound),
        format_currency(prediction.upper_bound)
    );
    println!("  {:<16} {:.4}", muted("Model R²"), prediction.model_r2);
    println!("  {:<16} {}", muted("Model RMSE"), format_currency(prediction.model_rmse));
    println!();

    Ok(())
}

pub fn cmd_info(model_path: &Path) -> anyhow::Result<()> {
    section("Model Info");

    let package = load_model(model_path)?;
    let metrics = &package.metrics;

    println!();
    println!("  {:<14} {}", muted("Algorithm"), ALGORITHM_NAME);
    println!("  {:<14} {}", muted("Estimators"), package.model.n_estimators());
    println!("  {:<14} {}", muted("Max depth"), package.model.max_depth());
    println!("  {:<14} {}", muted("Leaves"), package.model.n_leaves());
    println!("  {:<14} {}", muted("Features"), package.selected_features().join(", "));
    println!("  {:<14} {:.4}", muted("Test R²"), metrics.test.r2);
    println!("  {:<14} {:.2}", muted("Test RMSE"), metrics.test.rmse);
    println!("  {:<14} {:.2}", muted("Test MAE"), metrics.test.mae);
    println!("  {:<14} {:.4} ± {:.4}", muted("CV R²"), metrics.cv_mean, metrics.cv_std);
    println!();

    let neighborhoods = package.sorted_neighborhoods();
    println!("  {} {}", muted("Neighborhoods"), dim(&format!("({})", neighborhoods.len())));
    println!("  {}", dim(&"─".repeat(50)));
    for chunk in neighborhoods.chunks(6) {
        println!("  {}", chunk.join("  "));
    }
    println!();

    Ok(())
}

// ─── Serve ─────────────────────────────────────────────────────────────────────

pub async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    model: Option<PathBuf>,
) -> anyhow::Result<()> {
    use crate::server::{run_server, ServerConfig};

    let defaults = ServerConfig::default();
    let config = ServerConfig {
        host: host.unwrap_or(defaults.host),
        port: port.unwrap_or(defaults.port),
        model_path: model.unwrap_or(defaults.model_path),
        ..defaults
    };

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "House Price Prediction".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Form   ", &format!("http://{}:{}", config.host, config.port)));
    line_box(&kv("API    ", &format!("http://{}:{}/api/predict", config.host, config.port)));
    line_box(&kv("Health ", &format!("http://{}:{}/health", config.host, config.port)));
    line_box(&kv("Model  ", &config.model_path.display().to_string()));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    run_server(config).await
}
