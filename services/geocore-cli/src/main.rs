//! geoCore records CLI
//!
//! Runs a single records search or identifier lookup against a geoCore API
//! and prints the GeoJSON result.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geocore::{GeoCoreConfig, GeoCoreProvider, Locale, QueryRequest};
use records_protocol::ProviderError;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

/// geoCore records client
#[derive(Parser, Debug)]
#[command(name = "geocore-cli")]
#[command(about = "Query a geoCore API as OGC API - Records")]
struct Args {
    /// geoCore API root URL (overrides the provider definition)
    #[arg(long, env = "GEOCORE_BASE_URL")]
    base_url: Option<String>,

    /// Provider definition (YAML)
    #[arg(short, long, env = "GEOCORE_CONFIG")]
    config: Option<PathBuf>,

    /// Response language (e.g., en, fr-CA)
    #[arg(long, env = "GEOCORE_LANG")]
    lang: Option<Locale>,

    /// Log level
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Pretty-print the result
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search records
    Query {
        /// Bounding box as minx,miny,maxx,maxy
        #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
        bbox: Option<[f64; 4]>,

        /// Free-text search
        #[arg(long)]
        q: Option<String>,

        #[arg(long, default_value_t = 0)]
        startindex: u64,

        #[arg(long, default_value_t = 10)]
        limit: u64,

        #[arg(long, default_value = "results")]
        resulttype: String,

        /// Queryable as name=value (repeatable)
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,

        #[arg(long)]
        skip_geometry: bool,
    },

    /// Fetch one record by identifier
    Get {
        /// Record UUID
        id: String,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    let code = runtime.block_on(run(args))?;
    std::process::exit(code);
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Returns the process exit code.
async fn run(args: Args) -> Result<i32> {
    let mut config = match &args.config {
        Some(path) => GeoCoreConfig::load_from_file(path)
            .with_context(|| format!("Failed to load provider definition: {:?}", path))?,
        None => GeoCoreConfig::default(),
    };
    if let Some(base_url) = args.base_url {
        config.base_url = Some(base_url);
    }

    let provider = GeoCoreProvider::new(config).context("Failed to configure geoCore provider")?;
    info!(query_url = %provider.query_url(), "geoCore provider ready");

    let result = match args.command {
        Command::Query {
            bbox,
            q,
            startindex,
            limit,
            resulttype,
            properties,
            skip_geometry,
        } => {
            let request = QueryRequest {
                startindex,
                limit,
                resulttype,
                bbox,
                properties,
                skip_geometry,
                q,
                locale: args.lang,
                ..Default::default()
            };
            debug!(?request, "running query");
            provider
                .query(&request)
                .await
                .and_then(|response| to_json(&response))
        }
        Command::Get { id } => provider
            .get(&id, args.lang.as_ref())
            .await
            .and_then(|feature| to_json(&feature)),
    };

    let (output, code) = match result {
        Ok(value) => (value, 0),
        Err(err) => {
            tracing::error!(error = %err, status = err.status_code(), "request failed");
            let exception = serde_json::to_value(err.to_exception())
                .context("Failed to serialize exception")?;
            (exception, 1)
        }
    };

    let text = if args.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("Failed to serialize output")?;
    println!("{}", text);

    Ok(code)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, ProviderError> {
    serde_json::to_value(value)
        .map_err(|e| ProviderError::Configuration(format!("failed to serialize result: {}", e)))
}

fn parse_bbox(value: &str) -> Result<[f64; 4], String> {
    let parts = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid bbox coordinate: {}", e))?;

    match parts.as_slice() {
        [minx, miny, maxx, maxy] => Ok([*minx, *miny, *maxx, *maxy]),
        _ => Err(format!("bbox needs 4 values, got {}", parts.len())),
    }
}

fn parse_property(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((name, v)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), v.to_string()))
        }
        _ => Err(format!("expected name=value, got {:?}", value)),
    }
}
