mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::Config;
use resource_client::client::ClientConfig;
use resource_client::resource::{registry, Payload};
use resource_client::{
    build_payload_from_extracted_params, EndpointVersion, ExtractedParam, InvokeResponse, ResourceClient,
    ResourceKind, WireLayout,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Build, send and decode resource invocation payloads
#[derive(Parser, Debug)]
#[command(name = "resource-client", version, about, long_about = None)]
struct Args {
    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a payload from recorded call parameters and print it
    Build {
        #[command(flatten)]
        call: CallArgs,
    },
    /// Build a payload and send it
    Invoke {
        #[command(flatten)]
        call: CallArgs,

        /// Resource id to invoke
        #[arg(long)]
        resource: String,

        /// Application id (falls back to saved config)
        #[arg(long)]
        app: Option<String>,

        /// Server base URL (falls back to $RESOURCE_CLIENT_BASE_URL, then saved config)
        #[arg(long)]
        base_url: Option<String>,

        /// JWT sent as x-major-jwt (falls back to $MAJOR_JWT_TOKEN)
        #[arg(long)]
        jwt: Option<String>,

        /// Invoke route version
        #[arg(long, value_enum)]
        endpoint: Option<EndpointArg>,

        /// Invocation key (random UUID when omitted)
        #[arg(long)]
        invocation_key: Option<String>,
    },
    /// Decode a saved invoke response (or a wire payload with --payload)
    Decode {
        file: PathBuf,

        /// Treat the file as a wire payload instead of a response
        #[arg(long)]
        payload: bool,
    },
    /// Save default connection settings
    Config {
        #[arg(long)]
        base_url: Option<String>,

        #[arg(long)]
        app: Option<String>,

        #[arg(long, value_enum)]
        endpoint: Option<EndpointArg>,
    },
    /// List supported resource kinds
    Kinds,
}

#[derive(clap::Args, Debug)]
struct CallArgs {
    /// Resource subtype, e.g. postgresql or cosmosdb
    #[arg(long)]
    subtype: String,

    /// Client method, e.g. invoke or query
    #[arg(long, default_value = "invoke")]
    method: String,

    /// Recorded parameters (JSON or YAML list of {name, value, valueType})
    #[arg(long)]
    params: PathBuf,

    /// Wire layout (defaults to the kind's own)
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    Flat,
    Embedded,
}

impl From<LayoutArg> for WireLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Flat => WireLayout::Flat,
            LayoutArg::Embedded => WireLayout::Embedded,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EndpointArg {
    V2,
    Legacy,
}

impl From<EndpointArg> for EndpointVersion {
    fn from(arg: EndpointArg) -> Self {
        match arg {
            EndpointArg::V2 => EndpointVersion::V2,
            EndpointArg::Legacy => EndpointVersion::Legacy,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("resource-client started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("resource-client").join("resource-client.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".resource-client").join("resource-client.log");
    }
    PathBuf::from("resource-client.log")
}

/// Read a JSON or YAML file, chosen by extension
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );

    if is_yaml {
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse YAML {:?}", path))
    } else {
        serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON {:?}", path))
    }
}

fn build_from_call(call: &CallArgs) -> Result<Payload> {
    let params: Vec<ExtractedParam> = read_document(&call.params)?;
    tracing::debug!("Loaded {} recorded params from {:?}", params.len(), call.params);
    build_payload_from_extracted_params(&call.subtype, &call.method, &params)
        .with_context(|| format!("Failed to build {} payload", call.subtype))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_build(call: &CallArgs) -> Result<()> {
    let payload = build_from_call(call)?;
    let wire = match call.layout {
        Some(layout) => payload.to_wire(layout.into()),
        None => payload.to_default_wire(),
    }?;
    print_json(&wire)
}

async fn run_invoke(
    call: &CallArgs,
    resource: &str,
    app: Option<&str>,
    base_url: Option<&str>,
    jwt: Option<&str>,
    endpoint: Option<EndpointArg>,
    invocation_key: Option<String>,
) -> Result<bool> {
    let saved = Config::load();
    let base_url = saved
        .effective_base_url(base_url)
        .context("No base URL: pass --base-url, set RESOURCE_CLIENT_BASE_URL, or run `resource-client config`")?;
    let app = saved
        .effective_application_id(app)
        .context("No application id: pass --app or run `resource-client config`")?;

    let mut client_config = ClientConfig::new(&base_url, &app, resource)?
        .with_endpoint(saved.effective_endpoint(endpoint.map(Into::into)));
    if let Some(token) = config::effective_jwt(jwt) {
        client_config = client_config.with_jwt(token);
    }
    if let Some(layout) = call.layout {
        client_config = client_config.with_layout(layout.into());
    }

    let kind: ResourceKind = call.subtype.parse()?;
    let client = ResourceClient::new(client_config, kind)?;
    let payload = build_from_call(call)?;
    let key = invocation_key.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::info!("Invoking {} at {} with key {}", kind, client.invoke_url(), key);
    let response = client.send(&payload, &key).await?;
    print_json(&response)?;
    Ok(response.is_ok())
}

fn run_decode(file: &Path, payload: bool) -> Result<bool> {
    let value: serde_json::Value = read_document(file)?;
    if payload {
        let (decoded, layout) = Payload::from_wire(&value)?;
        println!(
            "kind: {}  category: {}  layout: {}  operation: {}",
            decoded.kind(),
            decoded.category().as_str(),
            layout.as_str(),
            decoded.operation().unwrap_or("-")
        );
        return Ok(true);
    }

    let response: InvokeResponse = serde_json::from_value(value).context("Not a valid invoke response")?;
    match &response {
        InvokeResponse::Success(success) => {
            println!("ok  request_id={}  kind={}", success.request_id, success.result.kind());
        },
        InvokeResponse::Failure(failure) => {
            let status = failure
                .error
                .http_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "failed  request_id={}  http_status={}  message={}",
                failure.request_id, status, failure.error.message
            );
        },
    }
    print_json(&response)?;
    Ok(response.is_ok())
}

fn run_config(base_url: Option<String>, app: Option<String>, endpoint: Option<EndpointArg>) -> Result<()> {
    if let Some(url) = &base_url {
        ClientConfig::new(url, "check", "check")?;
    }

    let mut saved = Config::load();
    saved.update(base_url, app, endpoint.map(Into::into));
    let path = saved.save()?;
    println!("Saved {:?}", path);
    print_json(&saved)
}

fn run_kinds() {
    let mut kinds: Vec<_> = registry::get_registry().iter().collect();
    kinds.sort_by_key(|(kind, _)| kind.as_str());

    for (kind, def) in kinds {
        let methods = if def.methods.is_empty() {
            "-".to_string()
        } else {
            def.methods.join(",")
        };
        println!(
            "{:<16} {:<9} {:<9} {:<24} {}",
            kind.as_str(),
            def.category.as_str(),
            def.layout.as_str(),
            def.display_name,
            methods
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let ok = match args.command {
        Command::Build { call } => {
            run_build(&call)?;
            true
        },
        Command::Invoke {
            call,
            resource,
            app,
            base_url,
            jwt,
            endpoint,
            invocation_key,
        } => {
            run_invoke(
                &call,
                &resource,
                app.as_deref(),
                base_url.as_deref(),
                jwt.as_deref(),
                endpoint,
                invocation_key,
            )
            .await?
        },
        Command::Decode { file, payload } => run_decode(&file, payload)?,
        Command::Config { base_url, app, endpoint } => {
            run_config(base_url, app, endpoint)?;
            true
        },
        Command::Kinds => {
            run_kinds();
            true
        },
    };

    if !ok {
        bail!("server reported failure");
    }
    Ok(())
}
