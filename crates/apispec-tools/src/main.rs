//! apispec-tools CLI.
//!
//! Writes the API docs of an application described by a config file, or
//! serves it with the docs endpoints and optional response validation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use apispec_telemetry::{log_startup, LogFormat, TelemetryConfig};
use apispec_tools::server::{self, ServerConfig};
use apispec_tools::{
    ApiDocs, AppFile, ConfigError, GenerateApiDocs, GenerateOutcome, InitError, InitOptions,
};

#[derive(Parser, Debug)]
#[command(name = "apispec-tools", about = "OpenAPI docs for your application", version)]
struct Cli {
    /// Application config file.
    #[arg(
        long,
        global = true,
        env = "APISPEC_CONFIG",
        default_value = "apispec.yaml"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the API docs file.
    GenerateApiDocs(GenerateApiDocs),

    /// Serve the application's mock endpoints and the docs endpoints.
    Serve {
        /// Listen address.
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,

        /// Check every response against the API docs.
        #[arg(long)]
        validate: bool,

        /// Log level.
        #[arg(long, default_value = "info")]
        log_level: String,

        /// Log format (json or pretty).
        #[arg(long, default_value = "json")]
        log_format: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::GenerateApiDocs(command) => run_generate(&cli.config, &command),
        Commands::Serve {
            listen,
            validate,
            log_level,
            log_format,
        } => run_serve(&cli.config, &listen, validate, &log_level, &log_format).await,
    }
}

/// Load the config file and build the docs context.
///
/// An invalid `docs_type` is user-facing and goes to stdout; anything else
/// is an error on stderr.
fn load(config_path: &Path) -> Result<(AppFile, ApiDocs), ExitCode> {
    let file = AppFile::load(config_path).map_err(|e| {
        eprintln!("error: {}", e);
        ExitCode::from(1)
    })?;

    let registry = file.registry().map_err(|e| {
        eprintln!("error: {}", e);
        ExitCode::from(1)
    })?;

    let init = file
        .docs_config()
        .map_err(InitError::from)
        .and_then(|config| ApiDocs::init(config, registry, InitOptions::new()));

    match init {
        Ok(docs) => Ok((file, docs)),
        Err(InitError::Config(err @ ConfigError::InvalidDocsType)) => {
            println!("{}", err);
            Err(ExitCode::from(1))
        }
        Err(e) => {
            eprintln!("error: {}", e);
            Err(ExitCode::from(1))
        }
    }
}

fn run_generate(config_path: &Path, command: &GenerateApiDocs) -> ExitCode {
    // Prompts own stdout; log events go to stderr and stay quiet unless
    // RUST_LOG asks for them.
    let telemetry = TelemetryConfig::new().with_log_level("warn");
    if let Err(e) = apispec_telemetry::init_logging(&telemetry) {
        eprintln!("error: {}", e);
        return ExitCode::from(1);
    }

    let docs = match load(config_path) {
        Ok((_, docs)) => docs,
        Err(code) => return code,
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    match command.run(&docs, &mut input, &mut output) {
        Ok(GenerateOutcome::Created(_)) | Ok(GenerateOutcome::Aborted) => ExitCode::SUCCESS,
        Ok(GenerateOutcome::InvalidConfig) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn run_serve(
    config_path: &Path,
    listen: &str,
    validate: bool,
    log_level: &str,
    log_format: &str,
) -> ExitCode {
    let Some(log_format) = LogFormat::parse(log_format) else {
        eprintln!("error: invalid log format: {} (expected json or pretty)", log_format);
        return ExitCode::from(1);
    };
    let telemetry = TelemetryConfig::new()
        .with_log_level(log_level)
        .with_log_format(log_format);
    if let Err(e) = apispec_telemetry::init_logging(&telemetry) {
        eprintln!("error: {}", e);
        return ExitCode::from(1);
    }

    let listen_addr: SocketAddr = match listen.parse() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("error: invalid listen address {}: {}", listen, e);
            return ExitCode::from(1);
        }
    };

    let (file, docs) = match load(config_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    let app = match file.mock_router() {
        Ok(app) => app,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    log_startup!(
        service = %telemetry.service_name,
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        endpoints = docs.registry().endpoints().len(),
        "starting"
    );

    let config = ServerConfig {
        listen_addr,
        docs: Arc::new(docs),
        app,
        validate,
    };

    match server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
