//! wish demo host.
//!
//! Serves a small context whose routes come from its member names:
//!
//! ```text
//! HandleRoot      → *    /
//! GetJSON         → GET  /json
//! GetError        → GET  /error
//! GetHelloByName  → GET  /hello/{name}
//! MountWeb        → *    /web/*  (static files)
//! ```

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use clap::Parser;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use wish::config::{load_config, validate_config, HostConfig};
use wish::http::{error, json, param, respond};
use wish::lifecycle::signals::shutdown_signal;
use wish::observability::{logging, metrics};
use wish::{bootstrap, Context, MethodSet, Provider};

#[derive(Parser)]
#[command(name = "wish")]
#[command(about = "Serve a context whose routes are derived from its method names", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Overrides `site.static_dir`.
    #[arg(short, long)]
    static_dir: Option<PathBuf>,
}

/// Per-request context of the demo site.
struct Site {
    static_dir: Arc<PathBuf>,
}

#[derive(Serialize)]
struct Greeting {
    hello: String,
}

impl Site {
    async fn handle_root(self, _req: Request) -> Response {
        respond("text/plain", StatusCode::OK, "is root")
    }

    async fn get_json(self, _req: Request) -> Response {
        json(StatusCode::OK, &serde_json::json!({ "a": "1" }))
    }

    async fn get_error(self, _req: Request) -> Response {
        error(StatusCode::METHOD_NOT_ALLOWED)
    }

    async fn get_hello_by_name(self, mut req: Request) -> Response {
        match param(&mut req, "name").await {
            Some(name) => json(StatusCode::OK, &Greeting { hello: name }),
            None => error(StatusCode::BAD_REQUEST),
        }
    }

    fn mount_web(&self) -> ServeDir {
        ServeDir::new(self.static_dir.as_path())
    }
}

impl Context for Site {
    fn methods(&self) -> MethodSet<Self> {
        MethodSet::new()
            .handler("HandleRoot", Self::handle_root)
            .handler("GetJSON", Self::get_json)
            .handler("GetError", Self::get_error)
            .handler("GetHelloByName", Self::get_hello_by_name)
            .mount("MountWeb", Self::mount_web)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => HostConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(dir) = cli.static_dir {
        config.site.static_dir = dir;
    }
    validate_config(&config).map_err(|errors| {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    })?;

    logging::init(&config.observability.log_filter)?;
    tracing::info!("wish v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let static_dir = Arc::new(config.site.static_dir.clone());
    let provider = Provider::from_fn(move || {
        Ok::<_, Infallible>(Site {
            static_dir: Arc::clone(&static_dir),
        })
    });
    let server = bootstrap(provider, config.middleware())?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        static_dir = %config.site.static_dir.display(),
        "Listening for connections"
    );

    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
