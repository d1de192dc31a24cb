use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use simi_db::{
    DEFAULT_FORWARD_SOURCE, DEFAULT_REVERSE_SOURCE, Dictionary, DictionarySources, LoadMode,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use simi_server::{AppState, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const MAX_PAGE_SIZE: usize = 500;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("binding to {}:{}", config.host, config.port);
    info!(
        "using dictionaries {} (qe) and {} (eq), mode {:?}",
        config.sources.forward.display(),
        config.sources.reverse.display(),
        config.sources.mode
    );
    if config.disable_cache {
        info!("cache headers disabled");
    }

    let start = Instant::now();
    let dictionary = Arc::new(Dictionary::open(&config.sources));
    let counts = dictionary.counts();
    info!(
        "dictionary ready in {} ms ({} qe + {} eq entries)",
        start.elapsed().as_millis(),
        counts.forward,
        counts.reverse
    );

    let state = AppState {
        dictionary,
        max_page_size: MAX_PAGE_SIZE,
        disable_cache: config.disable_cache,
    };

    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    host: String,
    port: u16,
    sources: DictionarySources,
    disable_cache: bool,
}

fn load_config() -> Config {
    let mut disable_cache = false;
    let mut cli_forward: Option<PathBuf> = None;
    let mut cli_reverse: Option<PathBuf> = None;
    let mut cli_mode: Option<LoadMode> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--no-cache" => disable_cache = true,
            "--forward" => cli_forward = args.next().map(PathBuf::from),
            "--reverse" => cli_reverse = args.next().map(PathBuf::from),
            _ => {
                if let Some(path) = arg.strip_prefix("--forward=") {
                    cli_forward = Some(PathBuf::from(path));
                } else if let Some(path) = arg.strip_prefix("--reverse=") {
                    cli_reverse = Some(PathBuf::from(path));
                } else if let Some(mode) = arg.strip_prefix("--load-mode=") {
                    cli_mode = LoadMode::parse(mode);
                }
            }
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let forward = cli_forward
        .or_else(|| env::var("SIMI_FORWARD_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FORWARD_SOURCE));
    let reverse = cli_reverse
        .or_else(|| env::var("SIMI_REVERSE_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REVERSE_SOURCE));
    let mode = cli_mode
        .or_else(|| {
            env::var("SIMI_LOAD_MODE")
                .ok()
                .as_deref()
                .and_then(LoadMode::parse)
        })
        .unwrap_or_default();

    Config {
        host,
        port,
        sources: DictionarySources::new(forward, reverse).with_mode(mode),
        disable_cache,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
