use std::{fs::OpenOptions, net::SocketAddr, process::exit, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::{Parser, ValueEnum};
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use ledger_rs::{AppState, Tenancy, build_router, graceful_shutdown, logging_middleware};

/// Whether transactions are shared or partitioned by session cookie.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum TenancyArg {
    /// Every caller sees every transaction.
    SingleTenant,
    /// Transactions belong to the session in the `sessionId` cookie.
    Session,
}

impl From<TenancyArg> for Tenancy {
    fn from(value: TenancyArg) -> Self {
        match value {
            TenancyArg::SingleTenant => Tenancy::SingleTenant,
            TenancyArg::Session => Tenancy::Session,
        }
    }
}

/// The REST API server for ledger_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The address to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3333)]
    port: u16,

    /// Whether transactions are partitioned by session cookie.
    #[arg(long, value_enum, default_value_t = TenancyArg::Session)]
    tenancy: TenancyArg,

    /// File path for the debug log.
    #[arg(long, default_value = "debug.log")]
    log_path: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(&args.log_path);

    let addr: SocketAddr = match format!("{}:{}", args.host, args.port).parse() {
        Ok(addr) => addr,
        Err(error) => {
            eprintln!("Invalid host {:?}: {error}", args.host);
            exit(1);
        }
    };

    let conn = Connection::open(&args.db_path).unwrap_or_else(|error| {
        eprintln!("Could not open database {:?}: {error}", args.db_path);
        exit(1);
    });
    let state = AppState::new(conn, args.tenancy.into()).unwrap_or_else(|error| {
        eprintln!("Could not initialize database {:?}: {error}", args.db_path);
        exit(1);
    });

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    tracing::info!(
        "HTTP server listening on {} in {:?} mode",
        addr,
        args.tenancy
    );
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        exit(1);
    }
}

fn setup_logging(log_path: &str) {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
