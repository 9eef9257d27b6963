use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{routing, Extension, Router};
use clap::Parser;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

use crudkit::{MemoryRepository, Repository, UseCase};
use runtime::{AppConfig, CliArgs, RepoKind};
use todo::{model::Todo, storage::postgres::PostgresTodoRepository};
use users::{model::User, storage::postgres::PostgresUserRepository};

mod web;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Upper bound on a single request, storage calls included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Drain window for in-flight requests after a termination signal.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Todo service with swappable in-memory / PostgreSQL storage
#[derive(Parser)]
#[command(name = "todo-server", version)]
struct Cli {
    /// Port for the HTTP server (overrides SERVER_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity (-v debug, -vv trace; overrides LOG_LEVEL)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = AppConfig::from_env()?;
    cfg.apply_cli_overrides(&CliArgs {
        port: cli.port,
        verbose: cli.verbose,
    });

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    runtime::logging::init(&cfg.log_level)?;
    info!(
        port = cfg.server_port,
        log_level = %cfg.log_level,
        repo = cfg.repository.as_str(),
        "starting server"
    );

    let app = build_app(&cfg).await?;
    serve(app, cfg.server_port).await
}

/// Select the storage backend, wire a use case per resource and
/// assemble the application router.
async fn build_app(cfg: &AppConfig) -> Result<Router> {
    let (todo_repo, user_repo): (Arc<dyn Repository<Todo>>, Arc<dyn Repository<User>>) =
        match cfg.repository {
            RepoKind::Memory => (
                Arc::new(MemoryRepository::<Todo>::new()),
                Arc::new(MemoryRepository::<User>::new()),
            ),
            RepoKind::Postgres => {
                let pool = runtime::db::connect(&cfg.postgres()?).await?;

                let todo_repo = PostgresTodoRepository::new(pool.clone());
                todo_repo
                    .ensure_schema()
                    .await
                    .context("todo schema creation failed")?;

                let user_repo = PostgresUserRepository::new(pool);
                user_repo
                    .ensure_schema()
                    .await
                    .context("users schema creation failed")?;

                (Arc::new(todo_repo), Arc::new(user_repo))
            }
        };

    let todo_uc = Arc::new(UseCase::new(todo_repo));
    let user_uc = Arc::new(UseCase::new(user_repo));

    Ok(Router::new()
        .route("/", routing::get(web::metadata))
        .route("/health", routing::get(web::health))
        .route("/readiness", routing::get(web::readiness))
        .merge(todo::api::routes::router(todo_uc))
        .merge(users::api::routes::router(user_uc))
        .layer(Extension(web::Ready::spawn()))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http()))
}

/// Bind, serve until a termination signal arrives, then drain in-flight
/// requests within a bounded window.
async fn serve(app: Router, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "the service is ready to listen and serve");

    let cancel = CancellationToken::new();
    let shutdown = {
        let cancel = cancel.clone();
        async move {
            cancel.cancelled().await;
        }
    };

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    });

    tokio::select! {
        _ = wait_for_shutdown() => {
            warn!("got termination signal");
        }
        res = &mut server => {
            return Err(anyhow::anyhow!("server exited unexpectedly: {res:?}"));
        }
    }

    info!("the service is shutting down");
    cancel.cancel();
    match tokio::time::timeout(SHUTDOWN_TIMEOUT, server).await {
        Ok(res) => res.context("server task panicked")?.context("server error")?,
        Err(_) => warn!("shutdown deadline exceeded, aborting in-flight requests"),
    }
    info!("done");
    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(())
    }
}
