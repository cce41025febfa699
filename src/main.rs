use std::{process, sync::Arc};

use clap::Parser;
use quill::{
    application::{
        categories::CategoryService,
        error::AppError,
        posts::PostService,
        repos::{CategoriesRepo, CategoriesWriteRepo, HealthRepo, PostsRepo, PostsWriteRepo},
    },
    config::{self, CliArgs, Command, Settings},
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, RpcState},
        telemetry,
    },
};
use sqlx::PgPool;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let cli = CliArgs::parse();
    let settings = config::load(&cli)
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;

    match cli.command.unwrap_or_default() {
        Command::Serve(_) => run_serve(settings).await,
        Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn connect(settings: &Settings) -> Result<PgPool, AppError> {
    let url = settings
        .database
        .require_url()
        .map_err(|err| InfraError::configuration(err.to_string()))?;

    let pool = PostgresRepositories::connect(
        url,
        settings.database.max_connections.get(),
        settings.database.acquire_timeout,
    )
    .await
    .map_err(|err| InfraError::database(format!("failed to connect: {err}")))?;

    Ok(pool)
}

async fn run_migrate(settings: Settings) -> Result<(), AppError> {
    let pool = connect(&settings).await?;
    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(InfraError::from)?;
    info!(target = "quill::migrate", "database migrations applied");
    Ok(())
}

async fn run_serve(settings: Settings) -> Result<(), AppError> {
    let pool = connect(&settings).await?;
    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(InfraError::from)?;

    let repositories = Arc::new(PostgresRepositories::new(pool));
    let state = build_state(repositories);
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(InfraError::from)?;
    info!(addr = %settings.server.addr, "rpc server listening");

    http::serve(listener, router, settings.server.graceful_shutdown).await?;

    info!("rpc server stopped");
    Ok(())
}

fn build_state(repositories: Arc<PostgresRepositories>) -> RpcState {
    let posts_reader: Arc<dyn PostsRepo> = repositories.clone();
    let posts_writer: Arc<dyn PostsWriteRepo> = repositories.clone();
    let categories_reader: Arc<dyn CategoriesRepo> = repositories.clone();
    let categories_writer: Arc<dyn CategoriesWriteRepo> = repositories.clone();
    let health: Arc<dyn HealthRepo> = repositories;

    RpcState {
        posts: Arc::new(PostService::new(posts_reader, posts_writer)),
        categories: Arc::new(CategoryService::new(categories_reader, categories_writer)),
        health,
    }
}
