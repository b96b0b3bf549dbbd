use anyhow::Context;
use clap::Parser;
use todo_backend::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_directive())),
        )
        .with_target(false)
        .compact()
        .init();

    let bind = config.bind;
    todo_backend::serve(config)
        .await
        .with_context(|| format!("todo server on {bind} failed"))
}
