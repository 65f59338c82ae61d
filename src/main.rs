use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskr::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskr=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Cli::parse();

    match args.command {
        Commands::Init => cli::commands::init().await,
        Commands::CreateDb => cli::commands::create_db().await,
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => cli::commands::create_admin(&name, &email, &password).await,
        Commands::Users { format } => cli::commands::list_users(format).await,
        Commands::Serve { host, port } => cli::commands::serve(host, port).await,
    }
}
