use anyhow::Context;
use clap::{Parser, Subcommand};
use libris_kernel::settings::{DatabaseBackend, Settings};

#[derive(Parser)]
#[command(name = "libris-cli", about = "Run and manage the libris catalog")]
struct Options {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the catalog over HTTP
    Serve {
        /// Listen on this port instead of the configured one
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the resolved settings as JSON
    Config,
    /// Insert a small sample library into the configured store
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = Options::parse();
    let mut settings = Settings::load().context("failed to load libris settings")?;
    libris_telemetry::init(&settings.telemetry);

    match options.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            libris_app::serve(settings).await
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to serialize settings")?;
            println!("{rendered}");
            Ok(())
        }
        Command::Seed => {
            if settings.database.backend == DatabaseBackend::Memory {
                tracing::warn!("seeding the in-memory store; nothing will persist");
            }
            let storage = libris_app::open_storage(&settings.database).await?;
            let report = libris_app::seed::populate(&storage)
                .await
                .context("failed to insert sample library")?;
            println!(
                "inserted {} genres, {} authors, {} books, {} copies",
                report.genres, report.authors, report.books, report.copies
            );
            Ok(())
        }
    }
}
