use anyhow::Context;
use libris_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load libris settings")?;
    libris_telemetry::init(&settings.telemetry);

    libris_app::serve(settings).await
}
