mod app;
mod config;
mod error;
mod logging;
mod logic;
mod models;
mod mvu;
mod ui;
mod utils;

fn main() -> eframe::Result<()> {
    logging::init();
    let settings = config::Settings::load();
    tracing::info!(
        host = %settings.smtp_host,
        port = settings.smtp_port,
        "starting PDF mailer"
    );
    app::run(settings)
}
