use anyhow::{Context, Result};
use cohortdesk::backend::InMemoryBackend;
use cohortdesk::config::Config;
use cohortdesk::logger::Logger;
use cohortdesk::ui::{self, AppComponent, Services};

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().nth(1).as_deref() == Some("--generate-config") {
        let path = Config::get_default_config_path()?;
        return Config::generate_default_config(path);
    }

    let config = Config::load().context("Failed to load configuration")?;
    let logger = Logger::from_config(config.logging.enabled, config.log_level())?;
    logger.log(format!("Starting cohortdesk with {} selector", config.ui.selector_variant));

    // Demo data until a REST-backed store is wired in
    let services = Services::in_memory(InMemoryBackend::demo());
    let app = AppComponent::from_config(services, &config, logger);

    ui::run_app(app).await
}
