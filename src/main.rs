use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use formrelay::{AppState, Config, SmtpMailSender, WebServer};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the variables may come from the environment.
    let _ = dotenvy::dotenv();

    // Load configuration
    let mut config = if Path::new(CONFIG_PATH).exists() {
        match Config::load(CONFIG_PATH) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {CONFIG_PATH}: {e}");
                eprintln!("Using default configuration.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Err(e) = config.apply_env_overrides() {
        eprintln!("Invalid environment: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = formrelay::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        formrelay::logging::init_console_only(&config.logging.level);
    }
    formrelay::logging::install_panic_hook();

    if let Err(e) = run(config).await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> formrelay::Result<()> {
    config.validate()?;

    if config.mail.user.is_empty() || config.mail.pass.is_empty() {
        warn!("EMAIL_USER or EMAIL_PASS is not set; every send will fail");
    }

    let mailer = SmtpMailSender::new(&config.mail)?;
    let state = AppState::from_config(&config, Arc::new(mailer))?;
    let server = WebServer::new(&config, state)?;

    info!(
        relay = %config.mail.smtp_host,
        "formrelay configured on {}",
        server.addr()
    );

    server.run().await
}
