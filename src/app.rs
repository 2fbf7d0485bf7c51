use std::sync::Arc;

use crate::infrastructure::config::Settings;

pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let settings = Settings::load().map_err(|e| std::io::Error::other(e.to_string()))?;

    let state = crate::infrastructure::bootstrap::setup(&settings)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    tracing::info!("Listening on {}", settings.bind_addr);
    crate::interfaces::http::start_server(Arc::new(state), &settings.bind_addr)?.await
}
