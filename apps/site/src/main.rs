use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use arcan_site::config::Config;
use arcan_site::document::{logo_source_for, DocumentRenderer};
use arcan_site::layout::default_page_config;
use arcan_site::mail::{Mailer, Recipients, SmtpRelay};
use arcan_site::routes::build_router;
use arcan_site::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "arcan_site={level},tower_http={level}",
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Arcan site service v{}", env!("CARGO_PKG_VERSION"));

    let mailer = match &config.mail {
        Some(settings) => {
            let relay = SmtpRelay::new(&settings.smtp, &settings.from)?;
            info!(host = %settings.smtp.host, port = settings.smtp.port, "SMTP relay initialized");
            Some(Mailer {
                relay: Arc::new(relay),
                recipients: Recipients {
                    contact: settings.contact_recipient.clone(),
                    criteria: settings.criteria_recipient.clone(),
                },
            })
        }
        None if !config.mail_missing.is_empty() => {
            warn!(
                missing = ?config.mail_missing,
                "incomplete SMTP configuration; mail relay disabled"
            );
            None
        }
        None => {
            warn!("SMTP configuration missing; /api/contact and /api/criteria will answer 500");
            None
        }
    };

    let renderer = DocumentRenderer::new(logo_source_for(&config.logo_url), default_page_config());
    info!(logo = renderer.logo_location(), "Document renderer initialized");

    let state = AppState {
        config: config.clone(),
        mailer,
        renderer: Arc::new(renderer),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
