use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use shopcore::adapters::email::ResendNotifier;
use shopcore::adapters::http::{build_router, AppState};
use shopcore::adapters::postgres::{
    PostgresCsrfTokenStore, PostgresIdempotencyStore, PostgresOrderStore, PostgresSessionStore,
};
use shopcore::application::handlers::maintenance::CleanupSweepHandler;
use shopcore::application::handlers::webhook::{
    ProcessMeridianWebhookHandler, ProcessNovapayWebhookHandler,
};
use shopcore::config::AppConfig;
use shopcore::domain::payment::{SignatureScheme, WebhookGate};
use shopcore::domain::security::{CookieCipher, CookieSigner, SignedCookie};
use shopcore::ports::{CsrfTokenStore, IdempotencyStore, OrderNotifier, OrderStore, SessionStore};

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(2);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("configuration invalid: {e}");
        std::process::exit(2);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .json()
        .init();

    let pool = match PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "database connection failed");
            std::process::exit(2);
        }
    };

    if config.database.run_migrations {
        if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
            tracing::error!(error = %e, "migrations failed");
            std::process::exit(2);
        }
    }

    let meridian_scheme =
        match SignatureScheme::rsa_from_pem(&config.payment.meridian_public_key_pem) {
            Ok(scheme) => scheme,
            Err(e) => {
                tracing::error!(error = %e, "Meridian public key rejected");
                std::process::exit(2);
            }
        };
    // Allowlists were validated at startup; re-parsing cannot fail here.
    let novapay_ips = config.payment.novapay_allowlist().unwrap_or_default();
    let meridian_ips = config.payment.meridian_allowlist().unwrap_or_default();

    let sessions: Arc<dyn SessionStore> = Arc::new(PostgresSessionStore::new(pool.clone()));
    let csrf_tokens: Arc<dyn CsrfTokenStore> = Arc::new(PostgresCsrfTokenStore::new(pool.clone()));
    let idempotency: Arc<dyn IdempotencyStore> = Arc::new(PostgresIdempotencyStore::new(
        pool.clone(),
        config.security.idempotency_ttl_secs,
    ));
    let orders: Arc<dyn OrderStore> = Arc::new(PostgresOrderStore::new(pool.clone()));
    let notifier: Arc<dyn OrderNotifier> = Arc::new(ResendNotifier::new(config.email.clone()));

    let novapay_webhook = Arc::new(ProcessNovapayWebhookHandler::new(
        WebhookGate::new(
            novapay_ips,
            config.payment.skip_ip_check,
            SignatureScheme::hmac_concat(config.payment.novapay_secret.expose_secret()),
        ),
        idempotency.clone(),
        orders.clone(),
        notifier.clone(),
    ));
    let meridian_webhook = Arc::new(ProcessMeridianWebhookHandler::new(
        WebhookGate::new(meridian_ips, config.payment.skip_ip_check, meridian_scheme),
        idempotency.clone(),
        orders.clone(),
        notifier.clone(),
    ));

    let state = AppState {
        sessions: sessions.clone(),
        csrf_tokens: csrf_tokens.clone(),
        novapay_webhook,
        meridian_webhook,
        cookie_cipher: Arc::new(CookieCipher::new(
            config.security.cookie_encryption_key.expose_secret(),
        )),
        signed_cookie: Arc::new(SignedCookie::new(CookieSigner::new(
            config.security.cookie_signing_secret.expose_secret(),
        ))),
        security: config.security.clone(),
    };

    spawn_cleanup_task(
        CleanupSweepHandler::new(csrf_tokens, sessions, idempotency),
        config.security.cleanup_interval_secs,
    );

    let origins: Vec<axum::http::HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new().allow_origin(origins);

    let app = build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr();
    tracing::info!(%addr, environment = ?config.server.environment, "starting server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "bind failed");
            std::process::exit(2);
        }
    };
    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    {
        tracing::error!(error = %e, "server exited with error");
        std::process::exit(1);
    }
}

fn spawn_cleanup_task(sweeper: CleanupSweepHandler, interval_secs: u64) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        // The first tick fires immediately; skip it so startup stays quiet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sweeper.handle().await;
        }
    });
}
