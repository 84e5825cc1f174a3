use sea_orm::Database;
use tracing::info;

use errant_accounts::config::AccountsConfig;
use errant_accounts::infra::mail::HttpMailer;
use errant_accounts::infra::password::Argon2Password;
use errant_accounts::router::build_router;
use errant_accounts::state::AppState;

#[tokio::main]
async fn main() {
    errant_core::tracing::init_tracing();

    let config = AccountsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let passwords = Argon2Password::new(&config.password_salt).expect("invalid PASSWORD_SALT");
    let mailer = HttpMailer::new(config.mail_api_url, config.mail_api_key, config.mail_from)
        .expect("failed to build mail client");

    let state = AppState {
        db,
        mailer,
        passwords,
        frontend_url: config.frontend_url,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.accounts_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("accounts service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
