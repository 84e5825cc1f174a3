/// Accounts service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AccountsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Deployment-wide Argon2 salt, 8..=48 bytes. Env var: `PASSWORD_SALT`.
    pub password_salt: String,
    /// Base URL of the web client; reset links point at `<url>/resetPassword`.
    pub frontend_url: String,
    /// Mail API endpoint (default Resend). Env var: `MAIL_API_URL`.
    pub mail_api_url: String,
    /// Bearer key for the mail API.
    pub mail_api_key: String,
    /// Sender address, e.g. `Errant Dreams <noreply@errant-dreams.com>`.
    pub mail_from: String,
    /// TCP port to listen on (default 3114). Env var: `ACCOUNTS_PORT`.
    pub accounts_port: u16,
}

impl AccountsConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            password_salt: std::env::var("PASSWORD_SALT").expect("PASSWORD_SALT"),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_owned()),
            mail_api_url: std::env::var("MAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".to_owned()),
            mail_api_key: std::env::var("MAIL_API_KEY").expect("MAIL_API_KEY"),
            mail_from: std::env::var("MAIL_FROM").expect("MAIL_FROM"),
            accounts_port: std::env::var("ACCOUNTS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3114),
        }
    }
}
