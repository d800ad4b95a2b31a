use std::env;

/// Attributes for the mirrored session cookie. HttpOnly is not configurable
/// - the cookie always carries it.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub secure: bool,
    pub same_site: String,
}

/// Credentials used to seed an admin account on a fresh database
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Application settings, loaded once at startup from the environment
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub session_ttl_seconds: i64,
    pub min_password_len: usize,
    pub cookie: CookieSettings,
    pub login_rate_window_seconds: u64,
    pub login_rate_max_attempts: usize,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidVar { name: &'static str, value: String },
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, SettingsError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| SettingsError::InvalidVar { name, value: raw }),
        Err(_) => Ok(default),
    }
}

impl AppSettings {
    /// Load settings from environment variables, with defaults for
    /// everything except the token signing secret.
    pub fn from_env() -> Result<Self, SettingsError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://ecohub.db?mode=rwc".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| SettingsError::MissingVar("JWT_SECRET"))?;

        // Default of 24h is deliberate: a stateless bearer token with no
        // revocation list should not live for a week.
        let session_ttl_hours: i64 = parse_var("SESSION_TTL_HOURS", 24)?;
        let min_password_len: usize = parse_var("MIN_PASSWORD_LEN", 8)?;

        let cookie = CookieSettings {
            secure: parse_var("COOKIE_SECURE", false)?,
            same_site: env::var("COOKIE_SAME_SITE").unwrap_or_else(|_| "Lax".to_string()),
        };

        let login_rate_window_seconds: u64 = parse_var("LOGIN_RATE_WINDOW_SECONDS", 900)?;
        let login_rate_max_attempts: usize = parse_var("LOGIN_RATE_MAX_ATTEMPTS", 5)?;

        let bootstrap_admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(BootstrapAdmin { email, password }),
            _ => None,
        };

        Ok(Self {
            database_url,
            bind_addr,
            jwt_secret,
            session_ttl_seconds: session_ttl_hours * 60 * 60,
            min_password_len,
            cookie,
            login_rate_window_seconds,
            login_rate_max_attempts,
            bootstrap_admin,
        })
    }
}
