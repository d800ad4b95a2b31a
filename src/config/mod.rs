// Configuration layer - environment-driven settings and logging setup
pub mod logging;
pub mod settings;

pub use settings::{AppSettings, BootstrapAdmin, CookieSettings, SettingsError};
