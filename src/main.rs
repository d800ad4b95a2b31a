mod api;
mod app_data;
mod auth;
mod config;
mod errors;
mod services;
mod stores;
mod types;

use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;

use api::{AdminApi, AuthApi, HealthApi};
use app_data::AppData;
use config::AppSettings;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    config::logging::init_logging().expect("Failed to initialize logging");

    let settings = AppSettings::from_env().expect("Failed to load settings");

    let db = Database::connect(&settings.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Connected to database: {}", settings.database_url);

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database migrations completed");

    let app_data = AppData::init(db, &settings).expect("Failed to initialize application data");
    app_data
        .seed_bootstrap_admin(&settings)
        .await
        .expect("Failed to seed bootstrap admin");

    let auth_api = AuthApi::new(
        app_data.auth_service.clone(),
        app_data.gate.clone(),
        app_data.login_limiter.clone(),
        settings.cookie.clone(),
    );
    let admin_api = AdminApi::new(app_data.admin_service.clone(), app_data.gate.clone());

    let api_service = OpenApiService::new((HealthApi, auth_api, admin_api), "EcoHub API", "1.0.0")
        .server(format!("http://{}/api", settings.bind_addr));
    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!("Starting server on http://{}", settings.bind_addr);

    Server::new(TcpListener::bind(settings.bind_addr.clone()))
        .run(app)
        .await
}
