use sqlx::postgres::PgPoolOptions;
use secrecy::ExposeSecret;
use std::net::TcpListener;
use std::sync::Arc;

use chirpy::clock::SystemClock;
use chirpy::configuration::get_configuration;
use chirpy::startup::{run, Services};
use chirpy::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // 구조화된 로깅 초기화
    init_telemetry();

    tracing::info!("Starting application");

    // 설정 로드
    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!(platform = ?config.application.platform, "Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    // 데이터베이스 연결 풀 생성
    tracing::info!("Attempting to connect to database");

    let pool = PgPoolOptions::new()
        .max_connections(configuration.database.max_connections)
        .connect(configuration.database.connection_string().expose_secret())
        .await
        .map_err(|e| {
            tracing::error!("Failed to create connection pool: {}", e);
            std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Database connection error",
            )
        })?;

    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run migrations: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, "Migration error")
    })?;

    tracing::info!("Database connection pool created successfully");

    let services = Services::postgres(pool, &configuration.auth, Arc::new(SystemClock))
        .map_err(|e| {
            tracing::error!("Failed to build auth service: {}", e);
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "Auth configuration error")
        })?;

    // 서버 주소 설정
    let address = configuration.application.address();
    tracing::info!("Binding server to address: {}", address);

    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    // 서버 실행
    let server = run(listener, services, configuration.application)?;
    tracing::info!("Server started successfully");

    server.await
}
