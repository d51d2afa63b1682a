use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{error::JsonPayloadError, middleware::Logger, web, App, HttpRequest, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::clock::Clock;
use crate::configuration::{ApplicationSettings, AuthSettings};
use crate::error::{AppError, AuthError, ValidationError};
use crate::middleware::{FileserverHits, HitCounter};
use crate::routes::{
    create_chirp, create_user, get_chirp, health_check, list_chirps, login, metrics, refresh,
    reset, revoke, update_user,
};
use crate::store::memory::{InMemoryChirpStore, InMemoryRefreshTokenStore, InMemoryUserStore};
use crate::store::postgres::{PgChirpStore, PgRefreshTokenStore, PgUserStore};
use crate::store::ChirpStore;

/// Everything the handlers need, built once at startup.
pub struct Services {
    pub auth: AuthService,
    pub chirps: Arc<dyn ChirpStore>,
}

impl Services {
    pub fn postgres(
        pool: PgPool,
        settings: &AuthSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let auth = AuthService::new(
            settings,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgRefreshTokenStore::new(pool.clone())),
            clock,
        )?;

        Ok(Self {
            auth,
            chirps: Arc::new(PgChirpStore::new(pool)),
        })
    }

    /// Process-local stores. Nothing survives a restart.
    pub fn in_memory(settings: &AuthSettings, clock: Arc<dyn Clock>) -> Result<Self, AuthError> {
        let auth = AuthService::new(
            settings,
            Arc::new(InMemoryUserStore::default()),
            Arc::new(InMemoryRefreshTokenStore::default()),
            clock,
        )?;

        Ok(Self {
            auth,
            chirps: Arc::new(InMemoryChirpStore::default()),
        })
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::from(ValidationError::MalformedBody(err.to_string())).into()
}

pub fn run(
    listener: TcpListener,
    services: Services,
    application: ApplicationSettings,
) -> Result<Server, std::io::Error> {
    let auth = web::Data::new(services.auth);
    let chirps: web::Data<dyn ChirpStore> = web::Data::from(services.chirps);
    let hits = web::Data::new(FileserverHits::default());
    let static_dir = application.static_dir.clone();
    let application = web::Data::new(application);

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())

            // Shared state
            .app_data(auth.clone())
            .app_data(chirps.clone())
            .app_data(hits.clone())
            .app_data(application.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))

            .service(
                web::scope("/api")
                    .route("/healthz", web::get().to(health_check))
                    .route("/users", web::post().to(create_user))
                    .route("/users", web::put().to(update_user))
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .route("/revoke", web::post().to(revoke))
                    .route("/chirps", web::post().to(create_chirp))
                    .route("/chirps", web::get().to(list_chirps))
                    .route("/chirps/{chirp_id}", web::get().to(get_chirp)),
            )
            .service(
                web::scope("/admin")
                    .route("/metrics", web::get().to(metrics))
                    .route("/reset", web::post().to(reset)),
            )

            // Static file serving, counted for the metrics page
            .service(
                web::scope("/app")
                    .wrap(HitCounter::new(hits.clone()))
                    .service(fs::Files::new("/", static_dir.clone()).index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
