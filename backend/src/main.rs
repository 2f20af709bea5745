use actix_cors::Cors;
use actix_web::middleware::NormalizePath;
use actix_web::{web, App, HttpResponse, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use cultura_backend::docs::ApiDoc;
use cultura_backend::handlers::{
    events::configure_event_routes, subscriptions::configure_subscription_routes,
    users::configure_user_routes, venues::configure_venue_routes,
};
use cultura_backend::services::security::SecurityService;
use cultura_middleware::AuthMiddlewareFactory;
use cultura_observability::{init_tracing, TracingConfig};

async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(e) => {
            tracing::error!("Health check database ping failed: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "database": "disconnected"
            }))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    init_tracing(TracingConfig::for_service("cultura-backend"));

    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse()
        .expect("PORT must be a number");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to connect to the database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let security = web::Data::new(SecurityService::from_env());
    let pool = web::Data::new(pool);

    tracing::info!("Starting cultura-backend on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(pool.clone())
            .app_data(security.clone())
            .wrap(TracingLogger::default())
            .wrap(cors)
            .wrap(AuthMiddlewareFactory::from_env())
            // Clients written against the old API use trailing slashes.
            .wrap(NormalizePath::trim())
            .route("/health", web::get().to(health_check))
            .configure(configure_user_routes)
            .configure(configure_venue_routes)
            .configure(configure_event_routes)
            .configure(configure_subscription_routes)
            .service(
                SwaggerUi::new("/api/docs/{_:.*}")
                    .url("/api/schema", ApiDoc::openapi()),
            )
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
