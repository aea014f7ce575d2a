use anyhow::Result;
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod extractors;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gradcert_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let bind_address = config.bind_address;
    tracing::info!("Starting gradcert server on {}", bind_address);

    let state = Arc::new(AppState::new(config)?);

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health checks
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Public certificate resolver, the only unauthenticated data path
        .route("/certificate/:student_id", get(api::certificates::resolve))
        // Staff authentication
        .route("/v1/auth/login", post(api::auth::login))
        .route("/v1/auth/logout", post(api::auth::logout))
        // Course catalog
        .route("/v1/courses", post(api::courses::add_course))
        .route("/v1/courses", get(api::courses::list_courses))
        .route("/v1/courses/:course_id", patch(api::courses::update_course))
        .route("/v1/courses/:course_id", delete(api::courses::delete_course))
        // Student records
        .route("/v1/students", post(api::students::register_student))
        .route("/v1/students", get(api::students::list_students))
        .route("/v1/students/:student_id", get(api::students::get_student))
        .route("/v1/students/:student_id", patch(api::students::update_student))
        .route("/v1/students/:student_id", delete(api::students::delete_student))
        .route("/v1/students/:student_id/photo", post(api::students::upload_photo))
        // Enrollment ledger
        .route("/v1/students/:student_id/courses", put(api::students::enroll))
        .route(
            "/v1/students/:student_id/courses/:course_id",
            delete(api::students::unenroll),
        )
        // Verification artifact
        .route(
            "/v1/students/:student_id/verification",
            post(api::students::regenerate_verification),
        )
        // Middleware
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Graceful shutdown initiated");
}
