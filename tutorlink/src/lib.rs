//! # tutorlink: Tutoring Marketplace Backend
//!
//! `tutorlink` is the backend for a marketplace connecting students and
//! tutors. Interaction between the two sides is gated by a virtual coin
//! wallet: students spend coins to unlock a tutor's contact details, tutors
//! spend coins to apply to a student's post, and coins are bought with real
//! currency through an external payment gateway. Alongside the marketplace
//! it manages a nested tree of learning resources (MCQ banks, revision
//! notes, past papers) per subject, course and exam board.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for
//! the HTTP layer and uses PostgreSQL for all persistence.
//!
//! Caller identity arrives as a trusted proxy header carrying the user's
//! email (see [`config::ProxyHeaderAuthConfig`]); handlers receive it as the
//! `CurrentUser` extractor and gate on its role. The database layer
//! ([`db`]) follows the repository pattern, one repository per entity.
//!
//! Money-moving workflows (contact initiation, applications, payment
//! capture) pair a conditional wallet mutation with their record write in a
//! single database transaction; uniqueness constraints at the storage layer
//! backstop the duplicate-creation races. The resource tree is stored as
//! one JSONB document per (subject, course, exam board) and mutated
//! load-modify-write-back under an optimistic revision guard.
//!
//! External collaborators sit behind small traits/services: the payment
//! gateway ([`payment_providers`]), blob storage ([`storage`]), and email
//! ([`email`], always post-commit and fire-and-forget).
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use tutorlink::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = tutorlink::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     tutorlink::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod errors;
mod notifications;
mod openapi;
pub mod payment_providers;
mod pdf;
pub mod storage;
pub mod telemetry;
mod types;

use crate::{
    db::{
        handlers::Users,
        models::users::{Role, UserCreateDBRequest},
    },
    email::EmailService,
    openapi::ApiDoc,
    payment_providers::PaymentGateway,
    storage::ObjectStorage,
};
use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, patch, post, put},
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{ApplicationId, ContactId, PaymentId, PostId, ResourceId, TeacherId, UserId};

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Config,
    /// Blob storage for PDFs and images
    pub storage: Arc<dyn ObjectStorage>,
    /// Payment gateway; None when top-ups are not configured
    pub gateway: Option<Arc<dyn PaymentGateway>>,
    /// Email service for post-commit notifications
    pub email: Arc<EmailService>,
}

/// Get the tutorlink database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create the initial admin user if it doesn't exist.
///
/// Idempotent: called on every startup so a fresh database always has an
/// admin account to bootstrap from.
#[instrument(skip_all)]
pub async fn create_initial_admin_user(email: &str, name: &str, db: &PgPool) -> Result<UserId, anyhow::Error> {
    let mut tx = db.begin().await?;
    let mut users = Users::new(&mut tx);

    if let Some(existing) = users.get_by_email(email).await? {
        tx.commit().await?;
        return Ok(existing.id);
    }

    let created = users
        .create(&UserCreateDBRequest {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            role: Role::Admin,
        })
        .await?;

    tx.commit().await?;
    info!("Created initial admin user {email}");
    Ok(created.id)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        origins.push(origin.parse::<HeaderValue>()?);
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.cors.allow_credentials))
}

/// Build the application router with all endpoints and middleware.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use api::handlers;

    let api_routes = Router::new()
        // Accounts
        .route("/users/me", get(handlers::users::get_me))
        .route("/users", post(handlers::users::create_user))
        // Tutor profiles
        .route("/teachers", post(handlers::teachers::create_teacher_profile))
        .route("/teachers/{teacher_id}", get(handlers::teachers::get_teacher))
        .route("/teachers/{teacher_id}/approval", patch(handlers::teachers::set_teacher_approval))
        // Post requirements
        .route("/posts", post(handlers::posts::create_post))
        .route("/posts/{post_id}", get(handlers::posts::get_post))
        // Wallet
        .route("/wallet", get(handlers::wallet::get_wallet))
        .route("/wallet/transactions", get(handlers::wallet::get_transactions))
        // Contact workflow
        .route("/contacts", get(handlers::contacts::list_teacher_contacts))
        .route("/contacts/{teacher_id}", post(handlers::contacts::initiate_contact))
        .route("/contacts/{teacher_id}/status", get(handlers::contacts::get_contact_status))
        // Application workflow
        .route("/applications", get(handlers::applications::list_my_applications))
        .route("/applications/{post_id}", post(handlers::applications::apply_to_post))
        .route("/applications/{post_id}/status", get(handlers::applications::check_application_status))
        .route(
            "/applications/{application_id}/contact",
            get(handlers::applications::get_contact_information),
        )
        .route(
            "/applications/{application_id}/moderate",
            patch(handlers::applications::set_application_status),
        )
        // Payments
        .route(
            "/payments",
            post(handlers::payments::create_payment).get(handlers::payments::payment_history),
        )
        .route("/payments/by-coins", post(handlers::payments::create_payment_by_coins))
        .route("/payments/capture", post(handlers::payments::capture_payment))
        .route("/payments/packages", get(handlers::payments::get_coin_packages))
        .route("/payments/rate", get(handlers::payments::get_coin_rate))
        .route("/payments/pending", delete(handlers::payments::cancel_pending_payments))
        .route("/payments/cleanup", post(handlers::payments::cleanup_pending_payments))
        // Resource tree
        .route("/resources/course/{course_id}", get(handlers::resources::get_course_resources))
        .route(
            "/resources/{subject_id}/{course_id}/{exam_board}",
            get(handlers::resources::get_resources).put(handlers::resources::upsert_resources),
        )
        .route(
            "/resources/{subject_id}/{course_id}/{exam_board}/mcqs/bulk",
            post(handlers::resources::bulk_import_mcqs),
        )
        .route(
            "/resources/{subject_id}/{course_id}/{exam_board}/mcqs/{topic}/{sub_section}",
            post(handlers::resources::add_mcq),
        )
        .route(
            "/resources/{subject_id}/{course_id}/{exam_board}/mcqs/{topic}/{sub_section}/batch",
            post(handlers::resources::add_mcqs),
        )
        .route(
            "/resources/{subject_id}/{course_id}/{exam_board}/mcqs/{topic}/{sub_section}/{index}",
            put(handlers::resources::update_mcq).delete(handlers::resources::delete_mcq),
        )
        .route(
            "/resources/{subject_id}/{course_id}/{exam_board}/revision-notes",
            post(handlers::resources::add_revision_note),
        )
        .route(
            "/resources/{subject_id}/{course_id}/{exam_board}/revision-notes/{index}",
            put(handlers::resources::update_revision_note).delete(handlers::resources::delete_revision_note),
        )
        .route(
            "/resources/{subject_id}/{course_id}/{exam_board}/past-papers",
            post(handlers::resources::add_past_paper),
        )
        .route(
            "/resources/{subject_id}/{course_id}/{exam_board}/past-papers/{index}",
            put(handlers::resources::update_past_paper).delete(handlers::resources::delete_past_paper),
        )
        .route(
            "/resources/{subject_id}/{course_id}/{exam_board}/{resource_type}/toggle",
            patch(handlers::resources::toggle_resource_type),
        );

    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api/v1", api_routes)
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] connects to the database, runs
///    migrations, bootstraps the admin user and wires the collaborators
/// 2. **Serve**: [`Application::serve`] binds the TCP listener and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.database.acquire_timeout_secs))
            .connect(&config.database.url)
            .await?;

        migrator().run(&pool).await?;

        create_initial_admin_user(&config.admin_email, &config.admin_name, &pool).await?;

        let email = Arc::new(EmailService::new(&config.email)?);
        let storage = storage::create_storage(&config.storage).await;
        let gateway: Option<Arc<dyn PaymentGateway>> = config
            .payment
            .as_ref()
            .map(|payment| Arc::from(payment_providers::create_gateway(payment)));

        if gateway.is_none() {
            tracing::warn!("No payment gateway configured; coin top-ups are disabled");
        }

        let state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .storage(storage)
            .maybe_gateway(gateway)
            .email(email)
            .build();

        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("tutorlink listening on http://{bind_addr}");

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
