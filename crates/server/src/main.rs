// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod session;
mod upload;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use fotoexpres::{Order, OrderRequest, PricingResult};
use fotoexpres_api::{
    ApiError, AuthenticationService, ChangeCredentialsRequest, CreateOrderResponse,
    FinalizeResponse, ListOrdersResponse, LogNotifier, LoginRequest, LoginResponse,
    MessageResponse, Notifier, OrderResponse, OrderService, OrderStorage,
    PublicPromotionResponse, QuoteRequest, QuoteResponse, Role, UpdateStatusRequest,
    UploadResponse,
};
use fotoexpres_domain::{PriceTable, Promotion, QuantityDiscountTable, StoreSettings};
use fotoexpres_persistence::{Persistence, PersistenceError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::{SessionOperator, bearer_token};
use crate::upload::OrderForm;

/// Fotoexpres Server - HTTP backend for photo-print orders
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "FOTOEXPRES_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(long, env = "FOTOEXPRES_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, env = "FOTOEXPRES_PORT", default_value_t = 8001)]
    port: u16,

    /// Root directory for staged uploads and order archives
    #[arg(long, env = "FOTOEXPRES_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Login name of the admin operator seeded on first start
    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    admin_username: String,

    /// Password of the admin operator seeded on first start
    #[arg(long, env = "ADMIN_PASSWORD")]
    admin_password: Option<String>,

    /// Login name of the read-only operator seeded on first start
    #[arg(long, env = "VIEWER_USERNAME")]
    viewer_username: Option<String>,

    /// Password of the read-only operator seeded on first start
    #[arg(long, env = "VIEWER_PASSWORD")]
    viewer_password: Option<String>,

    /// Maximum request body size for uploads, in bytes
    #[arg(long, env = "FOTOEXPRES_MAX_UPLOAD_BYTES", default_value_t = 512 * 1024 * 1024)]
    max_upload_bytes: usize,

    /// Address that receives new-order notifications
    #[arg(long, env = "NOTIFY_EMAIL")]
    notify_email: Option<String>,

    /// Sender address for new-order notifications
    #[arg(long, env = "SMTP_USERNAME")]
    smtp_username: Option<String>,

    /// Hours after which uploads that were never finalized are removed
    #[arg(long, env = "FOTOEXPRES_STAGING_MAX_AGE_HOURS", default_value_t = 24)]
    staging_max_age_hours: u32,
}

/// How often abandoned uploads are looked for.
const STAGING_PURGE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60 * 60);

/// Application state shared across handlers.
///
/// The persistence layer is wrapped in a Mutex and shared with the order
/// service.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Order creation and administration.
    orders: Arc<OrderService>,
    /// Request body limit for the upload endpoints.
    max_upload_bytes: usize,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::StorageFailure { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %err, "Request failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        Self::from(ApiError::from(err))
    }
}

// ========================================================================
// Public order endpoints
// ========================================================================

/// Handler for POST `/api/orders/create`.
///
/// Creates an order from one multipart request carrying every photo and the
/// order description.
async fn handle_create_order(
    AxumState(app_state): AxumState<AppState>,
    multipart: Multipart,
) -> Result<Json<CreateOrderResponse>, HttpError> {
    let mut form: OrderForm = OrderForm::read(multipart).await?;
    let request: OrderRequest = form.require_order_details()?;
    info!(
        photos = form.photos.len(),
        specs = request.photo_specs.len(),
        "Handling create_order request"
    );

    let response: CreateOrderResponse = app_state
        .orders
        .create_order(request, form.photos)
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/api/orders/quote`.
async fn handle_quote(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, HttpError> {
    let pricing: PricingResult = app_state.orders.quote(&req.photo_specs).await?;
    Ok(Json(QuoteResponse {
        success: true,
        pricing,
    }))
}

/// Handler for GET `/api/orders/{order_number}`.
async fn handle_get_order(
    AxumState(app_state): AxumState<AppState>,
    Path(order_number): Path<String>,
) -> Result<Json<OrderResponse>, HttpError> {
    let order: Order = app_state.orders.get_order(&order_number).await?;
    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

/// Handler for POST `/api/orders/upload/{order_number}`.
///
/// Stages one batch of photos for a chunked upload.
async fn handle_upload_photos(
    AxumState(app_state): AxumState<AppState>,
    Path(order_number): Path<String>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpError> {
    let form: OrderForm = OrderForm::read(multipart).await?;
    info!(
        order_number = %order_number,
        photos = form.photos.len(),
        "Handling upload_photos request"
    );

    let response: UploadResponse = app_state
        .orders
        .stage_upload(&order_number, form.photos)
        .await?;
    Ok(Json(response))
}

/// Handler for POST `/api/orders/finalize/{order_number}`.
///
/// Builds the order from its staged photos. Repeating the call is a
/// successful no-op.
async fn handle_finalize_order(
    AxumState(app_state): AxumState<AppState>,
    Path(order_number): Path<String>,
    Json(req): Json<OrderRequest>,
) -> Result<Json<FinalizeResponse>, HttpError> {
    info!(order_number = %order_number, "Handling finalize_order request");

    let outcome = app_state.orders.finalize_upload(&order_number, req).await?;
    Ok(Json(FinalizeResponse::from(outcome)))
}

// ========================================================================
// Public store configuration endpoints
// ========================================================================

/// Handler for GET `/api/prices`.
async fn handle_get_prices(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<PriceTable>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fotoexpres_api::get_prices(&mut persistence)?))
}

/// Handler for GET `/api/promotion`.
async fn handle_get_public_promotion(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<PublicPromotionResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fotoexpres_api::get_public_promotion(
        &mut persistence,
        OffsetDateTime::now_utc(),
    )?))
}

/// Handler for GET `/api/settings/public`.
async fn handle_get_public_settings(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<StoreSettings>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fotoexpres_api::get_settings(&mut persistence)?))
}

// ========================================================================
// Admin authentication endpoints
// ========================================================================

/// Handler for POST `/api/admin/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fotoexpres_api::login(&mut persistence, &req)?))
}

/// Handler for POST `/api/admin/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, HttpError> {
    let token: &str = bearer_token(&headers).map_err(|_| HttpError {
        status: StatusCode::UNAUTHORIZED,
        message: String::from("Missing bearer token"),
    })?;

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = fotoexpres_api::logout(&mut persistence, token)?;
    drop(persistence);
    info!(login_name = %actor.id, "Operator logged out");
    Ok(Json(response))
}

/// Handler for PUT `/api/admin/credentials`.
async fn handle_change_credentials(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<ChangeCredentialsRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fotoexpres_api::change_credentials(
        &mut persistence,
        &actor,
        &operator,
        &req,
    )?))
}

// ========================================================================
// Admin order endpoints
// ========================================================================

/// Handler for GET `/api/admin/orders`.
async fn handle_list_orders(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(_actor, _operator): SessionOperator,
) -> Result<Json<ListOrdersResponse>, HttpError> {
    let orders: Vec<Order> = app_state.orders.list_orders().await?;
    Ok(Json(ListOrdersResponse {
        success: true,
        orders,
    }))
}

/// Handler for GET `/api/admin/orders/{order_number}`.
async fn handle_admin_get_order(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(_actor, _operator): SessionOperator,
    Path(order_number): Path<String>,
) -> Result<Json<OrderResponse>, HttpError> {
    let order: Order = app_state.orders.get_order(&order_number).await?;
    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

/// Handler for PUT `/api/admin/orders/{order_number}/status`.
async fn handle_update_order_status(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Path(order_number): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, HttpError> {
    let order: Order = app_state
        .orders
        .update_status(&actor, &order_number, &req.status)
        .await?;
    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

/// Handler for DELETE `/api/admin/orders/{order_number}`.
async fn handle_delete_order(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Path(order_number): Path<String>,
) -> Result<Json<MessageResponse>, HttpError> {
    app_state.orders.delete_order(&actor, &order_number).await?;
    Ok(Json(MessageResponse::ok("Order deleted")))
}

/// Handler for GET `/api/admin/orders/{order_number}/download`.
///
/// Returns the stored archive as an attachment.
async fn handle_download_order(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Path(order_number): Path<String>,
) -> Result<Response, HttpError> {
    let (file_name, bytes) = app_state.orders.read_archive(&order_number).await?;
    info!(order_number = %order_number, actor = %actor.id, size = bytes.len(), "Archive downloaded");

    Ok((
        [
            (header::CONTENT_TYPE, String::from("application/zip")),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

// ========================================================================
// Admin store configuration endpoints
// ========================================================================

/// Handler for GET `/api/admin/prices`.
async fn handle_admin_get_prices(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(_actor, _operator): SessionOperator,
) -> Result<Json<PriceTable>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fotoexpres_api::get_prices(&mut persistence)?))
}

/// Handler for PUT `/api/admin/prices`.
async fn handle_update_prices(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(prices): Json<PriceTable>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fotoexpres_api::update_prices(
        &mut persistence,
        &actor,
        &prices,
    )?))
}

/// Handler for GET `/api/admin/discounts`.
async fn handle_get_discounts(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(_actor, _operator): SessionOperator,
) -> Result<Json<QuantityDiscountTable>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fotoexpres_api::get_discounts(&mut persistence)?))
}

/// Handler for PUT `/api/admin/discounts`.
async fn handle_update_discounts(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(discounts): Json<QuantityDiscountTable>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fotoexpres_api::update_discounts(
        &mut persistence,
        &actor,
        &discounts,
    )?))
}

/// Handler for GET `/api/admin/promotion`.
async fn handle_get_promotion(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(_actor, _operator): SessionOperator,
) -> Result<Json<Promotion>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fotoexpres_api::get_promotion(&mut persistence)?))
}

/// Handler for PUT `/api/admin/promotion`.
async fn handle_update_promotion(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(promotion): Json<Promotion>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fotoexpres_api::update_promotion(
        &mut persistence,
        &actor,
        &promotion,
    )?))
}

/// Handler for GET `/api/admin/settings`.
async fn handle_get_settings(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(_actor, _operator): SessionOperator,
) -> Result<Json<StoreSettings>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fotoexpres_api::get_settings(&mut persistence)?))
}

/// Handler for PUT `/api/admin/settings`.
async fn handle_update_settings(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(settings): Json<StoreSettings>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(fotoexpres_api::update_settings(
        &mut persistence,
        &actor,
        &settings,
    )?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    let uploads: Router<AppState> = Router::new()
        .route("/api/orders/create", post(handle_create_order))
        .route("/api/orders/upload/{order_number}", post(handle_upload_photos))
        .layer(DefaultBodyLimit::max(app_state.max_upload_bytes));

    Router::new()
        .merge(uploads)
        .route("/api/orders/quote", post(handle_quote))
        .route("/api/orders/finalize/{order_number}", post(handle_finalize_order))
        .route("/api/orders/{order_number}", get(handle_get_order))
        .route("/api/prices", get(handle_get_prices))
        .route("/api/promotion", get(handle_get_public_promotion))
        .route("/api/settings/public", get(handle_get_public_settings))
        .route("/api/admin/login", post(handle_login))
        .route("/api/admin/logout", post(handle_logout))
        .route("/api/admin/credentials", put(handle_change_credentials))
        .route("/api/admin/orders", get(handle_list_orders))
        .route(
            "/api/admin/orders/{order_number}",
            get(handle_admin_get_order).delete(handle_delete_order),
        )
        .route(
            "/api/admin/orders/{order_number}/status",
            put(handle_update_order_status),
        )
        .route(
            "/api/admin/orders/{order_number}/download",
            get(handle_download_order),
        )
        .route(
            "/api/admin/prices",
            get(handle_admin_get_prices).put(handle_update_prices),
        )
        .route(
            "/api/admin/discounts",
            get(handle_get_discounts).put(handle_update_discounts),
        )
        .route(
            "/api/admin/promotion",
            get(handle_get_promotion).put(handle_update_promotion),
        )
        .route(
            "/api/admin/settings",
            get(handle_get_settings).put(handle_update_settings),
        )
        .with_state(app_state)
}

/// Creates the configured operators that do not exist yet.
fn seed_operators(persistence: &mut Persistence, args: &Args) -> Result<(), ApiError> {
    if let Some(password) = &args.admin_password {
        AuthenticationService::ensure_operator(
            persistence,
            &args.admin_username,
            password,
            Role::Admin,
        )?;
    }

    match (&args.viewer_username, &args.viewer_password) {
        (Some(login), Some(password)) => {
            AuthenticationService::ensure_operator(persistence, login, password, Role::Viewer)?;
        }
        (Some(_), None) | (None, Some(_)) => {
            warn!("Viewer operator needs both a username and a password; not seeded");
        }
        (None, None) => {}
    }

    if persistence.count_operators()? == 0 {
        warn!("No operators exist; set ADMIN_PASSWORD to enable the admin endpoints");
    }
    Ok(())
}

/// Periodically removes staged uploads that were never finalized.
fn spawn_staging_purge(orders: Arc<OrderService>, max_age: time::Duration) {
    tokio::spawn(async move {
        let mut interval: tokio::time::Interval = tokio::time::interval(STAGING_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match orders.purge_abandoned_uploads(max_age).await {
                Ok(0) => {}
                Ok(purged) => info!(purged, "Removed abandoned uploads"),
                Err(e) => warn!(error = %e, "Purging abandoned uploads failed"),
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Fotoexpres Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    seed_operators(&mut persistence, &args)?;

    let storage: OrderStorage = OrderStorage::open(&args.data_dir)?;
    let notifier: Option<Arc<dyn Notifier>> =
        LogNotifier::from_config(args.notify_email.clone(), args.smtp_username.clone())
            .map(|notifier| Arc::new(notifier) as Arc<dyn Notifier>);

    let persistence: Arc<Mutex<Persistence>> = Arc::new(Mutex::new(persistence));
    let app_state: AppState = AppState {
        orders: Arc::new(OrderService::new(
            Arc::clone(&persistence),
            storage,
            notifier,
        )),
        persistence,
        max_upload_bytes: args.max_upload_bytes,
    };

    spawn_staging_purge(
        Arc::clone(&app_state.orders),
        time::Duration::hours(i64::from(args.staging_max_age_hours)),
    );

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
