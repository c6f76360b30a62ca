use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::controllers::paste::{self, LISTING_LIMIT};
use crate::models::PasteSummary;
use crate::render;
use crate::types::api::{CreatedPaste, NewPaste, Status};
use crate::{ApiError, App};

pub async fn run(app: App) -> anyhow::Result<()> {
    let addr = app.config.listen_addr();
    let database = app.database.clone();

    database.migrate().await?;

    let listener = TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down");
    database.close().await;

    Ok(())
}

/// Build the HTTP router for an application.
pub fn router(app: App) -> Router {
    let max_upload_size = app.config.limits.max_upload_size;

    Router::new()
        .route("/", get(index))
        .route("/api/paste", post(create_paste))
        .route("/api/top", get(top_pastes))
        .route("/api/recent", get(recent_pastes))
        .route("/paste/:id", get(view_paste))
        .route("/ping", get(ping))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_size))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

async fn index() -> Html<&'static str> {
    Html(render::INDEX_PAGE)
}

async fn create_paste(
    State(app): State<App>,
    new: NewPaste,
) -> crate::ApiResult<impl IntoResponse> {
    let paste = paste::create(&app, new).await?;
    let path = paste.path();

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, path.clone())],
        Json(CreatedPaste { url: path }),
    ))
}

async fn top_pastes(State(app): State<App>) -> crate::ApiResult<Json<Vec<PasteSummary>>> {
    Ok(Json(paste::top(&app, LISTING_LIMIT).await?))
}

async fn recent_pastes(State(app): State<App>) -> crate::ApiResult<Json<Vec<PasteSummary>>> {
    Ok(Json(paste::recent(&app, LISTING_LIMIT).await?))
}

async fn view_paste(
    State(app): State<App>,
    Path(id): Path<String>,
) -> crate::ApiResult<Html<String>> {
    let paste = paste::fetch(&app, &id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Html(render::paste_page(&paste)))
}

async fn ping() -> Json<Status> {
    Json(paste::healthcheck())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        // if the handler can't be installed, only SIGTERM stops the server
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
