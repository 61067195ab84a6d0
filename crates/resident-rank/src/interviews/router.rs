use std::io::Cursor;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::Local;

use super::export::CsvExport;
use super::repository::SessionStore;
use super::service::InterviewService;
use super::session::SessionId;
use super::views::{DetailView, FinalOrderView, MoveRequest, RankingView, ReorderRequest};
use crate::error::AppError;

/// Router builder exposing one endpoint per ranking-session interaction.
pub fn interview_router<S>(service: Arc<InterviewService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/sessions/:session_id",
            delete(reset_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/upload",
            post(upload_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/ranking",
            get(ranking_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/applicants/:applicant",
            get(detail_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/final-order",
            get(final_order_handler::<S>).put(reorder_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/final-order/move",
            post(move_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/export/ranking",
            get(export_ranking_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/export/final-order",
            get(export_final_order_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn upload_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    let summary = service.upload(&id, Cursor::new(body))?;
    Ok((StatusCode::CREATED, axum::Json(summary)).into_response())
}

pub(crate) async fn ranking_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    let (summary, ranking) = service.overview(&id)?;
    Ok((StatusCode::OK, axum::Json(RankingView::new(summary, ranking))).into_response())
}

pub(crate) async fn detail_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    Path((session_id, applicant)): Path<(String, String)>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    let detail = service.detail(&id, &applicant)?;
    Ok((StatusCode::OK, axum::Json(DetailView::from(detail))).into_response())
}

pub(crate) async fn final_order_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    let entries = service.final_order(&id)?;
    Ok((StatusCode::OK, axum::Json(FinalOrderView { entries })).into_response())
}

pub(crate) async fn reorder_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<ReorderRequest>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    let entries = service.reorder(&id, request.order)?;
    Ok((StatusCode::OK, axum::Json(FinalOrderView { entries })).into_response())
}

pub(crate) async fn move_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<MoveRequest>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    let entries = service.move_item(&id, request.from, request.to)?;
    Ok((StatusCode::OK, axum::Json(FinalOrderView { entries })).into_response())
}

pub(crate) async fn export_ranking_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    let export = service.export_ranking(&id, Local::now().date_naive())?;
    Ok(csv_attachment(export))
}

pub(crate) async fn export_final_order_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    let export = service.export_final_order(&id, Local::now().date_naive())?;
    Ok(csv_attachment(export))
}

pub(crate) async fn reset_handler<S>(
    State(service): State<Arc<InterviewService<S>>>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    service.reset(&id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

fn csv_attachment(export: CsvExport) -> Response {
    let headers = [
        (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.file_name),
        ),
    ];
    (StatusCode::OK, headers, export.body).into_response()
}
