use crate::domain::model::{FieldErrorKind, RawCourse};
use crate::server::pages;
use crate::server::{catalog_url_with_notice, AppState, NoticeLevel, NoticeQuery};
use crate::utils::error::{CatalogError, ErrorCategory};
use crate::utils::monitor::ActivityStats;
use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use tracing::field::Empty;
use tracing::Span;

#[tracing::instrument(name = "render-index", skip_all)]
pub async fn index() -> Html<String> {
    Html(pages::index_page())
}

#[tracing::instrument(name = "render-course-catalog", skip_all, fields(catalog.page_views = Empty, courses.count = Empty))]
pub async fn course_catalog(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> Html<String> {
    let views = state.monitor.record_catalog_view();
    let courses = state.store.list().await;

    let span = Span::current();
    span.record("catalog.page_views", views);
    span.record("courses.count", courses.len());

    tracing::info!(courses.count = courses.len(), "Rendering course catalog");
    Html(pages::catalog_page(&courses, query.as_notice()))
}

pub async fn add_course_form() -> Html<String> {
    Html(pages::add_course_page(&RawCourse::new(), &[]))
}

#[tracing::instrument(name = "add-course-request", skip_all, fields(course.code = Empty, added_courses.count = Empty))]
pub async fn add_course(State(state): State<AppState>, Form(raw): Form<RawCourse>) -> Response {
    match state.store.submit(&raw).await {
        Ok(validated) => {
            let added = state.monitor.record_course_added();
            let span = Span::current();
            span.record("course.code", validated.course.code.as_str());
            span.record("added_courses.count", added);

            tracing::info!(course.code = %validated.course.code, "Course added");
            Redirect::to(&catalog_url_with_notice(
                "Course added successfully",
                NoticeLevel::Success,
            ))
            .into_response()
        }
        Err(CatalogError::Validation { errors }) => {
            let missing: Vec<String> = errors
                .iter()
                .filter(|e| e.kind == FieldErrorKind::MissingField)
                .map(|e| crate::domain::model::capitalize(&e.field))
                .collect();

            let mut messages = Vec::new();
            if missing.is_empty() {
                state.monitor.record_validation_error();
            } else {
                state.monitor.record_missing_fields();
                messages.push(format!(
                    "The following fields are required and cannot be empty: {}.",
                    missing.join(", ")
                ));
            }
            messages.extend(
                errors
                    .iter()
                    .filter(|e| e.kind != FieldErrorKind::MissingField)
                    .map(|e| format!("Validation error: {}", e)),
            );

            tracing::warn!(errors = %messages.join(" "), "Course submission rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(pages::add_course_page(&raw, &messages)),
            )
                .into_response()
        }
        Err(e) => {
            let status = match e.category() {
                ErrorCategory::Validation | ErrorCategory::Catalog => {
                    state.monitor.record_validation_error();
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                _ => {
                    state.monitor.record_storage_error();
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            tracing::error!(
                "❌ Failed to add course: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            (
                status,
                Html(pages::add_course_page(&raw, &[e.user_friendly_message()])),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(name = "course-details", skip(state))]
pub async fn course_details(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    match state.store.get(&code).await {
        Ok(course) => {
            tracing::info!("Course details viewed");
            Html(pages::course_details_page(&course)).into_response()
        }
        Err(e) => {
            tracing::warn!("Course not found");
            Redirect::to(&catalog_url_with_notice(
                &e.user_friendly_message(),
                NoticeLevel::Danger,
            ))
            .into_response()
        }
    }
}

#[tracing::instrument(name = "delete-course", skip(state), fields(error.deletion = Empty))]
pub async fn delete_course(State(state): State<AppState>, Path(code): Path<String>) -> Redirect {
    match state.store.delete(&code).await {
        Ok(_) => {
            tracing::info!("Course deleted");
            Redirect::to(&catalog_url_with_notice(
                &format!("Course with code {} deleted successfully.", code),
                NoticeLevel::Success,
            ))
        }
        Err(e) => {
            if matches!(e, CatalogError::NotFound { .. }) {
                let failures = state.monitor.record_deletion_error();
                Span::current().record("error.deletion", failures);
                tracing::warn!("Course deletion failed: {}", e);
            } else {
                state.monitor.record_storage_error();
                tracing::error!("❌ Course deletion failed: {}", e);
            }
            let message = match e {
                CatalogError::NotFound { .. } => e.user_friendly_message(),
                _ => format!("Failed to delete course with code {}.", code),
            };
            Redirect::to(&catalog_url_with_notice(&message, NoticeLevel::Danger))
        }
    }
}

pub async fn stats(State(state): State<AppState>) -> Json<ActivityStats> {
    Json(state.monitor.snapshot())
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
