use actix_web::{delete, get, patch, web, HttpResponse, Responder};
use serde::Deserialize;

use super::{error_response, HttpState};

#[derive(Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct ReviewedRequest {
    pub is_reviewed: bool,
}

#[get("/submissions")]
pub async fn list_submissions(
    data: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    match data.app.submissions.list(query.search.as_deref()).await {
        Ok(submissions) => HttpResponse::Ok().json(submissions),
        Err(e) => {
            tracing::error!("Failed to list submissions: {}", e);
            error_response(&e)
        }
    }
}

#[get("/submissions/{id}")]
pub async fn get_submission(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    match data.app.submissions.get(path.into_inner()).await {
        Ok(submission) => HttpResponse::Ok().json(submission),
        Err(e) => error_response(&e),
    }
}

#[patch("/submissions/{id}/reviewed")]
pub async fn set_reviewed(
    data: web::Data<HttpState>,
    path: web::Path<i64>,
    req: web::Json<ReviewedRequest>,
) -> impl Responder {
    match data
        .app
        .submissions
        .set_reviewed(path.into_inner(), req.is_reviewed)
        .await
    {
        Ok(submission) => HttpResponse::Ok().json(submission),
        Err(e) => error_response(&e),
    }
}

#[delete("/submissions/{id}")]
pub async fn delete_submission(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    match data.app.submissions.delete(path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}
