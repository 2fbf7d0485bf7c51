use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde::Deserialize;

use super::{error_response, HttpState};
use crate::domain::quote::{NewQuoteDraft, NewQuoteItem, QuoteDraftPatch, QuoteItemPatch};

#[derive(Deserialize)]
pub struct DraftQuery {
    pub submission_id: Option<i64>,
    pub entry_id: Option<i64>,
}

#[post("/quote-drafts")]
pub async fn create_draft(
    data: web::Data<HttpState>,
    req: web::Json<NewQuoteDraft>,
) -> impl Responder {
    match data.app.quotes.create(&req).await {
        Ok(draft) => HttpResponse::Ok().json(draft),
        Err(e) => error_response(&e),
    }
}

#[get("/quote-drafts")]
pub async fn list_drafts(
    data: web::Data<HttpState>,
    query: web::Query<DraftQuery>,
) -> impl Responder {
    match data
        .app
        .quotes
        .list(query.submission_id, query.entry_id)
        .await
    {
        Ok(drafts) => HttpResponse::Ok().json(drafts),
        Err(e) => error_response(&e),
    }
}

#[patch("/quote-drafts/{id}")]
pub async fn update_draft(
    data: web::Data<HttpState>,
    path: web::Path<i64>,
    req: web::Json<QuoteDraftPatch>,
) -> impl Responder {
    match data.app.quotes.update(path.into_inner(), &req).await {
        Ok(draft) => HttpResponse::Ok().json(draft),
        Err(e) => error_response(&e),
    }
}

#[post("/quote-drafts/{id}/items")]
pub async fn add_item(
    data: web::Data<HttpState>,
    path: web::Path<i64>,
    req: web::Json<NewQuoteItem>,
) -> impl Responder {
    match data.app.quotes.add_item(path.into_inner(), &req).await {
        Ok(item) => HttpResponse::Ok().json(item),
        Err(e) => error_response(&e),
    }
}

#[get("/quote-drafts/{id}/items")]
pub async fn list_items(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    match data.app.quotes.list_items(path.into_inner()).await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => error_response(&e),
    }
}

#[patch("/quote-items/{id}")]
pub async fn update_item(
    data: web::Data<HttpState>,
    path: web::Path<i64>,
    req: web::Json<QuoteItemPatch>,
) -> impl Responder {
    match data.app.quotes.update_item(path.into_inner(), &req).await {
        Ok(item) => HttpResponse::Ok().json(item),
        Err(e) => error_response(&e),
    }
}

#[delete("/quote-items/{id}")]
pub async fn delete_item(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    match data.app.quotes.delete_item(path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}
