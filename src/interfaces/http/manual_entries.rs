use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use validator::Validate;

use super::{error_response, HttpState};
use crate::domain::manual_entry::NewManualEntry;

#[derive(Deserialize)]
pub struct NoteRequest {
    pub notes: String,
}

#[post("/manual-entries")]
pub async fn create_entry(
    data: web::Data<HttpState>,
    req: web::Json<NewManualEntry>,
) -> impl Responder {
    if let Err(e) = req.validate() {
        return HttpResponse::BadRequest().body(e.to_string());
    }

    match data.app.manual_entries.create(&req).await {
        Ok(entry) => HttpResponse::Ok().json(entry),
        Err(e) => {
            tracing::error!("Failed to create manual entry: {}", e);
            error_response(&e)
        }
    }
}

#[get("/manual-entries")]
pub async fn list_entries(data: web::Data<HttpState>) -> impl Responder {
    match data.app.manual_entries.list().await {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => {
            tracing::error!("Failed to list manual entries: {}", e);
            error_response(&e)
        }
    }
}

#[get("/manual-entries/{id}")]
pub async fn get_entry(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    match data.app.manual_entries.get(path.into_inner()).await {
        Ok(entry) => HttpResponse::Ok().json(entry),
        Err(e) => error_response(&e),
    }
}

#[delete("/manual-entries/{id}")]
pub async fn delete_entry(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match data.app.manual_entries.delete_cascade(id).await {
        Ok(()) => {
            tracing::info!("Deleted manual entry {} and its dependents", id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => {
            tracing::error!("Failed to delete manual entry {}: {}", id, e);
            error_response(&e)
        }
    }
}

#[post("/manual-entries/{id}/notes")]
pub async fn add_note(
    data: web::Data<HttpState>,
    path: web::Path<i64>,
    req: web::Json<NoteRequest>,
) -> impl Responder {
    match data
        .app
        .manual_entries
        .add_note(path.into_inner(), &req.notes)
        .await
    {
        Ok(note) => HttpResponse::Ok().json(note),
        Err(e) => error_response(&e),
    }
}

#[get("/manual-entries/{id}/notes")]
pub async fn list_notes(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    match data.app.manual_entries.list_notes(path.into_inner()).await {
        Ok(notes) => HttpResponse::Ok().json(notes),
        Err(e) => error_response(&e),
    }
}
