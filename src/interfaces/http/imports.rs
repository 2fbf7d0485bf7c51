use actix_web::{post, web, HttpResponse, Responder};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::{error_response, HttpState};
use crate::domain::submission::SubmissionRecord;

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub file_base64: String,
}

#[derive(Deserialize)]
pub struct CommitRequest {
    pub records: Vec<SubmissionRecord>,
}

#[derive(Serialize)]
pub struct CommitResponse {
    pub uploaded: u64,
}

/// "파일 분석": parse the uploaded workbook and reconcile it against stored
/// submissions. Nothing is persisted.
#[post("/import/preview")]
pub async fn preview_import(
    data: web::Data<HttpState>,
    req: web::Json<PreviewRequest>,
) -> impl Responder {
    let bytes = match BASE64.decode(req.file_base64.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            return HttpResponse::BadRequest().body(format!("Invalid base64 payload: {}", e));
        }
    };

    match data.app.import.preview(&bytes).await {
        Ok(preview) => HttpResponse::Ok().json(preview),
        Err(e) => {
            tracing::error!("Import preview failed: {}", e);
            error_response(&e)
        }
    }
}

/// "서버에 업로드": upsert the reviewed batch in one call.
#[post("/import/commit")]
pub async fn commit_import(
    data: web::Data<HttpState>,
    req: web::Json<CommitRequest>,
) -> impl Responder {
    match data.app.import.commit(&req.records).await {
        Ok(uploaded) => {
            tracing::info!("Uploaded {} submissions", uploaded);
            HttpResponse::Ok().json(CommitResponse { uploaded })
        }
        Err(e) => {
            tracing::error!("Import commit failed: {}", e);
            error_response(&e)
        }
    }
}
