use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use validator::Validate;

use super::{error_response, HttpState};
use crate::domain::supplier::{NewSupplierSetting, SupplierSettingPatch};

#[get("/supplier-settings")]
pub async fn list_settings(data: web::Data<HttpState>) -> impl Responder {
    match data.app.suppliers.list().await {
        Ok(settings) => HttpResponse::Ok().json(settings),
        Err(e) => {
            tracing::error!("Failed to list supplier settings: {}", e);
            error_response(&e)
        }
    }
}

#[post("/supplier-settings")]
pub async fn create_setting(
    data: web::Data<HttpState>,
    req: web::Json<NewSupplierSetting>,
) -> impl Responder {
    if let Err(e) = req.validate() {
        return HttpResponse::BadRequest().body(e.to_string());
    }

    match data.app.suppliers.create(&req).await {
        Ok(setting) => HttpResponse::Ok().json(setting),
        Err(e) => {
            tracing::error!("Failed to create supplier setting: {}", e);
            error_response(&e)
        }
    }
}

#[patch("/supplier-settings/{id}")]
pub async fn update_setting(
    data: web::Data<HttpState>,
    path: web::Path<i64>,
    req: web::Json<SupplierSettingPatch>,
) -> impl Responder {
    match data.app.suppliers.update(path.into_inner(), &req).await {
        Ok(setting) => HttpResponse::Ok().json(setting),
        Err(e) => error_response(&e),
    }
}

#[patch("/supplier-settings/{id}/activate")]
pub async fn activate_setting(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();
    match data.app.suppliers.activate(id).await {
        Ok(setting) => {
            tracing::info!("Activated supplier setting {}", id);
            HttpResponse::Ok().json(setting)
        }
        Err(e) => error_response(&e),
    }
}

#[delete("/supplier-settings/{id}")]
pub async fn delete_setting(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    match data.app.suppliers.delete(path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}
