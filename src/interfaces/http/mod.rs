pub mod imports;
pub mod manual_entries;
pub mod quotes;
pub mod submissions;
pub mod supplier_settings;
pub mod todos;

use actix_cors::Cors;
use actix_web::{dev::Server, get, web, App, HttpResponse, HttpServer, Responder};
use std::net::ToSocketAddrs;
use std::sync::Arc;

use crate::domain::error::AppError;
use crate::infrastructure::bootstrap::AppState;

pub struct HttpState {
    pub app: Arc<AppState>,
}

pub(crate) fn error_response(err: &AppError) -> HttpResponse {
    match err {
        AppError::NotFound(_) => HttpResponse::NotFound().body(err.to_string()),
        AppError::ValidationError(_) | AppError::ParseError(_) => {
            HttpResponse::BadRequest().body(err.to_string())
        }
        _ => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn start_server(app: Arc<AppState>, bind_addr: &str) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState { app });

    let addr = bind_addr
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| std::io::Error::other(format!("Invalid bind address: {bind_addr}")))?;

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Browser UI is served separately

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(health)
            .service(
                web::scope("/api")
                    .service(imports::preview_import)
                    .service(imports::commit_import)
                    .service(submissions::list_submissions)
                    .service(submissions::get_submission)
                    .service(submissions::set_reviewed)
                    .service(submissions::delete_submission)
                    .service(manual_entries::create_entry)
                    .service(manual_entries::list_entries)
                    .service(manual_entries::get_entry)
                    .service(manual_entries::delete_entry)
                    .service(manual_entries::add_note)
                    .service(manual_entries::list_notes)
                    .service(quotes::create_draft)
                    .service(quotes::list_drafts)
                    .service(quotes::update_draft)
                    .service(quotes::add_item)
                    .service(quotes::list_items)
                    .service(quotes::update_item)
                    .service(quotes::delete_item)
                    .service(supplier_settings::list_settings)
                    .service(supplier_settings::create_setting)
                    .service(supplier_settings::activate_setting)
                    .service(supplier_settings::update_setting)
                    .service(supplier_settings::delete_setting)
                    .service(todos::list_todos)
                    .service(todos::create_todo)
                    .service(todos::update_todo)
                    .service(todos::delete_todo),
            )
    })
    .bind(addr)?
    .run();

    Ok(server)
}
