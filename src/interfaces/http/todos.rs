use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};

use super::{error_response, HttpState};
use crate::domain::todo::{NewTodoItem, TodoPatch};

#[get("/todos")]
pub async fn list_todos(data: web::Data<HttpState>) -> impl Responder {
    match data.app.todos.list().await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => {
            tracing::error!("Failed to list todo items: {}", e);
            error_response(&e)
        }
    }
}

#[post("/todos")]
pub async fn create_todo(data: web::Data<HttpState>, req: web::Json<NewTodoItem>) -> impl Responder {
    match data.app.todos.create(&req).await {
        Ok(item) => HttpResponse::Ok().json(item),
        Err(e) => error_response(&e),
    }
}

#[patch("/todos/{id}")]
pub async fn update_todo(
    data: web::Data<HttpState>,
    path: web::Path<i64>,
    req: web::Json<TodoPatch>,
) -> impl Responder {
    match data.app.todos.update(path.into_inner(), &req).await {
        Ok(item) => HttpResponse::Ok().json(item),
        Err(e) => error_response(&e),
    }
}

#[delete("/todos/{id}")]
pub async fn delete_todo(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    match data.app.todos.delete(path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}
