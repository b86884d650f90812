use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use super::errors::TodoApiError;
use crate::api::dtos::todo::{CreateTodoDTO, UpdateTodoDTO};
use crate::models::todo_model::Todo;
use crate::storage::TodoStore;

fn parse_todo_id(raw: &str) -> Result<Uuid, TodoApiError> {
    Ok(Uuid::parse_str(raw.trim())?)
}

/// Api handler for getting all todos
pub async fn get_todos(store: web::Data<dyn TodoStore>) -> Result<HttpResponse, actix_web::Error> {
    let store = store.into_inner();

    let list = web::block(move || store.list()).await??;

    Ok(HttpResponse::Ok().json(json!({ "todos": list })))
}

/// Get a single todo
pub async fn get_todo(
    params: web::Path<String>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, actix_web::Error> {
    let todo_id = parse_todo_id(params.as_str())?;
    let store = store.into_inner();

    let todo = web::block(move || store.get(todo_id))
        .await??
        .ok_or_else(TodoApiError::todo_not_found)?;

    Ok(HttpResponse::Ok().json(json!({ "todo": todo })))
}

/// Create a new todo
///
/// A body that is not a JSON object carries no title and gets the same
/// answer as a missing one.
pub async fn create_todo(
    request_data: Option<web::Json<CreateTodoDTO>>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, actix_web::Error> {
    let title = request_data
        .map(web::Json::into_inner)
        .unwrap_or_default()
        .validated_title()?;
    let store = store.into_inner();

    let inserted = web::block(move || store.create(title)).await??;

    log::debug!("Created todo {}", inserted.id);

    Ok(HttpResponse::Created().json(json!({ "todo": inserted })))
}

/// Update a todo's title and/or completeness
pub async fn update_todo(
    params: web::Path<String>,
    request_data: web::Json<UpdateTodoDTO>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, actix_web::Error> {
    let todo_id = parse_todo_id(params.as_str())?;
    let request_data = request_data.into_inner();
    let store = store.into_inner();

    // unknown ids are reported before the body is validated
    let updated = web::block(move || -> Result<Option<Todo>, TodoApiError> {
        if store.get(todo_id)?.is_none() {
            return Ok(None);
        }

        store.update(todo_id, request_data.into_patch()?)
    })
    .await??
    .ok_or_else(TodoApiError::todo_not_found)?;

    Ok(HttpResponse::Ok().json(json!({ "todo": updated })))
}

/// Api to Delete a TODO
pub async fn delete_todo(
    params: web::Path<String>,
    store: web::Data<dyn TodoStore>,
) -> Result<HttpResponse, actix_web::Error> {
    let todo_id = parse_todo_id(params.as_str())?;
    let store = store.into_inner();

    let deleted = web::block(move || store.delete(todo_id)).await??;

    if !deleted {
        return Err(TodoApiError::todo_not_found().into());
    }

    log::debug!("Deleted todo {}", todo_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Todo deleted successfully" })))
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use actix_web::{
        http::{header, StatusCode},
        test, web, App,
    };
    use serde_json::{json, Value};

    use crate::{
        api::api::todo_routes,
        config::DEFAULT_CORS_ORIGINS,
        storage::{MemoryStore, TodoStore},
    };

    fn origins() -> Vec<String> {
        DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()
    }

    macro_rules! init_app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::from($store.clone()))
                    .configure(todo_routes(&origins())),
            )
            .await
        };
    }

    fn vary<B>(res: &actix_web::dev::ServiceResponse<B>) -> String {
        res.headers()
            .get(header::VARY)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    fn new_store() -> Arc<dyn TodoStore> {
        Arc::new(MemoryStore::new())
    }

    #[actix_web::test]
    async fn test_create_todo() {
        let store = new_store();
        let app = init_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/todos")
            .set_json(json!({ "title": "  buy milk " }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(res).await;
        let todo = &body["todo"];

        assert_eq!(todo["title"], "buy milk");
        assert_eq!(todo["completed"], false);
        assert_eq!(todo["createdAt"], todo["updatedAt"]);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_create_rejects_blank_title() {
        let store = new_store();
        let app = init_app!(store);

        for body in [json!({ "title": "   " }), json!({}), json!({ "title": 7 })] {
            let req = test::TestRequest::post()
                .uri("/api/todos")
                .set_json(body)
                .to_request();
            let res = test::call_service(&app, req).await;

            assert_eq!(res.status(), StatusCode::BAD_REQUEST);

            let body: Value = test::read_body_json(res).await;
            assert_eq!(body, json!({ "error": "Title is required" }));
        }

        assert!(store.list().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_create_without_an_object_body() {
        let store = new_store();
        let app = init_app!(store);

        for payload in ["", "null", "[]", "\"buy milk\"", "{\"title\":"] {
            let req = test::TestRequest::post()
                .uri("/api/todos")
                .insert_header((header::CONTENT_TYPE, "application/json"))
                .set_payload(payload)
                .to_request();
            let res = test::call_service(&app, req).await;

            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload {:?}", payload);

            let body: Value = test::read_body_json(res).await;
            assert_eq!(body, json!({ "error": "Title is required" }));
        }

        assert!(store.list().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_create_without_content_type() {
        let store = new_store();
        let app = init_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/todos")
            .set_payload("{\"title\":\"buy milk\"}")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(store.list().unwrap()[0].title, "buy milk");
    }

    #[actix_web::test]
    async fn test_update_malformed_json() {
        let store = new_store();
        let todo = store.create(String::from("buy milk")).unwrap();
        let app = init_app!(store);

        let req = test::TestRequest::put()
            .uri(&format!("/api/todos/{}", todo.id))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"completed\":")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({ "error": "Invalid JSON body" }));
    }

    #[actix_web::test]
    async fn test_update_todo() {
        let store = new_store();
        let todo = store.create(String::from("buy milk")).unwrap();
        let app = init_app!(store);

        let req = test::TestRequest::put()
            .uri(&format!("/api/todos/{}", todo.id))
            .set_json(json!({ "completed": true }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);

        let updated = store.get(todo.id).unwrap().unwrap();
        assert_eq!(updated.title, "buy milk");
        assert!(updated.completed);
        assert!(updated.updated_at > todo.updated_at);
    }

    #[actix_web::test]
    async fn test_update_rejects_blank_title() {
        let store = new_store();
        let todo = store.create(String::from("buy milk")).unwrap();
        let app = init_app!(store);

        let req = test::TestRequest::put()
            .uri(&format!("/api/todos/{}", todo.id))
            .set_json(json!({ "title": "" }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.get(todo.id).unwrap().unwrap().title, "buy milk");
    }

    #[actix_web::test]
    async fn test_update_unknown_id_with_blank_title() {
        let app = init_app!(new_store());

        let req = test::TestRequest::put()
            .uri(&format!("/api/todos/{}", uuid::Uuid::new_v4()))
            .set_json(json!({ "title": "  " }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({ "error": "Todo not found" }));
    }

    #[actix_web::test]
    async fn test_unknown_id_is_not_found() {
        let store = new_store();
        store.create(String::from("buy milk")).unwrap();
        let app = init_app!(store);

        let missing = uuid::Uuid::new_v4();

        let req = test::TestRequest::put()
            .uri(&format!("/api/todos/{}", missing))
            .set_json(json!({ "completed": true }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({ "error": "Todo not found" }));

        let req = test::TestRequest::delete()
            .uri(&format!("/api/todos/{}", missing))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri(&format!("/api/todos/{}", missing))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_malformed_id_is_bad_request() {
        let app = init_app!(new_store());

        let req = test::TestRequest::put()
            .uri("/api/todos/not-a-uuid")
            .set_json(json!({ "completed": true }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({ "error": "Invalid ID" }));

        let req = test::TestRequest::delete()
            .uri("/api/todos/42")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_todo_lifecycle() {
        let app = init_app!(new_store());

        let req = test::TestRequest::post()
            .uri("/api/todos")
            .set_json(json!({ "title": "buy milk" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["todo"]["completed"], false);
        let id = body["todo"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/todos/{}", id))
            .set_json(json!({ "completed": true }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        let updated = body["todo"].clone();
        assert_eq!(updated["completed"], true);

        let req = test::TestRequest::get().uri("/api/todos").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["todos"], json!([updated]));

        let req = test::TestRequest::delete()
            .uri(&format!("/api/todos/{}", id))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body, json!({ "message": "Todo deleted successfully" }));

        let req = test::TestRequest::get().uri("/api/todos").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["todos"], json!([]));
    }

    #[actix_web::test]
    async fn test_cors_allowed_origin() {
        let app = init_app!(new_store());

        let req = test::TestRequest::get()
            .uri("/api/todos")
            .insert_header((header::ORIGIN, "http://localhost:5173"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            res.headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
        assert!(vary(&res).contains("Origin"));
    }

    #[actix_web::test]
    async fn test_cors_unknown_origin() {
        let app = init_app!(new_store());

        let req = test::TestRequest::get()
            .uri("/api/todos")
            .insert_header((header::ORIGIN, "https://evil.example.com"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
        assert!(vary(&res).contains("Origin"));
    }

    #[actix_web::test]
    async fn test_cors_preflight() {
        let store = new_store();
        let app = init_app!(store);

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/todos")
            .insert_header((header::ORIGIN, "http://localhost:5173"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert!(res.status().is_success());
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );

        let methods = res
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap()
            .to_str()
            .unwrap();
        for method in ["GET", "POST", "PUT", "DELETE"] {
            assert!(methods.contains(method), "{} in {}", method, methods);
        }

        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_MAX_AGE).unwrap(),
            "86400"
        );
        assert!(store.list().unwrap().is_empty());
    }
}
