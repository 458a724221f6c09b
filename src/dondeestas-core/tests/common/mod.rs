//! In-process stand-in for a CouchDB server
#![allow(dead_code)]

use actix_web::{
    dev::ServerHandle, http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer,
};
use chrono::{TimeZone, Utc};
use dondeestas_core::{DatabaseConfig, DbKind, Person, Position};
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// How document and database routes answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FakeMode {
    #[default]
    Normal,
    /// Writes and deletes are applied but answered with 202 Accepted
    Accepted,
    /// Every database and document request is answered with this status
    Fail(u16),
}

#[derive(Default)]
struct FakeState {
    /// database name -> document id -> document
    dbs: Mutex<HashMap<String, HashMap<String, Value>>>,
    mode: Mutex<FakeMode>,
}

pub struct FakeCouch {
    /// Host with a scheme prefix, the way a user would usually write it
    pub hostname: String,
    pub port: u16,
    state: web::Data<FakeState>,
    handle: ServerHandle,
}

impl FakeCouch {
    pub fn config(&self, dbname: &str) -> DatabaseConfig {
        DatabaseConfig::new(DbKind::CouchDb, dbname, self.hostname.clone(), self.port)
    }

    pub async fn set_mode(&self, mode: FakeMode) {
        *self.state.mode.lock().await = mode;
    }

    /// Stop listening and drop open connections
    pub async fn shutdown(&self) {
        self.handle.stop(false).await;
    }
}

pub fn spawn_fake_couch() -> std::io::Result<FakeCouch> {
    let state = web::Data::new(FakeState::default());

    let app_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .route("/", web::to(root_handler))
            .route("/{db}", web::to(database_handler))
            .route("/{db}/{id}", web::to(document_handler))
            .default_service(web::to(|| async { not_found("missing") }))
    })
    .workers(1)
    .keep_alive(actix_web::http::KeepAlive::Disabled)
    .bind(("127.0.0.1", 0))?;

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok(FakeCouch {
        hostname: format!("http://{}", addr.ip()),
        port: addr.port(),
        state,
        handle,
    })
}

async fn root_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({"couchdb": "Welcome"}))
}

fn failure(status: u16) -> HttpResponse {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(json!({"error": "unknown_error", "reason": "injected"}))
}

async fn database_handler(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<FakeState>,
) -> HttpResponse {
    if let FakeMode::Fail(status) = *state.mode.lock().await {
        return failure(status);
    }

    let db = path.into_inner();
    let mut dbs = state.dbs.lock().await;

    match req.method().as_str() {
        "HEAD" => {
            if dbs.contains_key(&db) {
                HttpResponse::Ok().finish()
            } else {
                HttpResponse::NotFound().finish()
            }
        }
        "PUT" => {
            if dbs.contains_key(&db) {
                HttpResponse::PreconditionFailed().json(json!({
                    "error": "file_exists",
                    "reason": "The database could not be created, the file already exists."
                }))
            } else {
                dbs.insert(db, HashMap::new());
                HttpResponse::Created().json(json!({"ok": true}))
            }
        }
        _ => HttpResponse::MethodNotAllowed().finish(),
    }
}

async fn document_handler(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Bytes,
    state: web::Data<FakeState>,
) -> HttpResponse {
    let mode = *state.mode.lock().await;
    if let FakeMode::Fail(status) = mode {
        return failure(status);
    }
    let written = if mode == FakeMode::Accepted {
        StatusCode::ACCEPTED
    } else {
        StatusCode::CREATED
    };
    let deleted = if mode == FakeMode::Accepted {
        StatusCode::ACCEPTED
    } else {
        StatusCode::OK
    };

    let (db, id) = path.into_inner();
    let mut dbs = state.dbs.lock().await;
    let Some(docs) = dbs.get_mut(&db) else {
        return not_found("Database does not exist.");
    };

    match req.method().as_str() {
        "GET" => match docs.get(&id) {
            Some(doc) => HttpResponse::Ok().json(doc),
            None => not_found("missing"),
        },
        "HEAD" => match docs.get(&id) {
            Some(doc) => HttpResponse::Ok()
                .insert_header(("ETag", format!("\"{}\"", doc["_rev"].as_str().unwrap_or_default())))
                .finish(),
            None => HttpResponse::NotFound().finish(),
        },
        "PUT" => {
            let Ok(mut doc) = serde_json::from_slice::<Value>(&body) else {
                return HttpResponse::BadRequest()
                    .json(json!({"error": "bad_request", "reason": "invalid UTF-8 JSON"}));
            };
            let rev = format!("1-{}", Uuid::new_v4().simple());
            doc["_id"] = json!(id);
            doc["_rev"] = json!(rev);
            docs.insert(id.clone(), doc);
            HttpResponse::build(written).json(json!({"id": id, "ok": true, "rev": rev}))
        }
        "DELETE" => match docs.remove(&id) {
            Some(_) => HttpResponse::build(deleted).json(json!({"id": id, "ok": true})),
            None => not_found("missing"),
        },
        _ => HttpResponse::MethodNotAllowed().finish(),
    }
}

fn not_found(reason: &str) -> HttpResponse {
    HttpResponse::NotFound().json(json!({"error": "not_found", "reason": reason}))
}

pub fn random_string() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn random_person() -> Person {
    let seed = (Uuid::new_v4().as_u128() % 10_000) as f32;
    Person {
        id: random_string(),
        name: random_string(),
        position: Position {
            tov: Utc.with_ymd_and_hms(2017, 6, 1, 12, 30, 0).unwrap(),
            latitude: seed / 4.0,
            longitude: -seed / 8.0,
            elevation: seed,
        },
        visible: true,
        whitelist: vec![random_string(), random_string()],
        following: vec![random_string()],
    }
}
