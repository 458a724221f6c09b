use actix_cors::Cors;
use actix_web::{
    http::{header, StatusCode},
    web, HttpRequest, HttpResponse, ResponseError,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;

use dondeestas_core::config::CorsConfig;
use dondeestas_core::models::{ErrorResponse, Person, PersonDataRequest, PersonDataResponse};
use dondeestas_core::{DbClient, DbError};

/// Shared application state
pub struct AppState {
    pub db: Arc<dyn DbClient>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request body is empty")]
    EmptyBody,

    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] DbError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::EmptyBody | ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            ApiError::EmptyBody | ApiError::InvalidBody(_) => "invalid request",
            ApiError::Database(_) => "database failure",
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error.to_string(),
            message: Some(self.to_string()),
        })
    }
}

/// Decode a JSON request body into `T`
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.is_empty() {
        return Err(ApiError::EmptyBody);
    }
    Ok(serde_json::from_slice(body)?)
}

fn log_request(http_req: &HttpRequest, body: &[u8]) {
    tracing::debug!(
        method = %http_req.method(),
        path = %http_req.path(),
        body = %String::from_utf8_lossy(body),
        "Incoming request"
    );
}

/// Look up a batch of people
/// ANY /person
///
/// Responds 200 when every id was found and 206 when only some were.
#[tracing::instrument(skip(body, state, http_req))]
pub async fn person_request(
    body: web::Bytes,
    state: web::Data<AppState>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    log_request(&http_req, &body);

    let req: PersonDataRequest = decode_json(&body)?;
    tracing::info!(ids = ?req.ids, "Received request for people");

    let mut people = Vec::with_capacity(req.ids.len());
    for id in &req.ids {
        match state.db.get(id).await {
            Ok(person) => people.push(person),
            Err(e) => tracing::debug!(id = %id, error = %e, "Person not returned"),
        }
    }

    let status = if people.len() == req.ids.len() {
        StatusCode::OK
    } else {
        StatusCode::PARTIAL_CONTENT
    };

    Ok(HttpResponse::build(status).json(PersonDataResponse { people }))
}

/// Create or replace a person
/// ANY /update
#[tracing::instrument(skip(body, state, http_req))]
pub async fn update_person(
    body: web::Bytes,
    state: web::Data<AppState>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    log_request(&http_req, &body);

    let update: Person = decode_json(&body)?;
    tracing::info!(id = %update.id, "Received update for person");

    let result = if state.db.exists(&update.id).await {
        state.db.update(&update).await
    } else {
        state.db.create(&update).await
    };

    if let Err(e) = result {
        tracing::error!(id = %update.id, error = %e, "Failed to store person");
        return Err(e.into());
    }

    Ok(HttpResponse::Created().finish())
}

/// Build the CORS middleware from configuration
pub fn cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default();

    if config.enabled {
        if config.allowed_origins.iter().any(|origin| origin == "*") {
            cors = cors.allow_any_origin();
        } else {
            for origin in &config.allowed_origins {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allowed_methods(vec!["GET", "POST", "PUT"])
            .allowed_header(header::CONTENT_TYPE)
            .max_age(3600);
    }

    cors
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/person", web::route().to(person_request))
        .route("/update", web::route().to(update_person));
}
