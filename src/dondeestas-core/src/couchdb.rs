use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, ETAG};
use reqwest::{Client, Method, Response, StatusCode, Url};
use std::time::Duration;

use crate::client::DbClient;
use crate::config::DatabaseConfig;
use crate::error::{DbError, Result};
use crate::models::{DocResponse, Person};
use crate::request::{parse_json, unexpected_status, Request};

/// CouchDB-style REST client.
///
/// Documents live at `{url}/{dbname}/{id}`, with the id percent-encoded as a
/// single path segment. Revisions are not tracked, so every write overwrites
/// whatever the server holds for the same id.
pub struct CouchDb {
    dbname: String,
    hostname: String,
    port: u16,
    url: String,
    base: Url,
    client: Client,
}

impl CouchDb {
    /// Build a client without validating the configuration or contacting the server
    pub fn new(config: &DatabaseConfig) -> Result<Self> {
        let hostname = strip_scheme(config.hostname.trim()).to_string();

        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        let url = base_url(&hostname, config.port);
        let base = Url::parse(&url)
            .map_err(|e| DbError::Validation(format!("invalid database url {}: {}", url, e)))?;

        Ok(Self {
            dbname: config.name.clone(),
            url,
            base,
            hostname,
            port: config.port,
            client: builder.build()?,
        })
    }

    /// Validate the configuration, check that the server answers and make sure
    /// the database exists
    pub async fn init(config: &DatabaseConfig) -> Result<Self> {
        validate(config)?;
        let db = Self::new(config)?;

        // Any status from the server root proves connectivity
        db.req(&Request::root(Method::HEAD)).await?;

        match db.create_db().await {
            Ok(true) => tracing::debug!(db = %db.dbname, "Created database"),
            Ok(false) => tracing::debug!(db = %db.dbname, "Database already exists"),
            Err(DbError::Transport(e)) => return Err(DbError::Transport(e)),
            Err(e) => tracing::debug!(db = %db.dbname, error = %e, "Could not create database"),
        }

        Ok(db)
    }

    pub fn dbname(&self) -> &str {
        &self.dbname
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Create the database unless it already exists.
    ///
    /// Returns `Ok(true)` when it was created and `Ok(false)` when it was
    /// already there or the name is empty.
    pub async fn create_db(&self) -> Result<bool> {
        if self.dbname.is_empty() {
            return Ok(false);
        }

        let probe = self
            .req(&Request::new(Method::HEAD, [self.dbname.as_str()]))
            .await?;
        if probe.status() == StatusCode::OK {
            return Ok(false);
        }

        let response = self
            .req(&Request::new(Method::PUT, [self.dbname.as_str()]))
            .await?;
        match response.status() {
            StatusCode::CREATED | StatusCode::ACCEPTED => Ok(true),
            StatusCode::PRECONDITION_FAILED => Ok(false),
            _ => Err(unexpected_status(response).await),
        }
    }

    /// Path of a person document relative to the server root, unescaped
    pub fn person_path(&self, id: &str) -> String {
        format!("{}/{}", self.dbname, id)
    }

    fn person_request<'a>(&self, method: Method, id: &str) -> Request<'a> {
        Request::new(method, [self.dbname.as_str(), id])
    }

    /// Full URL for a request; every segment is percent-encoded on its own
    pub fn request_url(&self, request: &Request<'_>) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DbError::Validation(format!("{} cannot take a path", self.url)))?
            .pop_if_empty()
            .extend(&request.segments);
        Ok(url)
    }

    /// Issue a request. Only connection level failures are errors here, any
    /// status code is handed back to the caller.
    pub async fn req(&self, request: &Request<'_>) -> Result<Response> {
        let url = self.request_url(request)?;
        let mut builder = self.client.request(request.method.clone(), url.clone());

        if let Some(person) = request.person {
            let body = serde_json::to_vec(person)?;
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await?;
        tracing::debug!(
            method = %request.method,
            url = %url,
            status = response.status().as_u16(),
            "Database request"
        );

        Ok(response)
    }

    /// Existence check that keeps the reason a lookup failed
    pub async fn try_exists(&self, id: &str) -> Result<bool> {
        require_id(id)?;

        let response = self
            .req(&self.person_request(Method::HEAD, id))
            .await?;
        match response.status() {
            StatusCode::OK => {
                if let Some(etag) = response.headers().get(ETAG) {
                    tracing::debug!(id = %id, etag = ?etag, "Person exists");
                }
                Ok(true)
            }
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(unexpected_status(response).await),
        }
    }

    #[tracing::instrument(skip(self, person), fields(id = %person.id))]
    async fn write(&self, person: &Person) -> Result<()> {
        require_id(&person.id)?;

        let request = self.person_request(Method::PUT, &person.id).with_person(person);
        let response = self.req(&request).await?;

        match response.status() {
            StatusCode::CREATED | StatusCode::ACCEPTED => {
                let doc: DocResponse = parse_json(response).await?;
                tracing::debug!(
                    path = %self.person_path(&person.id),
                    rev = %doc.rev,
                    ok = doc.ok,
                    "Stored person"
                );
                Ok(())
            }
            _ => Err(unexpected_status(response).await),
        }
    }
}

#[async_trait]
impl DbClient for CouchDb {
    async fn create(&self, person: &Person) -> Result<()> {
        self.write(person).await
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<Person> {
        require_id(id)?;

        let response = self
            .req(&self.person_request(Method::GET, id))
            .await?;
        match response.status() {
            StatusCode::OK => parse_json(response).await,
            StatusCode::NOT_FOUND => Err(DbError::NotFound(id.to_string())),
            _ => Err(unexpected_status(response).await),
        }
    }

    async fn update(&self, person: &Person) -> Result<()> {
        self.write(person).await
    }

    #[tracing::instrument(skip(self))]
    async fn remove(&self, id: &str) -> Result<()> {
        require_id(id)?;

        let response = self
            .req(&self.person_request(Method::DELETE, id))
            .await?;
        match response.status() {
            StatusCode::OK | StatusCode::ACCEPTED => Ok(()),
            StatusCode::NOT_FOUND => Err(DbError::NotFound(id.to_string())),
            _ => Err(unexpected_status(response).await),
        }
    }

    async fn exists(&self, id: &str) -> bool {
        self.try_exists(id).await.unwrap_or(false)
    }
}

fn validate(config: &DatabaseConfig) -> Result<()> {
    if config.name.trim().is_empty() {
        return Err(DbError::Validation("database name is required".to_string()));
    }
    if strip_scheme(config.hostname.trim()).is_empty() {
        return Err(DbError::Validation("hostname is required".to_string()));
    }
    if config.port == 0 {
        return Err(DbError::Validation("port must be positive".to_string()));
    }
    Ok(())
}

fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(DbError::Validation("person id is required".to_string()));
    }
    Ok(())
}

/// Drop a leading `scheme://` from a host
fn strip_scheme(hostname: &str) -> &str {
    match hostname.find("://") {
        Some(pos) => &hostname[pos + 3..],
        None => hostname,
    }
}

fn base_url(hostname: &str, port: u16) -> String {
    format!("http://{}:{}", hostname, port)
}
