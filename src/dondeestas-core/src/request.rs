//! Request descriptors and response helpers for the REST client

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;

use crate::error::{DbError, Result};
use crate::models::Person;

/// Request describes one call against the database server.
///
/// `segments` are the path below the server root, each one escaped on its own
/// so an id can never spill into a neighbouring segment, the query or the
/// fragment. When `person` is set it is serialized to JSON and sent as the body.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    pub method: Method,
    pub segments: Vec<String>,
    pub person: Option<&'a Person>,
}

impl<'a> Request<'a> {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            person: None,
        }
    }

    /// Request against the server root
    pub fn root(method: Method) -> Self {
        Self::new(method, Vec::<String>::new())
    }

    pub fn with_person(mut self, person: &'a Person) -> Self {
        self.person = Some(person);
        self
    }
}

/// Decode a JSON document body
pub async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Turn a response the caller cannot interpret into an error, keeping the server's message
pub async fn unexpected_status(response: Response) -> DbError {
    DbError::UnexpectedStatus {
        status: response.status().as_u16(),
        message: response.text().await.unwrap_or_default(),
    }
}
