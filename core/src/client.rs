//! Request builder and response parser for the film records API.
//!
//! `FilmClient` holds only a `base_url`. Each operation is a `build_*` that
//! produces an `HttpRequest` and a `parse_*` that consumes the matching
//! `HttpResponse`; the round-trip in between belongs to the caller.

use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{DeletedFilm, ErrorBody, Film, FilmPatch, NewFilm};

#[derive(Debug, Clone)]
pub struct FilmClient {
    base_url: String,
}

impl FilmClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_films(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/records".to_string(), None)
    }

    pub fn build_get_film(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/records/{id}"), None)
    }

    pub fn build_create_film(&self, input: &NewFilm) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.request(HttpMethod::Post, "/records".to_string(), Some(body)))
    }

    pub fn build_update_film(&self, id: Uuid, patch: &FilmPatch) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(patch)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.request(HttpMethod::Put, format!("/records/{id}"), Some(body)))
    }

    pub fn build_delete_film(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/records/{id}"), None)
    }

    pub fn parse_list_films(&self, response: HttpResponse) -> Result<Vec<Film>, ApiError> {
        parse_body(response, 200)
    }

    pub fn parse_get_film(&self, response: HttpResponse) -> Result<Film, ApiError> {
        parse_body(response, 200)
    }

    pub fn parse_create_film(&self, response: HttpResponse) -> Result<Film, ApiError> {
        parse_body(response, 201)
    }

    pub fn parse_update_film(&self, response: HttpResponse) -> Result<Film, ApiError> {
        parse_body(response, 200)
    }

    pub fn parse_delete_film(&self, response: HttpResponse) -> Result<DeletedFilm, ApiError> {
        parse_body(response, 200)
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let headers = if body.is_some() {
            vec![("content-type".to_string(), "application/json".to_string())]
        } else {
            Vec::new()
        };
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers,
            body,
        }
    }
}

fn parse_body<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<T, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-expected status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    match response.status {
        s if s == expected => Ok(()),
        404 => Err(ApiError::NotFound),
        400 => {
            let message = serde_json::from_str::<ErrorBody>(&response.body)
                .map(|b| b.message)
                .unwrap_or_else(|_| response.body.clone());
            Err(ApiError::Validation { message })
        }
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILM_JSON: &str = r#"{"id":"00000000-0000-0000-0000-000000000001","title":"Dune","genre":"Sci-Fi","year":2021,"watched":false,"watchlist":true,"createdAt":"2024-03-01T10:00:00Z"}"#;

    fn client() -> FilmClient {
        FilmClient::new("http://localhost:5000")
    }

    #[test]
    fn build_list_films_produces_correct_request() {
        let req = client().build_list_films();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:5000/records");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_film_produces_correct_request() {
        let req = client().build_get_film(Uuid::nil());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:5000/records/00000000-0000-0000-0000-000000000000"
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_film_produces_json_post() {
        let input = NewFilm {
            title: "Dune".to_string(),
            genre: "Sci-Fi".to_string(),
            year: 2021,
            watched: false,
            watchlist: false,
        };
        let req = client().build_create_film(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:5000/records");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["title"], "Dune");
        assert_eq!(body["year"], 2021);
        assert_eq!(body["watchlist"], false);
    }

    #[test]
    fn build_update_film_omits_unset_fields() {
        let patch = FilmPatch {
            watched: Some(true),
            ..Default::default()
        };
        let req = client().build_update_film(Uuid::nil(), &patch).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["watched"], true);
        assert!(body.get("title").is_none());
    }

    #[test]
    fn build_delete_film_produces_correct_request() {
        let req = client().build_delete_film(Uuid::nil());
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_films_success() {
        let response = HttpResponse::new(200, format!("[{FILM_JSON}]"));
        let films = client().parse_list_films(response).unwrap();
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].title, "Dune");
        assert!(films[0].watchlist);
    }

    #[test]
    fn parse_get_film_not_found() {
        let response = HttpResponse::new(404, r#"{"message":"film not found"}"#);
        let err = client().parse_get_film(response).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_create_film_success() {
        let response = HttpResponse::new(201, FILM_JSON);
        let film = client().parse_create_film(response).unwrap();
        assert_eq!(film.year, 2021);
    }

    #[test]
    fn parse_create_film_validation_message() {
        let response = HttpResponse::new(400, r#"{"message":"title, genre and year are required"}"#);
        let err = client().parse_create_film(response).unwrap_err();
        match err {
            ApiError::Validation { message } => {
                assert_eq!(message, "title, genre and year are required")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_create_film_server_error() {
        let response = HttpResponse::new(500, r#"{"message":"internal server error"}"#);
        let err = client().parse_create_film(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_delete_film_returns_deleted_record() {
        let response = HttpResponse::new(
            200,
            format!(r#"{{"message":"film deleted","deletedRecord":{FILM_JSON}}}"#),
        );
        let deleted = client().parse_delete_film(response).unwrap();
        assert_eq!(deleted.message, "film deleted");
        assert_eq!(deleted.deleted_record.title, "Dune");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = FilmClient::new("http://localhost:5000/");
        assert_eq!(client.build_list_films().path, "http://localhost:5000/records");
    }

    #[test]
    fn parse_list_films_bad_json() {
        let response = HttpResponse::new(200, "not json");
        let err = client().parse_list_films(response).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
