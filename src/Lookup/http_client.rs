use reqwest::blocking::Client;
use thiserror::Error;

/// Status code and text body of a GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client trait for dependency injection
pub trait HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error>;
}

// Implementation for the real reqwest client
impl HttpClient for Client {
    fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let response = Client::get(self, url).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

/// Errors of the web services used to look up structures and draw reactions
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No data found for '{0}'")]
    NotFound(String),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        let ok = HttpResponse {
            status: 200,
            body: String::new(),
        };
        let missing = HttpResponse {
            status: 404,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!missing.is_success());
    }

    #[test]
    fn test_error_messages() {
        let err = LookupError::NotFound("unobtainium".to_string());
        assert_eq!(err.to_string(), "No data found for 'unobtainium'");
        let err: LookupError = url::Url::parse("not a url").unwrap_err().into();
        assert!(err.to_string().starts_with("URL parsing error"));
    }
}
