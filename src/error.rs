#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum Error {
    #[error("request to {url} failed with status {status}: {body}")]
    RemoteService {
        url: String,
        status: u16,
        body: String,
    },
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("No records to export")]
    EmptyResult,
    #[error("{0}")]
    Request(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Request(error.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(error: quick_xml::Error) -> Self {
        Error::MalformedResponse(error.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Error::Csv(error.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Io(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
