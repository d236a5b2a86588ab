use serde::{Deserialize, Serialize};

/// Value of the `status` field in every API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// Uniform response wrapper: `{"status": "...", ...payload}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: Status,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(payload: T) -> axum::Json<Self> {
        axum::Json(Self {
            status: Status::Ok,
            payload,
        })
    }
}

impl Envelope<ErrorMessage> {
    pub fn error(message: impl Into<String>) -> axum::Json<Self> {
        axum::Json(Self {
            status: Status::Error,
            payload: ErrorMessage {
                message: message.into(),
            },
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

/// No payload beyond the status.
#[derive(Debug, Serialize)]
pub struct Empty {}

#[derive(Debug, Serialize)]
pub struct PageBody {
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct PageList {
    pub pages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TagList {
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TaggedPages {
    pub tag: String,
    pub pages: Vec<String>,
}
