#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token exchange rejected ({status}): {detail}")]
    Exchange { status: u16, detail: String },
    #[error("profile fetch rejected ({status}): {detail}")]
    Profile { status: u16, detail: String },
    #[error("session token error: {0}")]
    Token(String),
    #[error("invalid form id: {0}")]
    InvalidFormId(String),
}
