use std::fmt;

#[derive(Debug)]
pub enum FormdeskError {
    Line(String),
    Sheets(String),
    Config(String),
    Signature(String),
    Server(String),
    Http { status: u16, body: String },
}

impl fmt::Display for FormdeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(msg) => write!(f, "line error: {msg}"),
            Self::Sheets(msg) => write!(f, "sheets error: {msg}"),
            Self::Config(msg) => write!(f, "config error: {msg}"),
            Self::Signature(msg) => write!(f, "signature error: {msg}"),
            Self::Server(msg) => write!(f, "server error: {msg}"),
            Self::Http { status, body } => write!(f, "http error ({status}): {body}"),
        }
    }
}

impl std::error::Error for FormdeskError {}

pub type Result<T> = std::result::Result<T, FormdeskError>;
