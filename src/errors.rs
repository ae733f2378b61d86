use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArmoryError>;

#[derive(Error, Debug)]
pub enum ArmoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Invalid selector: {0}")]
    Selector(String),
    #[error("Missing field: {field}")]
    FieldMissing { field: String },
    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: String, value: String },
    #[error("Storage error: {0} {1}")]
    Storage(String, String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ArmoryError {
    pub fn missing<S: Into<String>>(field: S) -> Self {
        Self::FieldMissing {
            field: field.into(),
        }
    }

    pub fn invalid<F: Into<String>, V: Into<String>>(
        field: F,
        value: V,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }
}
