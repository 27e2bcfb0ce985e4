use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `post-client`.
pub enum PostClientError {
    /// Локальная ошибка валидации формы. Запрос на сервер не отправлялся.
    #[error("validation error: {0}")]
    Validation(String),

    /// Ошибка HTTP-транспорта (`reqwest`): сервер недоступен, таймаут и т.п.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Сервер ответил не-2xx статусом. `message` содержит тело ответа как есть.
    #[error("server error {status}: {message}")]
    Server {
        /// HTTP-статус ответа.
        status: u16,
        /// Текст ответа сервера.
        message: String,
    },

    /// Тело ответа не удалось разобрать.
    #[error("decode error: {0}")]
    Decode(String),

    /// Значение времени не удалось привести к моменту времени.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Результат операций `post-client`.
pub type PostClientResult<T> = Result<T, PostClientError>;

impl PostClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        let message = message
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| format!("http status {status}"));
        Self::Server {
            status: status.as_u16(),
            message,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        Self::Http(err)
    }

    /// `true`, если запрос не дошёл до сервера из-за локальной валидации.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// HTTP-статус ответа сервера, если ошибка пришла от сервера.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for PostClientError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|key| key.to_string())
            .collect();
        fields.sort_unstable();
        Self::Validation(format!("required fields are empty: {}", fields.join(", ")))
    }
}
