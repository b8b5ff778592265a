use axum::http::StatusCode;
use thiserror::Error;

/// Expected, user-recoverable auth failures plus the fatal fallbacks.
///
/// Everything except `Database`/`Internal` is converted by the handlers into a
/// page descriptor with human-readable messages; the fatal variants become a
/// neutral 500 with the detail kept in the logs.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed")]
    Validation(Vec<String>),

    #[error("el usuario ya esta registrado")]
    EmailTaken,

    #[error("{0}")]
    NotFound(String),

    #[error("tu cuenta no esta confirmada")]
    Unconfirmed,

    #[error("el password es incorrecto")]
    InvalidCredentials,

    #[error("sesion invalida o expirada")]
    InvalidSession,

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::Unconfirmed => StatusCode::FORBIDDEN,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidSession => StatusCode::UNAUTHORIZED,
            AuthError::Database(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Messages shown to the user. Internal detail never leaks here.
    pub fn messages(&self) -> Vec<String> {
        match self {
            AuthError::Validation(msgs) => msgs.clone(),
            AuthError::Database(_) | AuthError::Internal(_) => {
                vec!["Hubo un error, intenta de nuevo mas tarde".into()]
            }
            other => vec![other.to_string()],
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, AuthError::Database(_) | AuthError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_keeps_every_message() {
        let err = AuthError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.messages(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn fatal_errors_stay_neutral() {
        let err = AuthError::Internal(anyhow::anyhow!("pool exhausted at 10.0.0.3"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let msgs = err.messages();
        assert_eq!(msgs.len(), 1);
        assert!(!msgs[0].contains("10.0.0.3"));
    }
}
