use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use tracing::warn;
use uuid::Uuid;

use crate::cookies::{self, SESSION_COOKIE};

use super::tokens::SessionKeys;

/// Authenticated requester, recovered from the `_token` session cookie
/// without any server-side lookup.
#[derive(Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = cookies::extract_cookie(&parts.headers, SESSION_COOKIE)
            .ok_or((StatusCode::UNAUTHORIZED, "No autenticado".to_string()))?;

        let claims = SessionKeys::from_ref(state).verify(&token).map_err(|_| {
            warn!("session cookie failed verification");
            (
                StatusCode::UNAUTHORIZED,
                "Sesion invalida o expirada".to_string(),
            )
        })?;

        Ok(AuthUser {
            id: claims.sub,
            name: claims.nombre,
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderValue, Request};

    use super::*;
    use crate::config::JwtConfig;

    #[derive(Clone)]
    struct KeysState(SessionKeys);

    impl FromRef<KeysState> for SessionKeys {
        fn from_ref(state: &KeysState) -> Self {
            state.0.clone()
        }
    }

    fn keys() -> SessionKeys {
        SessionKeys::new(&JwtConfig {
            secret: "test-secret".into(),
            issuer: "bienesraices".into(),
            audience: "bienesraices-users".into(),
            ttl_minutes: 60,
        })
    }

    fn parts_with_cookie(cookie: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/mis-propiedades");
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, HeaderValue::from_str(&c).unwrap());
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn valid_cookie_yields_the_user() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "Ivor").expect("sign");
        let mut parts = parts_with_cookie(Some(format!("_token={token}")));

        let user = AuthUser::from_request_parts(&mut parts, &KeysState(keys))
            .await
            .expect("extraction");
        assert_eq!(user.id, user_id);
        assert_eq!(user.name, "Ivor");
    }

    #[tokio::test]
    async fn missing_cookie_is_unauthorized() {
        let mut parts = parts_with_cookie(None);
        let err = AuthUser::from_request_parts(&mut parts, &KeysState(keys()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn tampered_token_is_unauthorized() {
        let token = keys().sign(Uuid::new_v4(), "Ivor").expect("sign");
        let mut tampered = token;
        tampered.push('x');
        let mut parts = parts_with_cookie(Some(format!("_token={tampered}")));
        let err = AuthUser::from_request_parts(&mut parts, &KeysState(keys()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    }
}
