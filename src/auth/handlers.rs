use axum::{
    extract::{Path, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Form, Json, Router,
};
use tracing::{error, instrument, warn};

use crate::{
    cookies,
    csrf::CsrfToken,
    error::AuthError,
    state::AppState,
    view::{EchoedUser, PageView},
};

use super::dto::{ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm};
use super::service::RegisterInput;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_form).post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/registro", get(register_form).post(register))
        .route("/auth/confirmar/:token", get(confirm))
        .route("/auth/olvide-password", get(forgot_form).post(forgot))
        .route(
            "/auth/olvide-password/:token",
            get(reset_form).post(reset),
        )
}

/// Renders an error outcome for the page the request came from. Fatal errors
/// keep their detail in the logs only.
fn error_page(err: AuthError, pagina: &str, usuario: Option<EchoedUser>) -> Response {
    if err.is_fatal() {
        error!(error = %err, %pagina, "request failed");
    } else {
        warn!(error = %err, %pagina, "request rejected");
    }
    let mut view = PageView::new(pagina).with_errors(err.messages());
    if let Some(usuario) = usuario {
        view = view.with_user(usuario.nombre, usuario.email);
    }
    (err.status(), Json(view)).into_response()
}

#[instrument(skip(csrf))]
async fn login_form(Extension(csrf): Extension<CsrfToken>) -> Json<PageView> {
    Json(PageView::new("Iniciar Sesión").with_csrf(csrf.0))
}

#[instrument(skip(state, form))]
async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let svc = state.auth_service();
    match svc.login(&form.email, &form.password).await {
        Ok((token, _user)) => {
            let mut res = Redirect::to("/mis-propiedades").into_response();
            res.headers_mut().append(
                SET_COOKIE,
                cookies::session_cookie(&token, svc.session_ttl_secs()),
            );
            res
        }
        Err(err) => error_page(err, "Iniciar Sesión", None),
    }
}

/// Clears the cookie; the token itself stays valid until expiry because
/// sessions are stateless and there is no revocation list.
#[instrument]
async fn logout() -> Response {
    let mut res = Redirect::to("/auth/login").into_response();
    res.headers_mut()
        .append(SET_COOKIE, cookies::clear_session_cookie());
    res
}

#[instrument(skip(csrf))]
async fn register_form(Extension(csrf): Extension<CsrfToken>) -> Json<PageView> {
    Json(PageView::new("Crear Cuenta").with_csrf(csrf.0))
}

#[instrument(skip(state, form))]
async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let echo = EchoedUser {
        nombre: form.nombre.clone(),
        email: form.email.clone(),
    };
    let input = RegisterInput {
        name: form.nombre,
        email: form.email,
        password: form.password,
        password_confirmation: form.repetir_password,
    };
    match state.auth_service().register(input).await {
        Ok(_) => Json(
            PageView::new("Cuenta Creada Correctamente")
                .with_message("Hemos enviado un email de confirmacion, presiona en el enlace"),
        )
        .into_response(),
        Err(err) => error_page(err, "Crear Cuenta", Some(echo)),
    }
}

#[instrument(skip(state))]
async fn confirm(State(state): State<AppState>, Path(token): Path<String>) -> Response {
    match state.auth_service().confirm(&token).await {
        Ok(_) => Json(
            PageView::new("Cuenta Confirmada")
                .with_message("La cuenta se confirmo correctamente"),
        )
        .into_response(),
        Err(err) => error_page(err, "Error al confirmar tu cuenta", None),
    }
}

#[instrument(skip(csrf))]
async fn forgot_form(Extension(csrf): Extension<CsrfToken>) -> Json<PageView> {
    Json(PageView::new("Recupera tu acceso a Bienes Raices").with_csrf(csrf.0))
}

#[instrument(skip(state, form))]
async fn forgot(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    match state.auth_service().request_password_reset(&form.email).await {
        Ok(_) => Json(
            PageView::new("Reestablece tu Password")
                .with_message("Hemos enviado un email con las instrucciones"),
        )
        .into_response(),
        Err(err) => error_page(err, "Recupera tu acceso a Bienes Raices", None),
    }
}

#[instrument(skip(state, csrf))]
async fn reset_form(
    State(state): State<AppState>,
    Extension(csrf): Extension<CsrfToken>,
    Path(token): Path<String>,
) -> Response {
    match state.auth_service().reset_token_exists(&token).await {
        Ok(()) => Json(PageView::new("Reestablece tu Password").with_csrf(csrf.0)).into_response(),
        Err(err) => error_page(err, "Reestablece tu Password", None),
    }
}

#[instrument(skip(state, form))]
async fn reset(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    match state
        .auth_service()
        .complete_password_reset(&token, &form.password)
        .await
    {
        Ok(_) => Json(
            PageView::new("Password Reestablecido")
                .with_message("El Password se guardo correctamente"),
        )
        .into_response(),
        Err(err) => error_page(err, "Reestablece tu Password", None),
    }
}
