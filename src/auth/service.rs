use std::sync::Arc;

use tracing::{debug, error, info};

use crate::{error::AuthError, mailer::Mailer, validate};

use super::{
    password::{hash_password, verify_password},
    repo::{NewUser, User, UserStore},
    tokens::{one_shot_token, SessionKeys},
};

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Orchestrates the credential lifecycle: registration, confirmation, login
/// and the password-reset cycle. Store and mailer are injected; the service
/// owns no connection state of its own.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    keys: SessionKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, mailer: Arc<dyn Mailer>, keys: SessionKeys) -> Self {
        Self {
            users,
            mailer,
            keys,
        }
    }

    pub fn session_ttl_secs(&self) -> i64 {
        self.keys.ttl_secs()
    }

    /// Creates an unconfirmed user with a fresh one-shot token and dispatches
    /// the confirmation mail. Duplicate emails surface as `EmailTaken` from
    /// the store's uniqueness constraint.
    pub async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        let errors = validate::validate_registration(
            &input.name,
            &input.email,
            &input.password,
            &input.password_confirmation,
        );
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let password_hash = hash_blocking(input.password).await?;
        let user = self
            .users
            .create(NewUser {
                name: input.name.trim().to_string(),
                email: input.email.trim().to_lowercase(),
                password_hash,
                token: one_shot_token(),
            })
            .await?;

        self.dispatch_mail(&user, MailKind::Confirmation);
        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    /// Consumes a confirmation token. A second call with the same token finds
    /// nothing and reports `NotFound`, which doubles as the
    /// "already confirmed or invalid" signal.
    pub async fn confirm(&self, token: &str) -> Result<User, AuthError> {
        let mut user = self.users.find_by_token(token).await?.ok_or_else(|| {
            AuthError::NotFound("Hubo un error al confirmar tu cuenta, intenta de nuevo".into())
        })?;

        user.confirmed = true;
        user.token = None;
        self.users.save(&user).await?;
        info!(user_id = %user.id, "account confirmed");
        Ok(user)
    }

    /// Checks credentials and mints a signed session token. The stored state
    /// is untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), AuthError> {
        let errors = validate::validate_login(email, password);
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AuthError::NotFound("El Usuario no existe".into()))?;

        if !user.confirmed {
            return Err(AuthError::Unconfirmed);
        }

        if !verify_blocking(password.to_string(), user.password_hash.clone()).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.keys.sign(user.id, &user.name)?;
        // The original logs every issued token; kept at debug for audit.
        debug!(user_id = %user.id, %token, "session token issued");
        Ok((token, user))
    }

    /// Assigns a fresh one-shot token and mails the reset link.
    pub async fn request_password_reset(&self, email: &str) -> Result<User, AuthError> {
        let errors = validate::validate_email(email);
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let email = email.trim().to_lowercase();
        let mut user = self.users.find_by_email(&email).await?.ok_or_else(|| {
            AuthError::NotFound("El email no pertenece a ningun usuario registrado".into())
        })?;

        user.token = Some(one_shot_token());
        self.users.save(&user).await?;
        self.dispatch_mail(&user, MailKind::PasswordReset);
        info!(user_id = %user.id, "password reset requested");
        Ok(user)
    }

    /// Lookup backing the GET reset-form route.
    pub async fn reset_token_exists(&self, token: &str) -> Result<(), AuthError> {
        self.users
            .find_by_token(token)
            .await?
            .map(|_| ())
            .ok_or_else(|| {
                AuthError::NotFound(
                    "Hubo un error al validar tu informacion, intenta de nuevo".into(),
                )
            })
    }

    /// Replaces the password hash and consumes the reset token.
    pub async fn complete_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<User, AuthError> {
        let errors = validate::validate_new_password(new_password);
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let mut user = self.users.find_by_token(token).await?.ok_or_else(|| {
            AuthError::NotFound("Hubo un error al validar tu informacion, intenta de nuevo".into())
        })?;

        user.password_hash = hash_blocking(new_password.to_string()).await?;
        user.token = None;
        self.users.save(&user).await?;
        info!(user_id = %user.id, "password reset completed");
        Ok(user)
    }

    /// Mail goes out on its own task so the response never waits on the
    /// relay. Failures are logged, not surfaced to the user.
    fn dispatch_mail(&self, user: &User, kind: MailKind) {
        let Some(token) = user.token.clone() else {
            return;
        };
        let mailer = self.mailer.clone();
        let name = user.name.clone();
        let email = user.email.clone();
        tokio::spawn(async move {
            let result = match kind {
                MailKind::Confirmation => mailer.send_confirmation(&name, &email, &token).await,
                MailKind::PasswordReset => {
                    mailer.send_password_reset(&name, &email, &token).await
                }
            };
            if let Err(e) = result {
                error!(error = %e, %email, ?kind, "outbound mail failed");
            }
        });
    }
}

#[derive(Debug, Clone, Copy)]
enum MailKind {
    Confirmation,
    PasswordReset,
}

/// Argon2 is CPU-bound; keep it off the async dispatch path.
async fn hash_blocking(plain: String) -> Result<String, AuthError> {
    let joined = tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| AuthError::Internal(e.into()))?;
    Ok(joined?)
}

async fn verify_blocking(candidate: String, hash: String) -> Result<bool, AuthError> {
    let joined = tokio::task::spawn_blocking(move || verify_password(&candidate, &hash))
        .await
        .map_err(|e| AuthError::Internal(e.into()))?;
    Ok(joined?)
}
