use anyhow::Context;
use axum::async_trait;
use serde_json::json;
use tracing::debug;

use crate::config::MailConfig;

/// Outbound mail transport. Production posts to an HTTP relay; tests swap in
/// a recording fake.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_confirmation(&self, name: &str, email: &str, token: &str)
        -> anyhow::Result<()>;
    async fn send_password_reset(
        &self,
        name: &str,
        email: &str,
        token: &str,
    ) -> anyhow::Result<()>;
}

pub struct HttpMailer {
    client: reqwest::Client,
    config: MailConfig,
    base_url: String,
}

impl HttpMailer {
    pub fn new(config: MailConfig, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            base_url,
        }
    }

    async fn send(&self, to: &str, subject: &str, html: String) -> anyhow::Result<()> {
        let res = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_token)
            .json(&json!({
                "from": self.config.from,
                "to": to,
                "subject": subject,
                "html": html,
            }))
            .send()
            .await
            .context("mail relay request")?;

        if !res.status().is_success() {
            anyhow::bail!("mail relay responded {}", res.status());
        }
        debug!(%to, %subject, "mail dispatched");
        Ok(())
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_confirmation(
        &self,
        name: &str,
        email: &str,
        token: &str,
    ) -> anyhow::Result<()> {
        let link = format!("{}/auth/confirmar/{}", self.base_url, token);
        let html = format!(
            "<p>Hola {name}, comprueba tu cuenta en BienesRaices.com</p>\
             <p>Tu cuenta ya esta lista, solo debes confirmarla en el siguiente enlace: \
             <a href=\"{link}\">Confirmar Cuenta</a></p>\
             <p>Si tu no creaste esta cuenta, puedes ignorar el mensaje</p>"
        );
        self.send(email, "Confirma tu cuenta en BienesRaices.com", html)
            .await
    }

    async fn send_password_reset(
        &self,
        name: &str,
        email: &str,
        token: &str,
    ) -> anyhow::Result<()> {
        let link = format!("{}/auth/olvide-password/{}", self.base_url, token);
        let html = format!(
            "<p>Hola {name}, has solicitado reestablecer tu password en BienesRaices.com</p>\
             <p>Sigue el siguiente enlace para generar un password nuevo: \
             <a href=\"{link}\">Reestablecer Password</a></p>\
             <p>Si tu no solicitaste el cambio, puedes ignorar el mensaje</p>"
        );
        self.send(email, "Reestablece tu password en BienesRaices.com", html)
            .await
    }
}
