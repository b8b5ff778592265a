use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    auth::{
        repo::{PgUserStore, UserStore},
        service::AuthService,
        tokens::SessionKeys,
    },
    config::AppConfig,
    mailer::{HttpMailer, Mailer},
};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let users = Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>;
        let mailer = Arc::new(HttpMailer::new(
            config.mail.clone(),
            config.base_url.clone(),
        )) as Arc<dyn Mailer>;

        Ok(Self {
            db,
            config,
            users,
            mailer,
        })
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(
            self.users.clone(),
            self.mailer.clone(),
            SessionKeys::new(&self.config.jwt),
        )
    }
}
