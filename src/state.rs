use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn},
    notify::Notifier,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let orm = crate::db::orm_from_pool(&pool);
        let notifier = Notifier::from_config(&config);
        Self {
            pool,
            orm,
            config: Arc::new(config),
            notifier,
        }
    }
}
