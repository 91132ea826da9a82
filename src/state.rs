use sqlx::SqlitePool;

use crate::notify::MailConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub mail: MailConfig,
}
