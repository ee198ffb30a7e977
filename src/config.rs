use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub cors_allowed_origin: Option<String>,
    pub push_notification_url: Option<String>,
    pub revalidate_url: Option<String>,
    pub revalidate_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(10);
        Ok(Self {
            port,
            database_url,
            database_max_connections,
            host,
            jwt_secret,
            cors_allowed_origin: optional_var("CORS_ALLOWED_ORIGIN"),
            push_notification_url: optional_var("PUSH_NOTIFICATION_URL"),
            revalidate_url: optional_var("REVALIDATE_URL"),
            revalidate_token: optional_var("REVALIDATE_TOKEN"),
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
