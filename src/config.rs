#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// SQLite URL for saved routes; routes live in memory when unset.
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Self { port, database_url }
    }
}
