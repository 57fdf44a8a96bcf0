use anyhow::Result;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub availability: AvailabilityConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST")?,
            port: std::env::var("DATABASE_PORT")?.parse()?,
            username: std::env::var("DATABASE_USERNAME")?,
            password: std::env::var("DATABASE_PASSWORD")?,
            database: std::env::var("DATABASE_NAME")?,
        };
        let availability = AvailabilityConfig {
            // ストア問い合わせの上限時間。超えた層は失敗扱いとして
            // フォールバックに進む（無期限に待たない）
            store_timeout_ms: std::env::var("AVAILABILITY_STORE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        };
        Ok(Self {
            database,
            availability,
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct AvailabilityConfig {
    pub store_timeout_ms: u64,
}
