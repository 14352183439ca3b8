use once_cell::sync::Lazy;
use serde::Deserialize;

pub static ENV_CONFIG: Lazy<EnvironmentStruct> = Lazy::new(|| {
    EnvironmentStruct::load_from_env().expect("Failed to load environment configuration")
});

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentStruct {
    pub database_url: String,
    pub port: u16,
    pub region_name: String,
    pub provider_label: String,
}

impl EnvironmentStruct {
    fn load_from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")?,
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            region_name: std::env::var("REGION_NAME").unwrap_or_else(|_| "default".to_string()),
            provider_label: std::env::var("PROVIDER_LABEL")
                .unwrap_or_else(|_| "Distributed SQL".to_string()),
        })
    }
}
