use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub broker_url: String,
    pub broker_token: String,
    pub api_url: String,
    pub broker_current_signing_key: String,
    pub broker_next_signing_key: Option<String>,
    pub cron_secret: String,
    pub functions_url: String,
    pub functions_service_key: String,
    pub job_retention_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://waggle.db?mode=rwc".to_string());

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let broker_url = env::var("BROKER_URL").map_err(|_| ConfigError::MissingBrokerUrl)?;

        let broker_token = env::var("BROKER_TOKEN").map_err(|_| ConfigError::MissingBrokerToken)?;

        let api_url = env::var("API_URL").map_err(|_| ConfigError::MissingApiUrl)?;

        let broker_current_signing_key = env::var("BROKER_CURRENT_SIGNING_KEY")
            .map_err(|_| ConfigError::MissingSigningKey)?;

        let broker_next_signing_key = env::var("BROKER_NEXT_SIGNING_KEY").ok();

        let cron_secret = env::var("CRON_SECRET").map_err(|_| ConfigError::MissingCronSecret)?;

        let functions_url =
            env::var("FUNCTIONS_URL").map_err(|_| ConfigError::MissingFunctionsUrl)?;

        let functions_service_key =
            env::var("FUNCTIONS_SERVICE_KEY").map_err(|_| ConfigError::MissingServiceKey)?;

        let job_retention_days = env::var("JOB_RETENTION_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidRetentionDays)?;

        Ok(Config {
            database_url,
            server_host,
            server_port,
            broker_url,
            broker_token,
            api_url,
            broker_current_signing_key,
            broker_next_signing_key,
            cron_secret,
            functions_url,
            functions_service_key,
            job_retention_days,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// The URL the broker delivers real-time jobs back to.
    pub fn callback_url(&self) -> String {
        format!("{}/jobs/process-immediate", self.api_url.trim_end_matches('/'))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BROKER_URL environment variable not set")]
    MissingBrokerUrl,

    #[error("BROKER_TOKEN environment variable not set")]
    MissingBrokerToken,

    #[error("API_URL environment variable not set")]
    MissingApiUrl,

    #[error("BROKER_CURRENT_SIGNING_KEY environment variable not set")]
    MissingSigningKey,

    #[error("CRON_SECRET environment variable not set")]
    MissingCronSecret,

    #[error("FUNCTIONS_URL environment variable not set")]
    MissingFunctionsUrl,

    #[error("FUNCTIONS_SERVICE_KEY environment variable not set")]
    MissingServiceKey,

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid job retention days")]
    InvalidRetentionDays,
}
