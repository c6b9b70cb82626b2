use crate::api::middleware::AppState;
use crate::config::Config;
use crate::database::Database;
use crate::services::{
    register_builtin, BrokerClient, JobDispatcher, JobRunner, ProcessorRegistry, SigningKeys,
    TriggerClient,
};
use std::sync::Arc;

pub fn build_app_state(
    db: Database,
    config: &Config,
) -> Result<AppState, Box<dyn std::error::Error>> {
    // Initialize broker client for immediate jobs
    let broker = BrokerClient::new(
        &config.broker_url,
        config.broker_token.clone(),
        config.callback_url(),
    );
    tracing::info!(
        "Broker client initialized, callback {}",
        config.callback_url()
    );

    // Initialize trigger client for the hosted batch functions
    let triggers = TriggerClient::new(&config.functions_url, config.functions_service_key.clone());
    tracing::info!("Trigger client initialized");

    // Initialize processor registry; every queue must be covered before the
    // server accepts traffic
    let mut registry = ProcessorRegistry::new();
    register_builtin(&mut registry);
    registry.assert_complete()?;
    let registry = Arc::new(registry);
    tracing::info!(
        "Processor registry initialized ({} queues)",
        crate::Queue::ALL.len()
    );

    // Initialize job dispatcher
    let dispatcher = JobDispatcher::new(broker, db.clone());
    tracing::info!("Job dispatcher initialized");

    // Initialize batch runner
    let runner = JobRunner::new(db.clone(), registry.clone(), config.job_retention_days);
    tracing::info!(
        "Job runner initialized ({}-day retention)",
        config.job_retention_days
    );

    // Initialize webhook signing keys
    let signing_keys = SigningKeys::new(
        config.broker_current_signing_key.clone(),
        config.broker_next_signing_key.clone(),
    );
    tracing::info!("Webhook signing keys initialized");

    // Create application state
    Ok(AppState {
        db,
        dispatcher,
        registry,
        runner,
        triggers,
        signing_keys,
        cron_secret: config.cron_secret.clone(),
        functions_service_key: config.functions_service_key.clone(),
    })
}
