//! Service container for dependency injection.
//!
//! The ServiceContainer builds the database pool, the repository, the
//! notification dispatcher and the registration service from an
//! [`AppConfig`], and hands them to the API layer.

use std::sync::Arc;

use tracing::{info, warn};

use crate::Result;
use crate::api::AppState;
use crate::config::AppConfig;
use crate::database::{self, DbPool, repositories::SqlxRegistrationRepository};
use crate::notification::NotificationDispatcher;
use crate::registration::RegistrationService;

/// Service container holding all application services.
pub struct ServiceContainer {
    /// Database connection pool.
    pub pool: DbPool,
    /// Registration pipeline.
    pub registration_service: Arc<RegistrationService>,
    /// Notification dispatcher shared with the registration service.
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl ServiceContainer {
    /// Open the database, apply migrations and wire every service.
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let pool = database::init_pool(&config.database_url).await?;
        Self::with_pool(pool, config).await
    }

    /// Wire every service on top of an existing pool.
    pub async fn with_pool(pool: DbPool, config: &AppConfig) -> Result<Self> {
        info!("Initializing service container");

        database::run_migrations(&pool).await?;

        let repository = Arc::new(SqlxRegistrationRepository::new(pool.clone()));
        let dispatcher = Arc::new(NotificationDispatcher::from_config(
            config.mailgun.clone(),
            config.sendgrid.clone(),
            &config.recipients,
        ));
        let registration_service = Arc::new(RegistrationService::new(
            repository,
            Arc::clone(&dispatcher),
        ));

        for name in dispatcher.unconfigured_providers() {
            warn!(provider = name, "Email provider is not configured and will be skipped");
        }
        info!(
            providers = ?dispatcher.provider_names(),
            configured = ?dispatcher.configured_providers(),
            "Service container initialized"
        );

        Ok(Self {
            pool,
            registration_service,
            dispatcher,
        })
    }

    /// Application state for the API server.
    pub fn app_state(&self) -> AppState {
        AppState::new()
            .with_registration_service(Arc::clone(&self.registration_service))
            .with_pool(self.pool.clone())
    }

    /// Close the database pool.
    pub async fn shutdown(&self) {
        info!("Closing database pool...");
        self.pool.close().await;

        info!("Services shut down");
    }
}
