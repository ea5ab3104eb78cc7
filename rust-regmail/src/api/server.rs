//! API server setup and configuration.

use axum::Router;
use axum::extract::{DefaultBodyLimit, Request};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::api::routes;
use crate::database::DbPool;
use crate::error::Result;
use crate::registration::RegistrationService;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Server bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Request body size limit in bytes
    pub body_limit: usize,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 12555,
            enable_cors: true,
            body_limit: 64 * 1024, // 64KB
        }
    }
}

impl ApiServerConfig {
    /// Load API server config from environment variables, falling back to defaults.
    ///
    /// Supported env vars:
    /// - `API_BIND_ADDRESS` (e.g. "0.0.0.0")
    /// - `API_PORT` (e.g. "8080")
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Socket address to bind; accepts IPv4 and IPv6 literals.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.bind_address.parse().map_err(|e| {
            crate::error::Error::ApiError(format!(
                "Invalid bind address '{}': {}",
                self.bind_address, e
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(bind_address) = lookup("API_BIND_ADDRESS")
            && !bind_address.trim().is_empty()
        {
            config.bind_address = bind_address.trim().to_string();
        }

        if let Some(port) = lookup("API_PORT")
            && let Ok(parsed) = port.trim().parse::<u16>()
        {
            config.port = parsed;
        }

        config
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server start time for uptime calculation
    pub start_time: Instant,
    /// Registration pipeline
    pub registration_service: Option<Arc<RegistrationService>>,
    /// Database pool, used by the readiness probe
    pub pool: Option<DbPool>,
}

impl AppState {
    /// Create a new application state without services (for testing).
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            registration_service: None,
            pool: None,
        }
    }

    pub fn with_registration_service(mut self, service: Arc<RegistrationService>) -> Self {
        self.registration_service = Some(service);
        self
    }

    pub fn with_pool(mut self, pool: DbPool) -> Self {
        self.pool = Some(pool);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP front end for the registration pipeline.
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
    cancel_token: CancellationToken,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig) -> Self {
        Self::with_state(config, AppState::new())
    }

    pub fn with_state(config: ApiServerConfig, state: AppState) -> Self {
        Self {
            config,
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn build_router(&self) -> Router {
        let mut router = routes::create_router(self.state.clone())
            .layer(DefaultBodyLimit::max(self.config.body_limit));

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router.layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request| {
                    // Probes are polled constantly; keep them out of the logs.
                    if req.uri().path().starts_with("/health") {
                        Span::none()
                    } else {
                        let mut make_span =
                            tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO);
                        use tower_http::trace::MakeSpan;
                        make_span.make_span(req)
                    }
                })
                .on_request(|req: &Request, span: &Span| {
                    if span.is_disabled() {
                        return;
                    }
                    let mut on_request =
                        tower_http::trace::DefaultOnRequest::new().level(tracing::Level::INFO);
                    use tower_http::trace::OnRequest;
                    on_request.on_request(req, span);
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        if span.is_disabled() {
                            return;
                        }
                        let on_response =
                            tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO);
                        use tower_http::trace::OnResponse;
                        on_response.on_response(res, latency, span);
                    },
                ),
        )
    }

    pub async fn run(&self) -> Result<()> {
        let addr = self.config.socket_addr()?;

        let router = self.build_router();
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("API server listening on http://{}", addr);

        let cancel_token = self.cancel_token.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                tracing::info!("API server shutting down...");
            })
            .await
            .map_err(|e| crate::error::Error::ApiError(format!("Server error: {}", e)))?;

        Ok(())
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_defaults() {
        let config = ApiServerConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 12555);
        assert!(config.enable_cors);
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> =
            HashMap::from([("API_BIND_ADDRESS", "127.0.0.1"), ("API_PORT", "8080")]);
        let config = ApiServerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_config_ignores_invalid_port() {
        let config = ApiServerConfig::from_lookup(|k| match k {
            "API_PORT" => Some("not-a-port".to_string()),
            "API_BIND_ADDRESS" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.port, 12555);
        assert_eq!(config.bind_address, "0.0.0.0");
    }

    #[test]
    fn test_socket_addr_accepts_ipv4_and_ipv6() {
        let mut config = ApiServerConfig::default();
        assert_eq!(
            config.socket_addr().unwrap(),
            "0.0.0.0:12555".parse::<SocketAddr>().unwrap()
        );

        config.bind_address = "::".to_string();
        let addr = config.socket_addr().unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.port(), 12555);
        assert_eq!(addr.to_string(), "[::]:12555");
    }

    #[test]
    fn test_socket_addr_rejects_invalid_address() {
        let config = ApiServerConfig {
            bind_address: "not an address".to_string(),
            ..Default::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.start_time.elapsed().as_secs() < 1);
        assert!(state.registration_service.is_none());
        assert!(state.pool.is_none());
    }

    #[tokio::test]
    async fn test_shutdown_cancels_token() {
        let server = ApiServer::new(ApiServerConfig::default());
        let token = server.cancel_token();
        assert!(!token.is_cancelled());
        server.shutdown();
        assert!(token.is_cancelled());
    }
}
