pub mod middleware;

use crate::{
    config::Config,
    database::{DatabaseManager, DatabaseManagerImpl},
    error::AppError,
    health::HealthService,
    jobs::{Job, JobScheduler, StatisticsRecomputeJob},
    metrics,
    routes::{create_docs_routes, create_health_routes, create_statistics_routes},
    server::middleware::request_response_logger,
    shutdown::{DatabaseShutdown, JobSchedulerShutdown, ShutdownCoordinator, ShutdownManager},
    statistics::{StatisticsAggregator, StatisticsService},
    utils::request_id_middleware,
};
use axum::{Router, middleware as axum_middleware, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{error, info};

#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub database: Arc<dyn DatabaseManager>,
    pub statistics_service: Arc<StatisticsService>,
    pub aggregator: Arc<StatisticsAggregator>,
    pub health_service: Arc<HealthService>,
    pub job_scheduler: Arc<RwLock<JobScheduler>>,
    pub shutdown_coordinator: Arc<ShutdownCoordinator>,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let metrics_handle = if config.metrics.enabled {
            let handle = metrics::init_metrics().map_err(|e| {
                AppError::Internal(format!("Failed to initialize metrics: {}", e))
            })?;
            Some(handle)
        } else {
            None
        };

        let database_impl = Arc::new(DatabaseManagerImpl::new_from_config(&config).await?);
        let database: Arc<dyn DatabaseManager> = database_impl.clone();

        let statistics_service = Arc::new(StatisticsService::new(database.clone()));

        let health_service = Arc::new(HealthService::new());
        health_service.register(database_impl).await;
        health_service.register(statistics_service.clone()).await;
        let aggregator = Arc::new(StatisticsAggregator::new(database.clone()));

        let shutdown_coordinator = Arc::new(ShutdownCoordinator::new());
        let job_scheduler = Arc::new(RwLock::new(JobScheduler::with_shutdown_coordinator(
            config.jobs.clone(),
            shutdown_coordinator.subscribe(),
        )));

        Ok(Self {
            config: Arc::new(config),
            database,
            statistics_service,
            aggregator,
            health_service,
            job_scheduler,
            shutdown_coordinator,
            metrics_handle,
        })
    }

    pub async fn run(&self) -> Result<(), AppError> {
        if self.config.database.migration_on_startup {
            self.database.migrate().await?;
        }

        let mut shutdown_manager = ShutdownManager::new(Duration::from_secs(30));

        let jobs: Vec<Arc<dyn Job>> = vec![Arc::new(StatisticsRecomputeJob::new(
            self.aggregator.clone(),
            self.config.aggregation.min_postings,
        ))];
        self.job_scheduler.write().await.start(jobs).await?;

        // Jobs stop before the pool closes
        shutdown_manager.register(JobSchedulerShutdown::new(self.job_scheduler.clone()));
        shutdown_manager.register(DatabaseShutdown::new(self.database.clone()));

        let app = self.create_app();

        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

        info!("Server listening on http://{}", addr);

        let shutdown_coordinator = self.shutdown_coordinator.clone();
        tokio::spawn(async move {
            shutdown_coordinator.wait_for_shutdown_signal().await;
        });

        let mut shutdown_rx = self.shutdown_coordinator.subscribe();
        let result = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
            info!("Graceful shutdown initiated");
        })
        .await;

        if let Err(e) = result {
            error!("Server error: {}", e);
        }

        shutdown_manager.shutdown_all().await;
        info!("Server shutdown complete");

        Ok(())
    }

    /// Creates an application router
    pub fn create_app(&self) -> Router {
        let mut app = Router::new()
            .merge(create_statistics_routes())
            .merge(create_health_routes())
            .merge(create_docs_routes())
            .with_state(self.clone());

        if let Some(handle) = &self.metrics_handle {
            app = app.merge(
                Router::new()
                    .route("/metrics", get(metrics::metrics_handler))
                    .with_state(handle.clone()),
            );
        }

        self.add_conditional_middleware(app)
    }

    /// Layers run outermost-last: request ids are assigned before logging sees the request
    fn add_conditional_middleware(&self, mut app: Router) -> Router {
        if self.config.metrics.enabled {
            app = app.layer(axum_middleware::from_fn(metrics::metrics_middleware));
        }
        if self.config.logging.log_request {
            app = app.layer(axum_middleware::from_fn(request_response_logger));
        }
        app.layer(axum_middleware::from_fn(request_id_middleware))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::TestServerBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check_through_app() {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();

        let request = Request::builder()
            .uri("/statistics/unknown")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_metrics_route_absent_when_disabled() {
        let server = TestServerBuilder::new().build().await;
        assert!(server.metrics_handle.is_none());

        let request = Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .unwrap();
        let response = server.create_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_server_creation() {
        let server = TestServerBuilder::new().build().await;
        assert_eq!(server.config.server.port, 8000);
        assert!(!server.shutdown_coordinator.is_shutdown_requested());
    }
}
