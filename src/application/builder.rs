use std::sync::Arc;
use std::time::Duration;

use deadpool_redis::Runtime;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use tracing::info;

use crate::api::handlers::HealthState;
use crate::api::router::AppState;
use crate::application::{
    cache::{LazyRefreshCacheFactory, RefreshPool},
    ports::{
        AssessmentRepository, CacheStore, DistributedLocker, OutcomeRepository, ReportRepository,
    },
    use_cases::{
        AttachOutcomesUseCase, GetAssessmentUseCase, SearchOutcomesUseCase,
        TeacherUsageReportUseCase,
    },
};
use crate::config::{CacheBackend, Config};
use crate::infrastructure::{
    cache::{MemoryCacheStore, MemoryLocker, RedisCacheStore, RedisLocker},
    persistence::{MySqlAssessmentRepository, MySqlOutcomeRepository, MySqlReportRepository},
};

/// Router state plus the refresh pool `main` drains on shutdown
type BuildResult = Result<(AppState, RefreshPool), Box<dyn std::error::Error>>;

/// Application builder for clean dependency injection and setup
pub struct ApplicationBuilder {
    config: Config,
    pool: Option<MySqlPool>,
    cache_store: Option<Arc<dyn CacheStore>>,
    locker: Option<Arc<dyn DistributedLocker>>,
    assessment_repo: Option<Arc<dyn AssessmentRepository>>,
    outcome_repo: Option<Arc<dyn OutcomeRepository>>,
    report_repo: Option<Arc<dyn ReportRepository>>,
}

impl ApplicationBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pool: None,
            cache_store: None,
            locker: None,
            assessment_repo: None,
            outcome_repo: None,
            report_repo: None,
        }
    }

    /// Initialize database connection pool with retry logic
    pub async fn with_database(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Connecting to database");

        // Retry connection with exponential backoff
        let mut retries = 3;
        let mut delay = Duration::from_secs(1);
        let pool = loop {
            match MySqlPoolOptions::new()
                .max_connections(self.config.db_max_connections)
                .min_connections(self.config.db_min_connections)
                .acquire_timeout(Duration::from_secs(self.config.db_acquire_timeout_secs))
                .idle_timeout(Some(Duration::from_secs(self.config.db_idle_timeout_secs)))
                .max_lifetime(Some(Duration::from_secs(self.config.db_max_lifetime_secs)))
                .connect(&self.config.database_url)
                .await
            {
                Ok(pool) => break pool,
                Err(e) if retries > 0 => {
                    retries -= 1;
                    tracing::warn!(
                        "Database connection failed, retrying in {:?} ({} retries left): {}",
                        delay,
                        retries,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    tracing::error!("Failed to connect to database after retries: {}", e);
                    return Err(Box::new(e));
                }
            }
        };

        info!(
            "Database pool configured: max={}, min={}, acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s",
            self.config.db_max_connections,
            self.config.db_min_connections,
            self.config.db_acquire_timeout_secs,
            self.config.db_idle_timeout_secs,
            self.config.db_max_lifetime_secs
        );

        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;

        self.pool = Some(pool);
        Ok(self)
    }

    /// Initialize the cache store and distributed locker for the configured backend
    pub fn with_cache(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        let poll_interval = Duration::from_millis(self.config.lock_poll_interval_ms);
        let max_wait = Duration::from_millis(self.config.lock_max_wait_ms);

        let (store, locker): (Arc<dyn CacheStore>, Arc<dyn DistributedLocker>) =
            match self.config.cache_backend {
                CacheBackend::Redis => {
                    let pool = deadpool_redis::Config::from_url(&self.config.redis_url)
                        .create_pool(Some(Runtime::Tokio1))
                        .map_err(|e| {
                            tracing::error!("Failed to create Redis pool: {}", e);
                            e
                        })?;
                    (
                        Arc::new(RedisCacheStore::new(pool.clone())),
                        Arc::new(RedisLocker::new(pool, poll_interval, max_wait)),
                    )
                }
                CacheBackend::Memory => {
                    tracing::warn!("Using in-process cache; locks do not span instances");
                    let store = Arc::new(MemoryCacheStore::new());
                    MemoryCacheStore::spawn_sweeper(
                        &store,
                        Duration::from_secs(self.config.memory_sweep_interval_secs),
                    );
                    (store, Arc::new(MemoryLocker::new(poll_interval, max_wait)))
                }
            };

        info!(backend = ?self.config.cache_backend, "Cache backend initialized");
        self.cache_store = Some(store);
        self.locker = Some(locker);
        Ok(self)
    }

    /// Initialize infrastructure layer (repositories)
    pub fn with_infrastructure(mut self) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = self.pool.as_ref().ok_or("Database pool not initialized")?;

        self.assessment_repo = Some(Arc::new(MySqlAssessmentRepository::new(pool.clone())));
        self.outcome_repo = Some(Arc::new(MySqlOutcomeRepository::new(pool.clone())));
        self.report_repo = Some(Arc::new(MySqlReportRepository::new(pool.clone())));

        info!("Infrastructure layer initialized");
        Ok(self)
    }

    /// Build application state with all use cases
    pub fn build(self) -> BuildResult {
        let pool = self.pool.ok_or("Database pool not initialized")?;
        let cache_store = self.cache_store.ok_or("Cache store not initialized")?;
        let locker = self.locker.ok_or("Distributed locker not initialized")?;
        let assessment_repo = self
            .assessment_repo
            .ok_or("Assessment repository not initialized")?;
        let outcome_repo = self
            .outcome_repo
            .ok_or("Outcome repository not initialized")?;
        let report_repo = self.report_repo.ok_or("Report repository not initialized")?;

        let refresh_pool = RefreshPool::new(self.config.refresh_pool());
        let caches = LazyRefreshCacheFactory::new(
            Arc::clone(&cache_store),
            locker,
            refresh_pool.clone(),
            self.config.cache_namespace.clone(),
        );

        let get_assessment_use_case = Arc::new(GetAssessmentUseCase::new(
            Arc::clone(&assessment_repo),
            &caches,
            self.config.assessment_cache.options("assessment"),
        )?);
        let attach_outcomes_use_case = Arc::new(AttachOutcomesUseCase::new(assessment_repo));
        let search_outcomes_use_case = Arc::new(SearchOutcomesUseCase::new(
            outcome_repo,
            &caches,
            self.config.outcome_cache.options("outcome_search"),
        )?);
        let teacher_usage_use_case = Arc::new(TeacherUsageReportUseCase::new(
            report_repo,
            &caches,
            self.config.teacher_usage_cache.options("teacher_usage"),
        )?);

        info!("Application layer initialized");

        let app_state = AppState {
            health: Arc::new(HealthState {
                pool,
                cache_store,
                refresh_pool: refresh_pool.clone(),
            }),
            get_assessment_use_case,
            attach_outcomes_use_case,
            search_outcomes_use_case,
            teacher_usage_use_case,
        };

        Ok((app_state, refresh_pool))
    }

    /// Get configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
