use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use travel_reco::config::{Settings, SupplierMode};
use travel_reco::core::Ranker;
use travel_reco::routes::{
    self, handle_json_payload_error, handle_query_payload_error, AppState, RecommendationLimits,
};
use travel_reco::services::{
    CacheManager, CacheStore, CandidateStore, HttpSupplier, InMemoryCatalog, JwtValidator,
    MemoryStore, MockSupplier, PostgresClient, RecommendationOptions, RecommendationService,
    RedisStore, SupplierClient, SupplierService, UserStore,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    init_tracing(&settings.logging.level, &settings.logging.format);

    info!("Starting travel recommendation service...");

    let store = connect_cache_store(&settings).await;
    let cache = Arc::new(CacheManager::new(store));
    info!("Cache manager initialized (backend: {})", cache.backend());

    let (users, candidates) = connect_catalog(&settings).await?;
    info!("Catalog initialized (backend: {})", candidates.backend());

    let supplier_client = build_supplier(&settings)?;
    info!("Supplier client initialized (backend: {})", supplier_client.backend());

    let ranker = Ranker::with_seed(settings.recommendations.diversity_seed);
    if let Some(seed) = settings.recommendations.diversity_seed {
        info!("Diversity jitter seeded with {}", seed);
    }

    let options = RecommendationOptions {
        cache_ttl: Duration::from_secs(settings.cache.recommendation_ttl_secs),
        envelope_ttl: chrono::Duration::hours(settings.recommendations.envelope_ttl_hours),
    };

    let recommendations = Arc::new(RecommendationService::new(
        users,
        candidates,
        cache.clone(),
        ranker,
        options,
    ));

    let supplier = Arc::new(SupplierService::new(
        supplier_client,
        cache.clone(),
        Duration::from_secs(settings.cache.supplier_ttl_secs),
    ));

    // Build application state
    let app_state = AppState {
        recommendations,
        supplier,
        cache,
        auth: Arc::new(JwtValidator::new(&settings.auth.jwt_secret)),
        limits: RecommendationLimits {
            default_count: settings.recommendations.default_count,
            max_count: settings.recommendations.max_count,
        },
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.compact().init(),
    }
}

/// Redis when configured and reachable, otherwise the in-process store
async fn connect_cache_store(settings: &Settings) -> Arc<dyn CacheStore> {
    let memory = || Arc::new(MemoryStore::new(settings.cache.memory_capacity)) as Arc<dyn CacheStore>;

    let Some(redis_url) = settings.cache.redis_url.as_deref() else {
        info!("No Redis URL configured, using in-process cache");
        return memory();
    };

    let timeout = Duration::from_secs(settings.cache.connection_timeout_secs.unwrap_or(5));

    match tokio::time::timeout(timeout, RedisStore::connect(redis_url)).await {
        Ok(Ok(store)) => {
            info!("Connected to Redis");
            Arc::new(store) as Arc<dyn CacheStore>
        }
        Ok(Err(e)) => {
            warn!("Failed to connect to Redis ({}), using in-process cache", e);
            memory()
        }
        Err(_) => {
            warn!("Timed out connecting to Redis after {:?}, using in-process cache", timeout);
            memory()
        }
    }
}

/// PostgreSQL when a database URL is set, otherwise the seeded in-memory catalog
async fn connect_catalog(
    settings: &Settings,
) -> io::Result<(Arc<dyn UserStore>, Arc<dyn CandidateStore>)> {
    let Some(url) = settings.database.url.as_deref() else {
        info!("No database URL configured, using seeded in-memory catalog");
        let catalog = Arc::new(InMemoryCatalog::seeded());
        let users: Arc<dyn UserStore> = catalog.clone();
        let candidates: Arc<dyn CandidateStore> = catalog;
        return Ok((users, candidates));
    };

    let db = &settings.database;
    let postgres = PostgresClient::from_settings(
        url,
        db.max_connections,
        db.min_connections,
        db.acquire_timeout_secs,
        db.idle_timeout_secs,
        db.run_migrations,
    )
    .await
    .map_err(|e| {
        error!("Failed to connect to PostgreSQL: {}", e);
        io::Error::new(io::ErrorKind::ConnectionRefused, e)
    })?;

    let postgres = Arc::new(postgres);
    let users: Arc<dyn UserStore> = postgres.clone();
    let candidates: Arc<dyn CandidateStore> = postgres;
    Ok((users, candidates))
}

fn build_supplier(settings: &Settings) -> io::Result<Arc<dyn SupplierClient>> {
    let supplier = &settings.supplier;

    match supplier.mode {
        SupplierMode::Mock => {
            let client: Arc<dyn SupplierClient> =
                Arc::new(MockSupplier::new(Duration::from_millis(supplier.latency_ms)));
            Ok(client)
        }
        SupplierMode::Http => {
            let client = HttpSupplier::new(
                supplier.base_url.clone(),
                supplier.api_key.clone(),
                Duration::from_secs(supplier.timeout_secs),
            )
            .map_err(|e| {
                error!("Failed to build supplier client: {}", e);
                io::Error::new(io::ErrorKind::Other, e)
            })?;
            let client: Arc<dyn SupplierClient> = Arc::new(client);
            Ok(client)
        }
    }
}
