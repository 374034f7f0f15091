use std::env;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use krishi_advisor::bundle::ArtifactBundle;
use krishi_advisor::pipeline::AdvisoryPipeline;
use krishi_core::config::LayeredConfig;
use krishi_llm::openai::OpenAiClient;
use krishi_store::memory::MemoryProfileStore;
use krishi_store::ports::ProfileStore;
use krishi_store::postgres::{PostgresConfig, PostgresProfileStore};
use krishi_weather::geocode::NominatimClient;
use krishi_weather::openweather::OpenWeatherClient;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use krishi_api::routes::create_router;
use krishi_api::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "krishi_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = env::var("KRISHI_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3001);

    let config = LayeredConfig::with_defaults().load_from_env();

    tracing::info!(
        port = port,
        artifact_dir = %config.artifact_dir.value.display(),
        top_k = config.top_k.value,
        llm_model = %config.llm_model.value,
        "Starting KrishiMitra API server"
    );

    // The advisory artifacts are required before any request is served; a
    // missing or inconsistent bundle stops the process here.
    let artifacts = match ArtifactBundle::load(&config.artifact_dir.value) {
        Ok(artifacts) => Arc::new(artifacts),
        Err(e) => {
            tracing::error!("Failed to load advisory artifacts: {}", e);
            tracing::error!(
                "Remediation:\n\
                1. Check KRISHI_ARTIFACT_DIR points at a bundle directory\n\
                2. Ensure manifest.json, transform.json, index.json, and catalog.json exist\n\
                3. Rebuild the bundle if the three artifacts disagree"
            );
            std::process::exit(1);
        }
    };

    tracing::info!(
        version = %artifacts.manifest.version,
        crops = artifacts.manifest.crop_count,
        feature_dim = artifacts.manifest.feature_dim,
        "Loaded advisory artifacts"
    );

    // Initialize storage backend based on DATABASE_URL environment variable
    let profile_store: Arc<dyn ProfileStore> = match env::var("DATABASE_URL") {
        Ok(_) => {
            tracing::info!("DATABASE_URL found, connecting to PostgreSQL...");
            match init_postgres_storage().await {
                Ok(store) => {
                    tracing::info!("Connected to PostgreSQL");
                    store
                }
                Err(e) => {
                    tracing::error!("Failed to connect to PostgreSQL: {}", e);
                    tracing::error!(
                        "Remediation:\n\
                        1. Ensure PostgreSQL is running\n\
                        2. Verify DATABASE_URL is correct\n\
                        3. Check that the database exists and is accessible"
                    );
                    std::process::exit(1);
                }
            }
        }
        Err(_) => {
            tracing::info!("Using in-memory storage (set DATABASE_URL for PostgreSQL)");
            match env::var("KRISHI_SEED_FILE") {
                Ok(path) => match MemoryProfileStore::load_seed_file(&path) {
                    Ok(store) => Arc::new(store),
                    Err(e) => {
                        tracing::error!("Failed to load seed file {}: {}", path, e);
                        std::process::exit(1);
                    }
                },
                Err(_) => Arc::new(MemoryProfileStore::new()),
            }
        }
    };

    // Classification and refinement go through one OpenAI-compatible client
    let llm = match OpenAiClient::from_env(
        config.llm_base_url.value.clone(),
        config.llm_model.value.clone(),
    ) {
        Ok(llm) => Arc::new(llm),
        Err(e) => {
            tracing::error!("Failed to configure language model client: {}", e);
            tracing::error!("Remediation: set OPENAI_API_KEY (and KRISHI_LLM_BASE_URL for a compatible endpoint)");
            std::process::exit(1);
        }
    };

    let mut pipeline = AdvisoryPipeline::new(
        artifacts.clone(),
        profile_store.clone(),
        llm.clone(),
        llm.clone(),
        llm,
    )
    .with_top_k(config.top_k.value)
    .with_forecast_window_hours(config.forecast_window_hours.value)
    .with_geocoder(Arc::new(NominatimClient::public()));

    // Weather is optional enrichment; without a key the pipeline answers
    // without forecasts
    match env::var("OPENWEATHER_API_KEY") {
        Ok(api_key) => {
            pipeline = pipeline.with_weather(Arc::new(OpenWeatherClient::production(api_key)));
        }
        Err(_) => {
            tracing::info!("OPENWEATHER_API_KEY not set; weather enrichment disabled");
        }
    }

    let state = Arc::new(AppState::new(Arc::new(pipeline), profile_store, artifacts));

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state).layer(cors);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.unwrap();
}

/// Initialize PostgreSQL storage from the environment
async fn init_postgres_storage() -> Result<Arc<PostgresProfileStore>, String> {
    let config = PostgresConfig::from_env().map_err(|e| format!("Invalid DATABASE_URL: {}", e))?;

    PostgresProfileStore::with_migrations(config)
        .await
        .map(Arc::new)
        .map_err(|e| format!("Connection failed: {}", e))
}
