//! PostgreSQL storage adapter implementation

use async_trait::async_trait;
use krishi_core::error::{KrishiError, Result};
use krishi_core::models::{Coordinates, FarmerId, FarmerProfile, SoilRecord};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};

use crate::ports::ProfileStore;

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum pool connections
    pub max_connections: u32,
}

impl PostgresConfig {
    /// Load configuration from environment variables.
    ///
    /// Requires the DATABASE_URL environment variable to be set.
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| KrishiError::ConfigMissing { key: "DATABASE_URL".to_string() })?;
        Self::new(database_url)
    }

    /// Create a new configuration with the given database URL
    pub fn new(database_url: impl Into<String>) -> Result<Self> {
        let database_url = database_url.into();
        if database_url.trim().is_empty() {
            return Err(KrishiError::ConfigInvalid {
                key: "DATABASE_URL".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }
        Ok(Self { database_url, max_connections: 10 })
    }
}

/// PostgreSQL-backed profile store
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    /// Connect to the database with the given configuration
    pub async fn connect(config: PostgresConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .map_err(|e| KrishiError::StorageUnavailable {
                reason: format!("Failed to connect to database: {}", e),
            })?;

        // Test connection by executing a simple query
        sqlx::query("SELECT 1").fetch_one(&pool).await.map_err(|e| {
            KrishiError::StorageUnavailable {
                reason: format!("Connection test failed: {}", e),
            }
        })?;

        Ok(Self { pool })
    }

    /// Connect and ensure the schema exists
    pub async fn with_migrations(config: PostgresConfig) -> Result<Self> {
        let store = Self::connect(config).await?;
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create the profile and soil-record tables when absent
    pub async fn run_migrations(&self) -> Result<()> {
        const SCHEMA: &[&str] = &[
            r#"
            CREATE TABLE IF NOT EXISTS farmers (
                aadhaar_no TEXT PRIMARY KEY,
                name TEXT,
                district TEXT,
                state TEXT,
                lat DOUBLE PRECISION,
                lon DOUBLE PRECISION
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS soil_records (
                id BIGSERIAL PRIMARY KEY,
                aadhaar_no TEXT NOT NULL REFERENCES farmers (aadhaar_no),
                survey_no TEXT NOT NULL,
                ph DOUBLE PRECISION,
                n_kg_ha DOUBLE PRECISION,
                p_kg_ha DOUBLE PRECISION,
                k_kg_ha DOUBLE PRECISION,
                soil_type TEXT,
                UNIQUE (aadhaar_no, survey_no)
            )
            "#,
        ];

        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await.map_err(|e| {
                KrishiError::StorageUnavailable {
                    reason: format!("Migration failed: {}", e),
                }
            })?;
        }

        Ok(())
    }
}

fn storage_error(e: sqlx::Error) -> KrishiError {
    KrishiError::StorageUnavailable { reason: format!("Query failed: {}", e) }
}

#[derive(Debug, FromRow)]
struct FarmerRow {
    aadhaar_no: String,
    name: Option<String>,
    district: Option<String>,
    state: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl From<FarmerRow> for FarmerProfile {
    fn from(row: FarmerRow) -> Self {
        let coordinates = match (row.lat, row.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
            _ => None,
        };
        FarmerProfile {
            id: FarmerId(row.aadhaar_no),
            name: row.name,
            district: row.district,
            state: row.state,
            coordinates,
        }
    }
}

#[derive(Debug, FromRow)]
struct SoilRecordRow {
    survey_no: String,
    ph: Option<f64>,
    n_kg_ha: Option<f64>,
    p_kg_ha: Option<f64>,
    k_kg_ha: Option<f64>,
    soil_type: Option<String>,
}

impl From<SoilRecordRow> for SoilRecord {
    fn from(row: SoilRecordRow) -> Self {
        SoilRecord {
            survey_no: row.survey_no,
            ph: row.ph,
            nitrogen_kg_ha: row.n_kg_ha,
            phosphorus_kg_ha: row.p_kg_ha,
            potassium_kg_ha: row.k_kg_ha,
            soil_type: row.soil_type,
        }
    }
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn get_profile(&self, farmer_id: &FarmerId) -> Result<Option<FarmerProfile>> {
        let row: Option<FarmerRow> = sqlx::query_as(
            "SELECT aadhaar_no, name, district, state, lat, lon FROM farmers WHERE aadhaar_no = $1",
        )
        .bind(&farmer_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(FarmerProfile::from))
    }

    async fn soil_records(&self, farmer_id: &FarmerId) -> Result<Vec<SoilRecord>> {
        let rows: Vec<SoilRecordRow> = sqlx::query_as(
            "SELECT survey_no, ph, n_kg_ha, p_kg_ha, k_kg_ha, soil_type \
             FROM soil_records WHERE aadhaar_no = $1 ORDER BY id",
        )
        .bind(&farmer_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(SoilRecord::from).collect())
    }

    async fn soil_record(
        &self,
        farmer_id: &FarmerId,
        survey_no: &str,
    ) -> Result<Option<SoilRecord>> {
        let row: Option<SoilRecordRow> = sqlx::query_as(
            "SELECT survey_no, ph, n_kg_ha, p_kg_ha, k_kg_ha, soil_type \
             FROM soil_records WHERE aadhaar_no = $1 AND survey_no = $2",
        )
        .bind(&farmer_id.0)
        .bind(survey_no)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(SoilRecord::from))
    }
}
