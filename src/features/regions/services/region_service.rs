use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::regions::models::Region;

/// Supplies the regions a sync run walks through.
///
/// Implementations must return regions ordered by `(province_code, regency_code)`
/// ascending; resuming a run depends on that order.
#[async_trait]
pub trait RegionSource: Send + Sync {
    /// List regions, restricted to `province_codes` unless the set is empty
    async fn get_regions(&self, province_codes: &BTreeSet<String>) -> Result<Vec<Region>>;
}

const LIST_REGIONS_QUERY: &str = r#"
    SELECT provinsi_id::text AS provinsi_id, kota_id::text AS kota_id
    FROM master_kota
    ORDER BY provinsi_id, kota_id
"#;

const LIST_REGIONS_BY_PROVINCE_QUERY: &str = r#"
    SELECT provinsi_id::text AS provinsi_id, kota_id::text AS kota_id
    FROM master_kota
    WHERE provinsi_id::text = ANY($1)
    ORDER BY provinsi_id, kota_id
"#;

/// Reads the regency catalog (`master_kota`)
pub struct RegionService {
    pool: PgPool,
}

impl RegionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegionSource for RegionService {
    async fn get_regions(&self, province_codes: &BTreeSet<String>) -> Result<Vec<Region>> {
        let regions = if province_codes.is_empty() {
            sqlx::query_as::<_, Region>(LIST_REGIONS_QUERY)
                .fetch_all(&self.pool)
                .await
        } else {
            let codes: Vec<String> = province_codes.iter().cloned().collect();
            sqlx::query_as::<_, Region>(LIST_REGIONS_BY_PROVINCE_QUERY)
                .bind(codes)
                .fetch_all(&self.pool)
                .await
        }
        .map_err(|e| {
            tracing::error!(
                "Failed to fetch regions for provinces {:?}: {:?}",
                province_codes,
                e
            );
            AppError::Database(e)
        })?;

        Ok(regions)
    }
}
