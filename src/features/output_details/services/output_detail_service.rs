use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, PersistOperation, Result};
use crate::features::output_details::models::OutputDetail;

/// Durable storage for output detail batches.
///
/// A call stores the whole batch or nothing. Records are upserted on
/// `(tahun, kd_prov, kd_kab, kd_kec, kd_desa, id_keg, no_id)`, so delivering
/// the same record again updates it in place.
#[async_trait]
pub trait OutputDetailStore: Send + Sync {
    async fn store_output_details(&self, details: &[OutputDetail]) -> Result<()>;
}

const UPSERT_OUTPUT_DETAIL_QUERY: &str = r#"
INSERT INTO siskeudes_detail_output (
    tahun, kd_prov, nama_provinsi, kd_kab, nama_kabupaten,
    kd_kec, nama_kecamatan, kd_desa, nama_desa, id_keg,
    nama_kegiatan, kode_sumber, pagu, kode_output, no_id, nama_paket,
    lokasi, waktu, keluaran, uraian_output, volume, satuan, nilai,
    anggaran1, anggaran2, realisasi0, realisasi1, realisasi2, fisik0,
    fisik1, fisik2, namapptkd, nippptkd, jbtpptkd
) VALUES (
    $1, $2, $3, $4, $5,
    $6, $7, $8, $9, $10,
    $11, $12, $13, $14, $15, $16,
    $17, $18, $19, $20, $21, $22, $23,
    $24, $25, $26, $27, $28, $29,
    $30, $31, $32, $33, $34
)
ON CONFLICT (tahun, kd_prov, kd_kab, kd_kec, kd_desa, id_keg, no_id) DO UPDATE SET
    nama_provinsi = EXCLUDED.nama_provinsi,
    nama_kabupaten = EXCLUDED.nama_kabupaten,
    nama_kecamatan = EXCLUDED.nama_kecamatan,
    nama_desa = EXCLUDED.nama_desa,
    nama_kegiatan = EXCLUDED.nama_kegiatan,
    pagu = EXCLUDED.pagu,
    nilai = EXCLUDED.nilai,
    nama_paket = EXCLUDED.nama_paket,
    realisasi1 = EXCLUDED.realisasi1,
    realisasi2 = EXCLUDED.realisasi2
"#;

/// Writes output details into `siskeudes_detail_output`
pub struct OutputDetailService {
    pool: PgPool,
}

impl OutputDetailService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OutputDetailStore for OutputDetailService {
    async fn store_output_details(&self, details: &[OutputDetail]) -> Result<()> {
        // Dropping the transaction without commit rolls it back
        let mut tx = self.pool.begin().await.map_err(|e| AppError::Persist {
            operation: PersistOperation::BeginTransaction,
            source: e,
        })?;

        for detail in details {
            sqlx::query(UPSERT_OUTPUT_DETAIL_QUERY)
                .bind(&detail.fiscal_year)
                .bind(&detail.province_code)
                .bind(&detail.province_name)
                .bind(&detail.regency_code)
                .bind(&detail.regency_name)
                .bind(&detail.district_code)
                .bind(&detail.district_name)
                .bind(&detail.village_code)
                .bind(&detail.village_name)
                .bind(&detail.activity_id)
                .bind(&detail.activity_name)
                .bind(&detail.source_code)
                .bind(detail.ceiling_budget)
                .bind(&detail.output_code)
                .bind(&detail.package_number)
                .bind(&detail.package_name)
                .bind(&detail.location)
                .bind(&detail.timeframe)
                .bind(&detail.output)
                .bind(&detail.output_description)
                .bind(detail.volume)
                .bind(&detail.unit)
                .bind(detail.value)
                .bind(detail.budget_stage1)
                .bind(detail.budget_stage2)
                .bind(detail.realization_stage0)
                .bind(detail.realization_stage1)
                .bind(detail.realization_stage2)
                .bind(detail.physical_progress_stage0)
                .bind(detail.physical_progress_stage1)
                .bind(detail.physical_progress_stage2)
                .bind(&detail.official_name)
                .bind(&detail.official_nip)
                .bind(&detail.official_position)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to upsert output detail (kd_desa={}, id_keg={}, no_id={}): {:?}",
                        detail.village_code,
                        detail.activity_id,
                        detail.package_number,
                        e
                    );
                    AppError::Persist {
                        operation: PersistOperation::UpsertOutputDetail,
                        source: e,
                    }
                })?;
        }

        tx.commit().await.map_err(|e| AppError::Persist {
            operation: PersistOperation::CommitTransaction,
            source: e,
        })?;

        tracing::debug!("Committed {} output details", details.len());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Columns identifying a record; must match the table's unique constraint
    const NATURAL_KEY_COLUMNS: [&str; 7] = [
        "tahun", "kd_prov", "kd_kab", "kd_kec", "kd_desa", "id_keg", "no_id",
    ];

    /// Columns overwritten when a record is delivered again
    const MUTABLE_COLUMNS: [&str; 10] = [
        "nama_provinsi",
        "nama_kabupaten",
        "nama_kecamatan",
        "nama_desa",
        "nama_kegiatan",
        "pagu",
        "nilai",
        "nama_paket",
        "realisasi1",
        "realisasi2",
    ];

    fn normalized(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_conflict_target_is_the_natural_key() {
        let expected = format!("ON CONFLICT ({}) DO UPDATE SET", NATURAL_KEY_COLUMNS.join(", "));
        assert!(normalized(UPSERT_OUTPUT_DETAIL_QUERY).contains(&expected));
    }

    #[test]
    fn test_update_set_covers_exactly_the_mutable_columns() {
        let query = normalized(UPSERT_OUTPUT_DETAIL_QUERY);
        let (_, update_set) = query.split_once("DO UPDATE SET").unwrap();

        let updated: Vec<&str> = update_set
            .split(',')
            .map(|assignment| assignment.split('=').next().unwrap().trim())
            .collect();

        assert_eq!(updated, MUTABLE_COLUMNS.to_vec());
        for column in NATURAL_KEY_COLUMNS {
            assert!(!updated.contains(&column), "{} must never be updated", column);
        }
    }

    #[test]
    fn test_every_column_has_a_placeholder() {
        let query = normalized(UPSERT_OUTPUT_DETAIL_QUERY);
        let columns = query
            .split_once('(')
            .and_then(|(_, rest)| rest.split_once(')'))
            .map(|(cols, _)| cols.split(',').count())
            .unwrap();

        assert_eq!(columns, 34);
        assert!(query.contains("$34"));
        assert!(!query.contains("$35"));
    }
}
