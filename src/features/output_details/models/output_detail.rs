use rust_decimal::Decimal;
use serde::Deserialize;

use crate::shared::deserialize::{decimal_or_zero, string_or_empty};

/// One SISKEUDES budget-execution record: an activity package (paket kegiatan)
/// carried out in a village for a fiscal year.
///
/// Field names on the wire and in `siskeudes_detail_output` follow the
/// provider's abbreviations (`kd_prov`, `pagu`, `realisasi1`, ...).
///
/// As received, `regency_code`, `district_code` and `village_code` are relative
/// to their parent. They are qualified into dotted paths exactly once before
/// storage, see [`qualify_region_codes`](crate::features::output_details::services::qualify_region_codes).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutputDetail {
    #[serde(rename = "tahun", default, deserialize_with = "string_or_empty")]
    pub fiscal_year: String,
    #[serde(rename = "kd_prov", default, deserialize_with = "string_or_empty")]
    pub province_code: String,
    #[serde(rename = "nama_provinsi", default, deserialize_with = "string_or_empty")]
    pub province_name: String,
    #[serde(rename = "kd_kab", default, deserialize_with = "string_or_empty")]
    pub regency_code: String,
    #[serde(rename = "nama_kabupaten", default, deserialize_with = "string_or_empty")]
    pub regency_name: String,
    #[serde(rename = "kd_kec", default, deserialize_with = "string_or_empty")]
    pub district_code: String,
    #[serde(rename = "nama_kecamatan", default, deserialize_with = "string_or_empty")]
    pub district_name: String,
    #[serde(rename = "kd_desa", default, deserialize_with = "string_or_empty")]
    pub village_code: String,
    #[serde(rename = "nama_desa", default, deserialize_with = "string_or_empty")]
    pub village_name: String,
    #[serde(rename = "id_keg", default, deserialize_with = "string_or_empty")]
    pub activity_id: String,
    #[serde(rename = "nama_kegiatan", default, deserialize_with = "string_or_empty")]
    pub activity_name: String,
    #[serde(rename = "kode_sumber", default, deserialize_with = "string_or_empty")]
    pub source_code: String,
    /// Budget ceiling (pagu)
    #[serde(rename = "pagu", default, deserialize_with = "decimal_or_zero")]
    pub ceiling_budget: Decimal,
    #[serde(rename = "kode_output", default, deserialize_with = "string_or_empty")]
    pub output_code: String,
    #[serde(rename = "no_id", default, deserialize_with = "string_or_empty")]
    pub package_number: String,
    #[serde(rename = "nama_paket", default, deserialize_with = "string_or_empty")]
    pub package_name: String,
    #[serde(rename = "lokasi", default, deserialize_with = "string_or_empty")]
    pub location: String,
    #[serde(rename = "waktu", default, deserialize_with = "string_or_empty")]
    pub timeframe: String,
    #[serde(rename = "keluaran", default, deserialize_with = "string_or_empty")]
    pub output: String,
    #[serde(rename = "uraian_output", default, deserialize_with = "string_or_empty")]
    pub output_description: String,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub volume: Decimal,
    #[serde(rename = "satuan", default, deserialize_with = "string_or_empty")]
    pub unit: String,
    #[serde(rename = "nilai", default, deserialize_with = "decimal_or_zero")]
    pub value: Decimal,
    #[serde(rename = "anggaran1", default, deserialize_with = "decimal_or_zero")]
    pub budget_stage1: Decimal,
    #[serde(rename = "anggaran2", default, deserialize_with = "decimal_or_zero")]
    pub budget_stage2: Decimal,
    #[serde(rename = "realisasi0", default, deserialize_with = "decimal_or_zero")]
    pub realization_stage0: Decimal,
    #[serde(rename = "realisasi1", default, deserialize_with = "decimal_or_zero")]
    pub realization_stage1: Decimal,
    #[serde(rename = "realisasi2", default, deserialize_with = "decimal_or_zero")]
    pub realization_stage2: Decimal,
    #[serde(rename = "fisik0", default, deserialize_with = "decimal_or_zero")]
    pub physical_progress_stage0: Decimal,
    #[serde(rename = "fisik1", default, deserialize_with = "decimal_or_zero")]
    pub physical_progress_stage1: Decimal,
    #[serde(rename = "fisik2", default, deserialize_with = "decimal_or_zero")]
    pub physical_progress_stage2: Decimal,
    /// Activity technical officer (PPTKD)
    #[serde(rename = "namapptkd", default, deserialize_with = "string_or_empty")]
    pub official_name: String,
    #[serde(rename = "nippptkd", default, deserialize_with = "string_or_empty")]
    pub official_nip: String,
    #[serde(rename = "jbtpptkd", default, deserialize_with = "string_or_empty")]
    pub official_position: String,
}
