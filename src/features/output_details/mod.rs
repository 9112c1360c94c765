//! SISKEUDES output detail synchronization.
//!
//! Output details (detail output kegiatan) are village budget-execution records
//! published per regency by the SISKEUDES provider. A run pulls them region by
//! region and upserts them into `siskeudes_detail_output`.
//!
//! ## Pipeline
//!
//! | Step | Component |
//! |------|-----------|
//! | List regencies | [`RegionSource`](crate::features::regions::RegionSource) |
//! | Fetch raw records | [`OutputDetailFetcher`](clients::OutputDetailFetcher) ([`SiskeudesClient`]) |
//! | Qualify `kd_kab` / `kd_kec` / `kd_desa` | [`qualify_region_codes`](services::qualify_region_codes) |
//! | Upsert in one transaction | [`OutputDetailStore`](services::OutputDetailStore) ([`OutputDetailService`]) |
//!
//! [`OutputDetailSynchronizer`] drives the steps, one regency at a time.

pub mod clients;
pub mod models;
pub mod services;
pub mod workers;

pub use clients::SiskeudesClient;
pub use services::OutputDetailService;
pub use workers::OutputDetailSynchronizer;
