//! Indonesian administrative regions (wilayah) used to drive a sync run.
//!
//! Output details are fetched one regency/city (kabupaten/kota) at a time. The
//! catalog of regencies lives in `master_kota`:
//!
//! | Column | Meaning |
//! |--------|---------|
//! | `provinsi_id` | Province code (e.g. `11`) |
//! | `kota_id` | Regency/city code within the province (e.g. `02`) |
//!
//! Regions are always listed ordered by `(provinsi_id, kota_id)`.

pub mod models;
pub mod services;

pub use models::Region;
pub use services::{RegionService, RegionSource};
