//! In-memory stand-ins for the region catalog, the SISKEUDES provider and the
//! output detail table.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use fake::faker::address::en::CityName;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;

use crate::core::error::{AppError, PersistOperation, Result};
use crate::features::output_details::clients::OutputDetailFetcher;
use crate::features::output_details::models::OutputDetail;
use crate::features::output_details::services::OutputDetailStore;
use crate::features::regions::{Region, RegionSource};

/// A raw record as the provider would send it for `region`
pub fn output_detail(region: &Region, district: &str, village: &str, package: &str) -> OutputDetail {
    OutputDetail {
        fiscal_year: "2024".to_string(),
        province_code: region.province_code.clone(),
        province_name: CityName().fake(),
        regency_code: region.regency_code.clone(),
        regency_name: CityName().fake(),
        district_code: district.to_string(),
        district_name: CityName().fake(),
        village_code: village.to_string(),
        village_name: CityName().fake(),
        activity_id: "1.1.01.01".to_string(),
        activity_name: "Penyelenggaraan Belanja Siltap".to_string(),
        package_number: package.to_string(),
        package_name: "Belanja Siltap Kepala Desa".to_string(),
        ceiling_budget: Decimal::from(125_000_000),
        value: Decimal::from(30_000_000),
        official_name: Name().fake(),
        ..Default::default()
    }
}

pub struct InMemoryRegionSource {
    regions: Vec<Region>,
    failure: Mutex<Option<String>>,
    listing_delay: Mutex<Option<Duration>>,
    requested_filters: Mutex<Vec<BTreeSet<String>>>,
}

impl InMemoryRegionSource {
    pub fn new(mut regions: Vec<Region>) -> Self {
        regions.sort();
        Self {
            regions,
            failure: Mutex::new(None),
            listing_delay: Mutex::new(None),
            requested_filters: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Take `delay` to answer, like a slow catalog query
    pub fn delay_listing(&self, delay: Duration) {
        *self.listing_delay.lock().unwrap() = Some(delay);
    }

    pub fn requested_filters(&self) -> Vec<BTreeSet<String>> {
        self.requested_filters.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegionSource for InMemoryRegionSource {
    async fn get_regions(&self, province_codes: &BTreeSet<String>) -> Result<Vec<Region>> {
        self.requested_filters
            .lock()
            .unwrap()
            .push(province_codes.clone());

        let delay = *self.listing_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(AppError::Database(sqlx::Error::Protocol(message)));
        }

        Ok(self
            .regions
            .iter()
            .filter(|r| province_codes.is_empty() || province_codes.contains(&r.province_code))
            .cloned()
            .collect())
    }
}

enum FetchScript {
    Respond(Vec<OutputDetail>),
    Fail(String),
    Hang,
}

/// Fetcher answering from a per-region script; unscripted regions are empty
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<Region, FetchScript>>,
    calls: Mutex<Vec<Region>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn respond_with(&self, region: &Region, details: Vec<OutputDetail>) {
        self.script(region, FetchScript::Respond(details));
    }

    pub fn fail_for(&self, region: &Region, message: &str) {
        self.script(region, FetchScript::Fail(message.to_string()));
    }

    /// Never answer for `region`
    pub fn hang_on(&self, region: &Region) {
        self.script(region, FetchScript::Hang);
    }

    pub fn calls(&self) -> Vec<Region> {
        self.calls.lock().unwrap().clone()
    }

    fn script(&self, region: &Region, script: FetchScript) {
        self.scripts.lock().unwrap().insert(region.clone(), script);
    }
}

#[async_trait]
impl OutputDetailFetcher for ScriptedFetcher {
    async fn fetch_output_details(&self, region: &Region) -> Result<Vec<OutputDetail>> {
        self.calls.lock().unwrap().push(region.clone());

        let answer = match self.scripts.lock().unwrap().get(region) {
            Some(FetchScript::Respond(details)) => Some(Ok(details.clone())),
            Some(FetchScript::Fail(message)) => {
                Some(Err(AppError::ExternalServiceError(message.clone())))
            }
            Some(FetchScript::Hang) => None,
            None => Some(Ok(Vec::new())),
        };

        match answer {
            Some(answer) => answer,
            None => std::future::pending().await,
        }
    }
}

type NaturalKey = (String, String, String, String, String, String, String);

fn natural_key(detail: &OutputDetail) -> NaturalKey {
    (
        detail.fiscal_year.clone(),
        detail.province_code.clone(),
        detail.regency_code.clone(),
        detail.district_code.clone(),
        detail.village_code.clone(),
        detail.activity_id.clone(),
        detail.package_number.clone(),
    )
}

/// Copy the columns an upsert overwrites on conflict
fn apply_upsert(existing: &mut OutputDetail, incoming: &OutputDetail) {
    existing.province_name = incoming.province_name.clone();
    existing.regency_name = incoming.regency_name.clone();
    existing.district_name = incoming.district_name.clone();
    existing.village_name = incoming.village_name.clone();
    existing.activity_name = incoming.activity_name.clone();
    existing.ceiling_budget = incoming.ceiling_budget;
    existing.value = incoming.value;
    existing.package_name = incoming.package_name.clone();
    existing.realization_stage1 = incoming.realization_stage1;
    existing.realization_stage2 = incoming.realization_stage2;
}

/// Upserting store with all-or-nothing batches
pub struct InMemoryOutputDetailStore {
    rows: Mutex<BTreeMap<NaturalKey, OutputDetail>>,
    failing_regencies: Mutex<HashSet<String>>,
    batches: Mutex<usize>,
}

impl InMemoryOutputDetailStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            failing_regencies: Mutex::new(HashSet::new()),
            batches: Mutex::new(0),
        }
    }

    /// Reject any batch containing a record of this (qualified) regency
    pub fn fail_for_regency(&self, regency_code: &str) {
        self.failing_regencies
            .lock()
            .unwrap()
            .insert(regency_code.to_string());
    }

    pub fn rows(&self) -> Vec<OutputDetail> {
        self.rows.lock().unwrap().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn batches(&self) -> usize {
        *self.batches.lock().unwrap()
    }
}

#[async_trait]
impl OutputDetailStore for InMemoryOutputDetailStore {
    async fn store_output_details(&self, details: &[OutputDetail]) -> Result<()> {
        *self.batches.lock().unwrap() += 1;

        let failing = self.failing_regencies.lock().unwrap();
        if details.iter().any(|d| failing.contains(&d.regency_code)) {
            return Err(AppError::Persist {
                operation: PersistOperation::UpsertOutputDetail,
                source: sqlx::Error::Protocol("unique violation".to_string()),
            });
        }

        let mut rows = self.rows.lock().unwrap();
        for detail in details {
            rows.entry(natural_key(detail))
                .and_modify(|existing| apply_upsert(existing, detail))
                .or_insert_with(|| detail.clone());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_upserts_only_mutable_fields() {
        let store = InMemoryOutputDetailStore::new();
        let original = output_detail(&Region::new("11", "02"), "005", "0003", "1");

        store
            .store_output_details(std::slice::from_ref(&original))
            .await
            .unwrap();

        let mut redelivered = original.clone();
        redelivered.value = Decimal::from(45_000_000);
        redelivered.realization_stage2 = Decimal::from(40_000_000);
        redelivered.realization_stage0 = Decimal::from(1);
        redelivered.unit = "Paket".to_string();

        store
            .store_output_details(&[redelivered.clone(), redelivered])
            .await
            .unwrap();

        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, Decimal::from(45_000_000));
        assert_eq!(rows[0].realization_stage2, Decimal::from(40_000_000));
        // Not part of the update set
        assert_eq!(rows[0].realization_stage0, original.realization_stage0);
        assert_eq!(rows[0].unit, original.unit);
    }
}
