//! Invocation parameters of a sync run.
//!
//! Infrastructure settings (database, provider URL, pacing) come from the
//! environment via [`Config`](crate::core::config::Config); these flags only
//! choose which regions a run covers.

use std::collections::BTreeSet;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "siskeudes-sync")]
#[command(about = "Synchronize SISKEUDES output details into PostgreSQL, one regency at a time")]
pub struct Args {
    /// Province codes to synchronize, comma separated (default: all provinces)
    #[arg(long, env = "SYNC_PROVINCES", value_delimiter = ',')]
    pub provinces: Vec<String>,

    /// Regency code to resume from (inclusive); earlier regencies are skipped
    #[arg(long, env = "SYNC_RESUME_FROM")]
    pub resume_from: Option<String>,

    /// Fiscal year (tahun) requested from the provider
    #[arg(long, env = "SYNC_FISCAL_YEAR")]
    pub fiscal_year: Option<String>,
}

impl Args {
    /// Province filter with blanks dropped; empty means every province
    pub fn province_filter(&self) -> BTreeSet<String> {
        self.provinces
            .iter()
            .map(|code| code.trim())
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn resume_from(&self) -> Option<&str> {
        self.resume_from
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}
