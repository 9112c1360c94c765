use sqlx::FromRow;

/// One synchronization unit: a regency/city (kabupaten/kota) inside its province,
/// as listed in the `master_kota` catalog
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, FromRow)]
pub struct Region {
    #[sqlx(rename = "provinsi_id")]
    pub province_code: String,
    #[sqlx(rename = "kota_id")]
    pub regency_code: String,
}

impl Region {
    #[cfg(test)]
    pub fn new(province_code: impl Into<String>, regency_code: impl Into<String>) -> Self {
        Self {
            province_code: province_code.into(),
            regency_code: regency_code.into(),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "prov {} / kab {}", self.province_code, self.regency_code)
    }
}
