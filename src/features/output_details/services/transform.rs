use crate::features::output_details::models::OutputDetail;

/// Rewrite the relative region codes of each record into dotted paths:
///
/// - `kd_kab`  → `{kd_prov}.{kd_kab}`
/// - `kd_kec`  → `{kd_prov}.{kd_kab}.{kd_kec}`
/// - `kd_desa` → `{kd_prov}.{kd_kab}.{kd_desa}`, trailing `.` of the raw code dropped
///
/// Must run exactly once per record. Missing codes yield empty segments.
pub fn qualify_region_codes(mut details: Vec<OutputDetail>) -> Vec<OutputDetail> {
    for detail in details.iter_mut() {
        // Raw values first: kd_kab is overwritten but still needed below
        let province = detail.province_code.as_str();
        let regency = std::mem::take(&mut detail.regency_code);
        let district = std::mem::take(&mut detail.district_code);
        let village = std::mem::take(&mut detail.village_code);
        let village = village.strip_suffix('.').unwrap_or(village.as_str());

        detail.district_code = format!("{}.{}.{}", province, regency, district);
        detail.village_code = format!("{}.{}.{}", province, regency, village);
        detail.regency_code = format!("{}.{}", province, regency);
    }

    details
}
