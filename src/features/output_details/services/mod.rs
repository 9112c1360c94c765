mod output_detail_service;
mod transform;

pub use output_detail_service::{OutputDetailService, OutputDetailStore};
pub use transform::qualify_region_codes;
