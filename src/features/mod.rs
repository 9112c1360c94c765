pub mod output_details;
pub mod regions;
