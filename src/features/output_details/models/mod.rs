mod output_detail;

pub use output_detail::OutputDetail;
