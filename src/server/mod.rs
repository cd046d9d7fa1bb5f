pub mod landing_page;
pub mod serve_metrics;
