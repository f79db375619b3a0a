pub mod logger;
pub mod render_pipeline;
