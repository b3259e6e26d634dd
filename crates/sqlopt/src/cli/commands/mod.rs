pub mod analyze;
pub mod render;
pub mod report;
pub mod sample;
pub mod schema;
