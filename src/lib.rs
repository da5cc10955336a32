pub mod analysis;
pub mod core;
pub mod gui;
pub mod ingest;
pub mod persistence;
pub mod report;
