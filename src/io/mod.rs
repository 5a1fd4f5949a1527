// src/io/mod.rs

pub mod reference;
pub mod reporting;

pub use reference::load_reference_data;
pub use reporting::write_round_log;
