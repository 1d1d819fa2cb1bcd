pub mod catalog;
pub mod error;
pub mod report;
pub mod settings;
