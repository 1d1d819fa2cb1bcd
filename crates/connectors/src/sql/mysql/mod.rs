pub mod adapter;
pub mod data_type;
pub mod params;
pub mod query;
pub mod row;
