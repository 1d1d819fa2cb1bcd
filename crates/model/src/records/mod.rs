pub mod row;
pub mod upsert;
