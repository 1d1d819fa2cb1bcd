pub mod erp;
pub mod reference;
pub mod sql;
