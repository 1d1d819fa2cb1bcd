pub mod error;
pub mod ibge;
