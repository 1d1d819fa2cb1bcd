pub mod auth;
pub mod reference;
pub mod sink;
pub mod source;
