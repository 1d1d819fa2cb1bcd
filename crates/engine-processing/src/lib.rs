pub mod dedup;
pub mod driver;
pub mod error;
pub mod transform;

#[cfg(test)]
mod tests;
