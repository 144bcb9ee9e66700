pub mod calculators;
pub mod catch;
pub mod engine;
pub mod state;

#[cfg(test)]
pub(crate) mod tests;
