pub mod errors;
pub mod forms;
pub mod identifiers;
pub mod models;
pub mod state;
pub mod views;

#[cfg(test)]
mod tests;
