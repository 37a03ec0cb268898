pub mod forms;
pub mod models;
pub mod services;
#[cfg(test)]
mod tests;
pub mod views;
