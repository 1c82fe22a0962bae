pub mod api;
pub mod model;
pub mod service;

#[cfg(test)]
pub mod fake;
