pub mod api;
pub mod mapping;
pub mod model;
pub mod parse;
pub mod service;
pub mod template;
