pub mod error;
pub mod runtime;
pub mod service;
