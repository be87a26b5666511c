pub mod error;
pub mod estimator;
pub mod locks;
pub mod ports;
pub mod repo;
pub mod service;
pub mod validation;
