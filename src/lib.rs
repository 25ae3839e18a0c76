pub mod config;
pub mod gateway;
pub mod infer;
pub mod service;
