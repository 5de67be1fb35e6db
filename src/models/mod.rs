pub mod cargo;
pub mod request;
pub mod service;
pub mod user;
