pub mod jwt;
pub mod password;
pub mod service;
pub mod session;
