pub mod config;
pub mod projection;
pub mod sensitivity;
pub mod valuation;
