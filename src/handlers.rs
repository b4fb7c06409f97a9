pub mod export;
pub mod forecast;
pub mod health;
pub mod indicators;
pub mod scenario;
