//! HTTP API handlers for rakshak-seek

pub mod health;
pub mod seek;

pub use health::health_routes;
pub use seek::seek_routes;
