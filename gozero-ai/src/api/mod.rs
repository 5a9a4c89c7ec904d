//! HTTP API handlers for gozero-ai

pub mod analyze;
pub mod chatbot;
pub mod health;

pub use analyze::analyze_routes;
pub use chatbot::chatbot_routes;
pub use health::health_routes;
