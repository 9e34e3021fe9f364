pub mod callback;
pub mod commands;
pub mod config;
pub mod content;
pub mod database;
pub mod dispatch;
pub mod followup;
pub mod keyboard;
pub mod onboarding;
pub mod quiz;
pub mod runner;
pub mod state;

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;
