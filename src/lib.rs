pub mod app;
pub mod config;
pub mod content;
pub mod engine;
pub mod event;
pub mod games;
pub mod intro;
pub mod ui;
