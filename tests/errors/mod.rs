//! Error tests
//!
//! Failures surface as values, never panics: frontend errors carry
//! positions, configuration errors name their cause

mod config;
mod frontend;
