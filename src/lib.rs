// Export modules for the binary and tests
pub mod cli;
pub mod color;
pub mod config;
pub mod hooks;
pub mod issues;
pub mod logging;
pub mod service;
pub mod session;

// Integration modules
pub mod integrations;

// Command modules
pub mod commands;

// Domain modules
pub mod domain;
