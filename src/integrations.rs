// External integrations module
// This module contains integrations with external tools

pub mod git;
pub mod runner;

// GitHub REST API integration
pub mod github;
