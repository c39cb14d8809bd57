// Command handlers module

pub mod open_pull;
