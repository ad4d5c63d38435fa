pub mod candidate;
pub mod config;
pub mod hint;
pub mod locale;
