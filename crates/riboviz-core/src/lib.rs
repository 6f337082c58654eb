pub mod artifacts;
pub mod compare;
pub mod config;
pub mod domain;
pub mod regression;
pub mod workflow;
