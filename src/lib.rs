pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod main_lib;
pub mod navigator;
pub mod persistence;
pub mod projection;
pub mod search;
pub mod tree;
