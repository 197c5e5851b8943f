pub mod config;
pub mod logging;

pub mod allow_list;
pub mod badge;
pub mod capture;
pub mod classify;
pub mod events;
pub mod har;
pub mod lifecycle;
pub mod present;
pub mod service;
pub mod store;
pub mod tab;
