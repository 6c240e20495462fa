// Crate root library declaration and module exports.
pub mod calendar;
pub mod cli;
pub mod client;
pub mod color_utils;
pub mod config;
pub mod context;
pub mod dates;
pub mod display;
pub mod export;
pub mod feed;
pub mod model;
pub mod state;
pub mod storage;
pub mod views;

rust_i18n::i18n!("locales", fallback = "en");
