// File: ./src/model/mod.rs
pub mod event;
pub mod post;
pub mod subscription;

pub use event::{EventColor, EventOrigin, ScheduledEvent};
pub use post::{Category, Platform, Post, PostRecord};
pub use subscription::Subscription;
