//! Routed pages.

pub mod login;
pub mod overview;
pub mod settings;
