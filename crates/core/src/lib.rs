//! Domain rules for the Precious Coffer site backend.
//!
//! This crate has no database or HTTP dependencies so the rules can be unit
//! tested in isolation and shared by the repository and API layers.

pub mod contact;
pub mod error;
pub mod imaging;
pub mod invite;
pub mod slug;
pub mod testimonial;
pub mod types;
