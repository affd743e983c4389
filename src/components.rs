//! Reusable HTML components for page generation
//!
//! Maud component functions shared across page types (listing, post,
//! wiki). Components take normalized records and never touch the network.

pub mod comment;
pub mod layout;
pub mod metadata;
pub mod nav;
pub mod post_card;
