//! Domain models for the Aura Grow platform

mod environment;
mod reading;
mod recommendation;
mod user;

pub use environment::*;
pub use reading::*;
pub use recommendation::*;
pub use user::*;
