//! Business logic services for the Aura Grow platform

pub mod auth;
pub mod readings;
pub mod recommendation;

pub use auth::AuthService;
pub use readings::ReadingService;
pub use recommendation::RecommendationService;
