mod auth;

pub use auth::TokenManager;
pub use auth::TokenProvider;
