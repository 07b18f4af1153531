pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::Claims;
pub use claims::Identity;
pub use claims::DEFAULT_TOKEN_LIFETIME_HOURS;
pub use errors::JwtError;
pub use handler::JwtHandler;
