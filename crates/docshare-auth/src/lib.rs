//! # docshare-auth
//!
//! Identity resolution for DocShare.
//!
//! ## Modules
//!
//! - `identity`: the authenticated caller and their role
//! - `jwt`: HS256 bearer token issuing and validation
//! - `password`: Argon2id hashing for link passwords

pub mod identity;
pub mod jwt;
pub mod password;

pub use identity::{Identity, Role};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
