//! トークン検証（TokenVerifier）の実装
//!
//! - `jwt`: HS256 の JWT を検証する実装

pub mod jwt;

pub use jwt::JwtTokenVerifier;
