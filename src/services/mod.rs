pub mod auth_service;
pub use auth_service::{AuthError, AuthService, LoginResult};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod password;

pub mod token;
pub use token::{Claims, TokenCodec};
