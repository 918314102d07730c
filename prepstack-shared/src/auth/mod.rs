/// Authentication and session management
///
/// - `jwt`: HS256 token signing and validation
/// - `password`: Argon2id password hashing
/// - `tokens`: access/refresh pair lifecycle (issue, verify, rotate, revoke)
/// - `service`: account operations (register, authenticate, credential changes)

pub mod jwt;
pub mod password;
pub mod service;
pub mod tokens;
