use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::{User, UserRole};

// Request para registrar un usuario
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 72))]
    pub password: String,

    pub role: UserRole,
}

// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: Option<String>,
    pub message: Option<String>,
    pub user: Option<UserResponse>,
}

impl LoginResponse {
    pub fn success(token: String, user: UserResponse) -> Self {
        Self {
            success: true,
            token: Some(token),
            message: None,
            user: Some(user),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            token: None,
            message: Some(message),
            user: None,
        }
    }
}

// Response de usuario (sin password)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            full_name: user.full_name,
            email: user.email,
            role: user.role,
        }
    }
}
