use validator::Validate;

use crate::entities::admin_user::{AdminUser, AdminUserResponse, LoginAdmin, NewAdminUser};
use crate::entities::token::AuthResponse;
use crate::errors::{AppError, AuthError};
use crate::auth::password::{hash_password, verify_password};
use crate::repositories::admin_user::AdminUserRepository;
use crate::repositories::token::TokenServiceRepository;

pub struct AuthHandler<R, T>
where
    R: AdminUserRepository,
    T: TokenServiceRepository,
{
    pub admin_repo: R,
    pub token_service: T,
    fast_hashing: bool,
}

impl<R, T> AuthHandler<R, T>
where
    R: AdminUserRepository,
    T: TokenServiceRepository,
{
    pub fn new(admin_repo: R, token_service: T, fast_hashing: bool) -> Self {
        AuthHandler {
            admin_repo,
            token_service,
            fast_hashing,
        }
    }

    /// Creates an admin account after validation and password hashing
    pub async fn create_admin(&self, request: NewAdminUser) -> Result<AdminUserResponse, AppError> {
        request.validate()?;

        if self.admin_repo.get_admin_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("An admin with this email already exists".to_string()));
        }

        let hashed_password = hash_password(&request.password, self.fast_hashing)?;
        let insert = request.prepare_for_insert(hashed_password);
        let id = self.admin_repo.create_admin(&insert).await?;

        tracing::info!(admin_id = id, "Admin account created");
        Ok(AdminUserResponse {
            id,
            email: insert.email,
            is_superuser: insert.is_superuser,
            created_at: insert.created_at,
        })
    }

    /// Checks credentials and issues an access token
    pub async fn login(&self, request: LoginAdmin) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        let admin = self.admin_repo.get_admin_by_email(&request.email)
            .await
            .map_err(|_e| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&request.password, &admin.password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&admin)?;

        tracing::info!(admin_id = admin.id, "Admin logged in successfully");
        Ok(response)
    }

    pub fn create_auth_response(&self, admin: &AdminUser) -> Result<AuthResponse, AuthError> {
        let access_token = self.token_service.create_jwt(admin)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        Ok(AuthResponse::new(access_token, self.token_service.expires_in()))
    }
}
