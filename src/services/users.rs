//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use once_cell::sync::Lazy;

use crate::{
    config::{AuthConfig, BootstrapAdminConfig},
    error::{AppError, AppResult},
    models::user::{
        CreateUser, RoleName, UpdateProfile, UpdateUserByAdmin, User, UserChanges, UserClaims,
    },
    repository::Repository,
};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash verified in place of a missing account so unknown usernames cost the same
static UNKNOWN_USER_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("unknown-user-placeholder").ok());

/// Credential check shared by known and unknown usernames
pub fn check_credentials(stored_hash: Option<&str>, password: &str) -> AppResult<()> {
    match stored_hash {
        Some(hash) if verify_password(hash, password)? => Ok(()),
        Some(_) => Err(AppError::InvalidCredentials),
        None => {
            if let Some(hash) = UNKNOWN_USER_HASH.as_deref() {
                verify_password(hash, password)?;
            }
            Err(AppError::InvalidCredentials)
        }
    }
}

/// Every requested role must be in `allowed`
pub fn check_roles(requested: &[RoleName], allowed: &[RoleName]) -> AppResult<()> {
    match requested.iter().find(|role| !allowed.contains(role)) {
        Some(role) => Err(AppError::InvalidRole(format!("Role '{}' cannot be assigned here", role))),
        None => Ok(()),
    }
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Create JWT token for a user
    pub fn issue_token(&self, user: &User) -> AppResult<String> {
        UserClaims::for_user(user, self.config.jwt_expiration_hours)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Self-registration; only self-assignable roles are accepted
    pub async fn sign_up(&self, data: &CreateUser) -> AppResult<(User, String)> {
        check_roles(&data.roles, RoleName::SELF_ASSIGNABLE)?;
        let user = self.insert_user(data).await?;
        let token = self.issue_token(&user)?;
        tracing::info!("User {} signed up", user.username);
        Ok((user, token))
    }

    /// Unknown usernames and wrong passwords fail identically
    pub async fn sign_in(&self, username: &str, password: &str) -> AppResult<(User, String)> {
        let found = self.repository.users.get_by_username(username).await?;
        check_credentials(found.as_ref().map(|u| u.password.as_str()), password)?;
        let user = found.ok_or(AppError::InvalidCredentials)?;

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    pub async fn profile(&self, user_id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(user_id).await
    }

    /// Users may change their own username, email and password, never their roles
    pub async fn update_profile(&self, user_id: i32, data: &UpdateProfile) -> AppResult<User> {
        if data.roles.is_some() {
            return Err(AppError::InvalidRole(
                "You cannot assign roles to yourself".to_string(),
            ));
        }

        let password_hash = data.password.as_deref().map(hash_password).transpose()?;
        let changes = UserChanges {
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash,
        };
        self.apply_changes(user_id, &changes, None).await
    }

    /// Administrator creation: any role, no token
    pub async fn create_by_admin(&self, data: &CreateUser) -> AppResult<User> {
        check_roles(&data.roles, RoleName::ADMIN_ASSIGNABLE)?;
        let user = self.insert_user(data).await?;
        tracing::info!("User {} created by an administrator", user.username);
        Ok(user)
    }

    /// Administrators may change identity fields and roles, never passwords
    pub async fn update_by_admin(&self, id: i32, data: &UpdateUserByAdmin) -> AppResult<User> {
        if data.password.is_some() {
            return Err(AppError::Validation(
                "You cannot change another user's password".to_string(),
            ));
        }
        if let Some(ref roles) = data.roles {
            check_roles(roles, RoleName::ADMIN_ASSIGNABLE)?;
        }

        let changes = UserChanges {
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: None,
        };
        self.apply_changes(id, &changes, data.roles.as_deref()).await
    }

    /// Replace the full role set of a user
    pub async fn assign_roles(&self, id: i32, roles: &[RoleName]) -> AppResult<User> {
        check_roles(roles, RoleName::ADMIN_ASSIGNABLE)?;
        self.apply_changes(id, &UserChanges::default(), Some(roles)).await
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.users.soft_delete(id).await
    }

    /// Create the configured administrator unless the username is already in use
    pub async fn ensure_admin(&self, admin: &BootstrapAdminConfig) -> AppResult<()> {
        if self
            .repository
            .users
            .get_by_username(&admin.username)
            .await?
            .is_some()
        {
            tracing::debug!("Bootstrap administrator {} already exists", admin.username);
            return Ok(());
        }

        let data = CreateUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password: admin.password.clone(),
            roles: vec![RoleName::Admin],
        };
        self.insert_user(&data).await?;
        tracing::info!("Created bootstrap administrator {}", admin.username);
        Ok(())
    }

    async fn ensure_unique(&self, username: Option<&str>, email: Option<&str>, exclude_id: Option<i32>) -> AppResult<()> {
        if let Some(username) = username {
            if self.repository.users.username_taken(username, exclude_id).await? {
                return Err(AppError::Conflict("Username already in use".to_string()));
            }
        }
        if let Some(email) = email {
            if self.repository.users.email_taken(email, exclude_id).await? {
                return Err(AppError::Conflict("Email already in use".to_string()));
            }
        }
        Ok(())
    }

    async fn insert_user(&self, data: &CreateUser) -> AppResult<User> {
        self.ensure_unique(Some(&data.username), Some(&data.email), None)
            .await?;
        let password_hash = hash_password(&data.password)?;

        let mut tx = self.repository.begin().await?;
        let id = self
            .repository
            .users
            .insert(&mut *tx, &data.username, &data.email, &password_hash)
            .await?;
        self.repository
            .users
            .replace_roles(&mut *tx, id, &data.roles)
            .await?;
        let user = self.reload(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn apply_changes(
        &self,
        id: i32,
        changes: &UserChanges,
        roles: Option<&[RoleName]>,
    ) -> AppResult<User> {
        self.repository.users.get_by_id(id).await?;
        self.ensure_unique(changes.username.as_deref(), changes.email.as_deref(), Some(id))
            .await?;

        let mut tx = self.repository.begin().await?;
        self.repository.users.update(&mut *tx, id, changes).await?;
        if let Some(roles) = roles {
            self.repository.users.replace_roles(&mut *tx, id, roles).await?;
        }
        let user = self.reload(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn reload(&self, conn: &mut sqlx::PgConnection, id: i32) -> AppResult<User> {
        self.repository
            .users
            .find_in(conn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("Str0ng!pass").unwrap();
        assert_ne!(hash, "Str0ng!pass");
        assert!(verify_password(&hash, "Str0ng!pass").unwrap());
        assert!(!verify_password(&hash, "Wr0ng!pass").unwrap());
    }

    #[test]
    fn test_corrupt_hash_is_internal_error() {
        assert!(matches!(
            verify_password("not-a-phc-string", "x"),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_unknown_user_still_verifies_a_hash() {
        assert!(UNKNOWN_USER_HASH.is_some());
        assert!(matches!(
            check_credentials(None, "Str0ng!pass"),
            Err(AppError::InvalidCredentials)
        ));

        let hash = hash_password("Str0ng!pass").unwrap();
        assert!(check_credentials(Some(&hash), "Str0ng!pass").is_ok());
        assert!(matches!(
            check_credentials(Some(&hash), "Wr0ng!pass"),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_self_registration_cannot_request_admin() {
        assert!(check_roles(&[RoleName::Employee], RoleName::SELF_ASSIGNABLE).is_ok());
        assert!(check_roles(&[], RoleName::SELF_ASSIGNABLE).is_ok());
        assert!(matches!(
            check_roles(&[RoleName::Admin], RoleName::SELF_ASSIGNABLE),
            Err(AppError::InvalidRole(_))
        ));
    }

    #[test]
    fn test_admin_can_assign_every_role() {
        assert!(check_roles(&[RoleName::Admin, RoleName::Employee], RoleName::ADMIN_ASSIGNABLE).is_ok());
    }
}
