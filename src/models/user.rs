//! User model, roles and JWT claims

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// Role names stored in the `roles` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Admin,
    Employee,
}

impl RoleName {
    /// Roles a user may pick when registering themselves
    pub const SELF_ASSIGNABLE: &'static [RoleName] = &[RoleName::Employee];

    /// Roles an administrator may grant
    pub const ADMIN_ASSIGNABLE: &'static [RoleName] = &[RoleName::Employee, RoleName::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Employee => "employee",
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoleName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(RoleName::Admin),
            "employee" => Ok(RoleName::Employee),
            _ => Err(AppError::InvalidRole(format!("Unknown role: {}", s))),
        }
    }
}

/// Internal row structure for user queries (roles aggregated as text[])
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password: row.password,
            // Unknown names can only come from manual edits of the roles table
            roles: row.roles.iter().filter_map(|r| r.parse().ok()).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password: String,
    pub roles: Vec<RoleName>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.contains(&role)
    }
}

static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());
static LOWERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").unwrap());
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").unwrap());
static SPECIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[!@#$%^&*]").unwrap());

/// Password policy: upper, lower, digit and one of `!@#$%^&*`
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let rules: [(&Lazy<Regex>, &'static str); 4] = [
        (&UPPERCASE, "Password must contain at least one uppercase letter"),
        (&LOWERCASE, "Password must contain at least one lowercase letter"),
        (&DIGIT, "Password must contain at least one digit"),
        (&SPECIAL, "Password must contain at least one of !@#$%^&*"),
    ];

    for (pattern, message) in rules {
        if !pattern.is_match(password) {
            let mut err = ValidationError::new("password_strength");
            err.message = Some(message.into());
            return Err(err);
        }
    }
    Ok(())
}

/// Registration / admin creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 255, message = "Username is required (max 255 characters)"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,
    #[serde(default)]
    pub roles: Vec<RoleName>,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignIn {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Update own profile request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(length(min = 1, max = 255, message = "Username cannot be empty (max 255 characters)"))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password_strength")
    )]
    pub password: Option<String>,
    /// Always rejected: users cannot grant themselves roles
    pub roles: Option<Vec<RoleName>>,
}

/// Update another user (admin only)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserByAdmin {
    #[validate(length(min = 1, max = 255, message = "Username cannot be empty (max 255 characters)"))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// Replaces the full role set
    pub roles: Option<Vec<RoleName>>,
    /// Always rejected: administrators cannot change other users' passwords
    pub password: Option<String>,
}

/// Role set replacement request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignRoles {
    pub roles: Vec<RoleName>,
}

/// Fields written by a user update, after policy checks
#[derive(Debug, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub roles: Vec<RoleName>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn for_user(user: &User, lifetime_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.username.clone(),
            user_id: user.id,
            roles: user.roles.clone(),
            exp: now + (lifetime_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&RoleName::Admin)
    }

    /// Require administrator privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }

    /// Require inventory staff (employee or administrator)
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_admin() || self.roles.contains(&RoleName::Employee) {
            Ok(())
        } else {
            Err(AppError::Authorization("Employee role required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(roles: Vec<RoleName>) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "alice".to_string(),
            user_id: 12,
            roles,
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let token = claims(vec![RoleName::Employee]).create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 12);
        assert_eq!(parsed.roles, vec![RoleName::Employee]);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = claims(vec![]).create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_role_guards() {
        let employee = claims(vec![RoleName::Employee]);
        assert!(employee.require_staff().is_ok());
        assert!(matches!(employee.require_admin(), Err(AppError::Authorization(_))));

        let admin = claims(vec![RoleName::Admin]);
        assert!(admin.require_staff().is_ok());
        assert!(admin.require_admin().is_ok());

        assert!(claims(vec![]).require_staff().is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password_strength("Str0ng!pass").is_ok());
        assert!(validate_password_strength("weak0!pass").is_err());
        assert!(validate_password_strength("NOLOWER0!").is_err());
        assert!(validate_password_strength("NoDigit!!").is_err());
        assert!(validate_password_strength("NoSpecial0").is_err());
    }

    #[test]
    fn test_create_user_validation() {
        let user = CreateUser {
            username: "alice".to_string(),
            email: "not-an-email".to_string(),
            password: "Str0ng!pass".to_string(),
            roles: vec![],
        };
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_role_names_parse() {
        assert_eq!("Admin".parse::<RoleName>().unwrap(), RoleName::Admin);
        assert!(matches!("root".parse::<RoleName>(), Err(AppError::InvalidRole(_))));
    }

    #[test]
    fn test_user_row_drops_unknown_roles() {
        let user = User::from(UserRow {
            id: 1,
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "hash".to_string(),
            roles: vec!["employee".to_string(), "legacy".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        assert_eq!(user.roles, vec![RoleName::Employee]);
        assert!(user.has_role(RoleName::Employee));
        assert!(serde_json::to_value(&user).unwrap().get("password").is_none());
    }
}
