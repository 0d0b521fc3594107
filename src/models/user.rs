use serde::{Deserialize, Serialize};

/// A platform account visible to administrators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub status: UserStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            UserRole::Admin => UserRole::User,
            UserRole::User => UserRole::Admin,
        }
    }
}

impl UserStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Inactive,
            UserStatus::Inactive => UserStatus::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_and_status_serialize_lowercase() {
        let user = User {
            id: 1,
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            role: UserRole::Admin,
            status: UserStatus::Inactive,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["role"], "admin");
        assert_eq!(json["status"], "inactive");
    }

    #[test]
    fn unknown_free_text_fields_default() {
        let user: User =
            serde_json::from_str(r#"{"id":2,"name":"Al","email":"al@example.com"}"#).unwrap();
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.status, UserStatus::Active);
    }
}
