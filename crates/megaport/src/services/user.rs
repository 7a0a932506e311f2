//! Company user management

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{Error, Result};

/// Roles a user can hold within a company
pub const USER_POSITIONS: [&str; 6] = [
    "Company Admin",
    "Technical Admin",
    "Technical Contact",
    "Finance",
    "Financial Contact",
    "Read Only",
];

pub fn validate_position(position: &str) -> Result<()> {
    if USER_POSITIONS.contains(&position) {
        Ok(())
    } else {
        Err(Error::InvalidUserPosition(position.to_string()))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, deserialize_with = "crate::types::null_as_default", alias = "employmentId")]
    pub employee_id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub party_id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub person_id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub person_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub mobile: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub position: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub security_roles: Vec<String>,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_id: i64,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub notification_enabled: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub invitation_pending: bool,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub mfa_enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    pub active: bool,
}

impl CreateUserRequest {
    fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(Error::Validation("email is required".to_string()));
        }
        validate_position(&self.position)
    }
}

/// Unset fields are left unchanged
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_enabled: Option<bool>,
}

/// An audit entry for a user action
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub person_uid: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub login_name: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub user_type: String,
    #[serde(default, deserialize_with = "crate::types::null_as_default")]
    pub description: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub create_date: Option<DateTime<Utc>>,
}

pub struct UserManagementService {
    client: Client,
}

impl UserManagementService {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn list_company_users(&self) -> Result<Vec<User>> {
        let users: Option<Vec<User>> = self.client.get("/v2/employment", &[]).await?;
        Ok(users.unwrap_or_default())
    }

    pub async fn get_user(&self, employee_id: i64) -> Result<User> {
        let user: Option<User> = self
            .client
            .get(&format!("/v2/employee/{}", employee_id), &[])
            .await?;
        user.ok_or(Error::UserNotFound(employee_id))
    }

    pub async fn create_user(&self, req: CreateUserRequest) -> Result<User> {
        req.validate()?;
        let user: User = self.client.post("/v2/employment", &req).await?;
        tracing::info!(employee_id = user.employee_id, "User created");
        Ok(user)
    }

    pub async fn update_user(&self, employee_id: i64, req: UpdateUserRequest) -> Result<()> {
        if let Some(position) = &req.position {
            validate_position(position)?;
        }
        let _: Option<serde_json::Value> = self
            .client
            .put(&format!("/v2/employee/{}", employee_id), &req)
            .await?;
        Ok(())
    }

    pub async fn delete_user(&self, employee_id: i64) -> Result<()> {
        self.client
            .send(Method::DELETE, &format!("/v2/employee/{}", employee_id))
            .await?;
        tracing::info!(employee_id, "User deleted");
        Ok(())
    }

    /// Activity for the whole company, or for one person
    pub async fn get_user_activity(&self, person_uid: Option<&str>) -> Result<Vec<UserActivity>> {
        let query: Vec<(&str, String)> = person_uid
            .map(|uid| vec![("personUid", uid.to_string())])
            .unwrap_or_default();
        let activity: Option<Vec<UserActivity>> =
            self.client.get("/v3/users/activity", &query).await?;
        Ok(activity.unwrap_or_default())
    }
}
