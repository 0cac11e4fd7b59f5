//! Wire types for the content API.
//!
//! Content documents themselves stay as `serde_json::Value`; their shape
//! varies per content type. Only the fixed-shape endpoints get structs.

use serde::{Deserialize, Serialize};

/// `POST /auth/login` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /auth/login` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
}

/// `POST /auth/change-password` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Response of both upload endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub url: String,
}

/// Where an uploaded file should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadTarget {
    /// `POST /<resource>/upload`, e.g. `hero` or `home-business`.
    Resource(String),
    /// `POST /upload?section=<name>`.
    Section(String),
}

impl UploadTarget {
    /// Path relative to the API base URL.
    pub fn path(&self) -> String {
        match self {
            UploadTarget::Resource(resource) => format!("{}/upload", resource.trim_matches('/')),
            UploadTarget::Section(_) => "upload".to_string(),
        }
    }

    /// Query parameters of the upload request.
    pub fn query(&self) -> Vec<(&'static str, &str)> {
        match self {
            UploadTarget::Resource(_) => Vec::new(),
            UploadTarget::Section(section) => vec![("section", section.as_str())],
        }
    }
}

/// `GET /dashboard/stats` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub news_count: u64,
    pub jobs_count: u64,
    pub team_count: u64,
    pub recent_activity: Vec<Activity>,
}

/// One row of the dashboard's recent-activity table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Activity {
    pub action: String,
    pub source: String,
    pub time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_paths() {
        assert_eq!(UploadTarget::Resource("hero".into()).path(), "hero/upload");
        assert_eq!(UploadTarget::Resource("/home-business/".into()).path(), "home-business/upload");
        assert!(UploadTarget::Resource("hero".into()).query().is_empty());

        let section = UploadTarget::Section("expertise".into());
        assert_eq!(section.path(), "upload");
        assert_eq!(section.query(), vec![("section", "expertise")]);
    }

    #[test]
    fn test_dashboard_stats_tolerates_missing_fields() {
        let stats: DashboardStats = serde_json::from_str(r#"{"newsCount": 4}"#).unwrap();
        assert_eq!(stats.news_count, 4);
        assert_eq!(stats.jobs_count, 0);
        assert!(stats.recent_activity.is_empty());
    }

    #[test]
    fn test_change_password_is_camel_case() {
        let body = serde_json::to_value(ChangePasswordRequest {
            current_password: "old".into(),
            new_password: "new".into(),
        })
        .unwrap();
        assert_eq!(body["currentPassword"], "old");
        assert_eq!(body["newPassword"], "new");
    }
}
