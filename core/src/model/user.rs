use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Consultant,
    Manager,
}

impl Role {
    pub fn other(&self) -> Self {
        match self {
            Role::Consultant => Role::Manager,
            Role::Manager => Role::Consultant,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub title: String,
    #[serde(default)]
    pub department: Option<String>,
}

/// Built-in demo accounts.
pub fn demo_users() -> Vec<UserProfile> {
    vec![
        UserProfile {
            id: "user-1".to_string(),
            full_name: "Paul Schneider".to_string(),
            email: "paul@lux-as.com".to_string(),
            role: Role::Consultant,
            title: "Senior Consultant".to_string(),
            department: Some("IT Consulting".to_string()),
        },
        UserProfile {
            id: "user-2".to_string(),
            full_name: "Korian Weber".to_string(),
            email: "korian@lux-as.com".to_string(),
            role: Role::Manager,
            title: "Team Manager".to_string(),
            department: Some("IT Consulting".to_string()),
        },
    ]
}

pub fn find_demo_user(email: &str) -> Option<UserProfile> {
    demo_users()
        .into_iter()
        .find(|u| u.email.eq_ignore_ascii_case(email.trim()))
}

pub fn demo_user_for(role: Role) -> Option<UserProfile> {
    demo_users().into_iter().find(|u| u.role == role)
}
