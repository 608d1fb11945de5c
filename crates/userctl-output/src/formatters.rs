use userctl_types::{User, UserList};

pub fn format_already_exists(id: &str) -> String {
    format!("Item with id {} already exists", id)
}

pub fn format_not_found(id: &str) -> String {
    format!("Item with id {} not found", id)
}

/// Compact JSON, the same encoding the store file uses.
pub fn format_user(user: &User) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(user)
}

pub fn format_user_list(users: &UserList) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(users)
}
