use serde::{Deserialize, Serialize};

/// Missing fields decode to their zero value. Capitalised field names are
/// accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(alias = "Id", alias = "ID")]
    pub id: String,
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "Age")]
    pub age: i64,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, age: i64) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            age,
        }
    }
}

/// Users in insertion order, as persisted in the JSON array.
pub type UserList = Vec<User>;

pub fn position_by_id(users: &[User], id: &str) -> Option<usize> {
    users.iter().position(|u| u.id == id)
}

pub fn find_by_id<'a>(users: &'a [User], id: &str) -> Option<&'a User> {
    users.iter().find(|u| u.id == id)
}
