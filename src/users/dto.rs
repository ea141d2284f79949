use serde::Deserialize;

/// Body of user create and update.
#[derive(Debug, Default, Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}
