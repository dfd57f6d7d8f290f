use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestOtp {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtp {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Logout {
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user_role: String,
}
