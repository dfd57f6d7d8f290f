/// Role value the upstream assigns to gate staff accounts.
pub const SCANNER_ROLE: &str = "scanner";

/// Token triple issued by the upstream backend for one authenticated user.
///
/// Persisted browser-side as three independent cookies with independent
/// expirations; the triple is only ever written as a unit, but a client may
/// still observe one cookie expired while another lives on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user_role: String,
}
