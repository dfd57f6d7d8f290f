use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RedeemTicket {
    pub code: String,
}
