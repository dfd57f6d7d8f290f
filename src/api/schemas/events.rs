use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub search: Option<String>,
}
