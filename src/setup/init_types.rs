use serde::Deserialize;

/// Trip description as written in the input JSON file.
///
/// `leave_time` and `return_time` are RFC 3339 timestamps or `HH:MM`
/// (today, local time).
#[derive(Debug, Clone, Deserialize)]
pub struct TripInput {
    pub addresses: Vec<String>,
    pub start_index: usize,
    pub end_index: usize,
    pub leave_time: String,
    pub return_time: String,
}
