use serde::{Deserialize, Deserializer};

/// `{ "results": [...] }`. Some handlers spell it `result`, and Go
/// encodes an empty slice as `null`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ResultsEnvelope<T> {
    #[serde(alias = "result", default = "Vec::new", deserialize_with = "null_as_empty")]
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct MessageEnvelope<T> {
    pub message: T,
}

#[derive(Debug, Deserialize)]
pub struct TokenEnvelope {
    pub token: String,
}

/// Error payloads carry either `message` or `error`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

/// `/users/userId` has answered both `"1"` and `123`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Number(i64),
    Text(String),
}

impl IdValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            IdValue::Number(n) => Some(*n),
            IdValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
