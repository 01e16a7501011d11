use axum::extract::FromRequest;
use serde::{Deserialize, Deserializer};

use crate::error::Error;

/// `axum::Json` with rejections routed through [`Error`], so malformed bodies
/// come back as 400 instead of axum's 422.
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// Deserializes an explicit `null` the same way as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
