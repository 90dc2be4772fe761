//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, InvalidIdError};

/// Parse an identifier taken from a path segment or query parameter.
///
/// Malformed ids become `400 invalid_request` with the offending field and
/// value in the details rather than a bare routing 404.
pub(crate) fn parse_id<T>(field: &str, raw: &str) -> Result<T, Error>
where
    T: FromStr<Err = InvalidIdError>,
{
    raw.parse::<T>().map_err(|error| {
        Error::invalid_request(error.to_string()).with_details(json!({
            "field": field,
            "value": raw,
            "code": "invalid_uuid",
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, MaterialId};
    use rstest::rstest;

    #[rstest]
    fn parses_valid_ids() {
        let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let id: MaterialId = parse_id("id", raw).expect("valid id");
        assert_eq!(id.to_string(), raw);
    }

    #[rstest]
    fn malformed_ids_name_the_field() {
        let error = parse_id::<MaterialId>("materialId", "nope").expect_err("malformed id");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({"field": "materialId", "value": "nope", "code": "invalid_uuid"}))
        );
    }
}
