use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::error::{AppError, FieldError};

/// JSON body that has been deserialized and then checked with `validator`.
/// Both kinds of failure become a 400 carrying field-level messages.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::field("body", "body", rejection.body_text()))?;

        value.validate().map_err(|errors| AppError::Validation(field_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten `validator` output into the API's error list, ordered by field.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let msg = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field));
                FieldError::new(field.to_string(), "body", msg)
            })
        })
        .collect()
}

/// Parse a path identifier, normalizing it to the stored form.
pub fn parse_id(param: &str, raw: &str) -> Result<String, AppError> {
    Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| AppError::field(param, "params", format!("{} should be a valid id", param)))
}
