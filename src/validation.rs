//! Request validation for payloads that are about to be stored.
//!
//! Handlers take a [`Valid<T>`] instead of `Json<T>`; the extractor parses
//! the body, runs every rule of [`Validate`] and rejects the request with
//! all collected field errors before the handler is ever called.

use std::collections::BTreeMap;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::{error::AppError, models::Todo};

const MIN_NAME_LEN: usize = 3;

/// Field name to messages, in stable key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);
impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

impl Todo {
    /// Checks the creation rules against `now`; every rule runs even when an
    /// earlier one already failed.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.due_date <= now {
            errors.add("DueDate", "Due date must be in the future");
        }
        if self.name.chars().count() < MIN_NAME_LEN {
            errors.add("Name", "Name must be at least 3 characters long");
        }
        errors.into_result()
    }
}

impl Validate for Todo {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.validate_at(Utc::now())
    }
}

/// JSON body that already passed [`Validate`].
#[derive(Debug, Clone)]
pub struct Valid<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Valid<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate().map_err(AppError::Validation)?;
        Ok(Valid(value))
    }
}
