//! Editor-submission validation.

use thiserror::Error;

use super::model::{CareerInput, FaqInput, ProductInput};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("contentId is required")]
    MissingContentId,
    #[error("product '{0}': name is required")]
    MissingName(String),
    #[error("career '{0}': title is required")]
    MissingTitle(String),
    #[error("faq '{0}': question is required")]
    MissingQuestion(String),
    #[error("faq '{0}': answer is required")]
    MissingAnswer(String),
}

fn require_content_id(content_id: &str) -> Result<&str, ValidationError> {
    let id = content_id.trim();
    if id.is_empty() {
        return Err(ValidationError::MissingContentId);
    }
    Ok(id)
}

pub fn validate_product_input(input: &ProductInput) -> Result<(), ValidationError> {
    let id = require_content_id(&input.content_id)?;
    if input.name.trim().is_empty() {
        return Err(ValidationError::MissingName(id.to_string()));
    }
    Ok(())
}

pub fn validate_career_input(input: &CareerInput) -> Result<(), ValidationError> {
    let id = require_content_id(&input.content_id)?;
    if input.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle(id.to_string()));
    }
    Ok(())
}

pub fn validate_faq_input(input: &FaqInput) -> Result<(), ValidationError> {
    let id = require_content_id(&input.content_id)?;
    if input.question.trim().is_empty() {
        return Err(ValidationError::MissingQuestion(id.to_string()));
    }
    if input.answer.trim().is_empty() {
        return Err(ValidationError::MissingAnswer(id.to_string()));
    }
    Ok(())
}
