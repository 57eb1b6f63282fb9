use thiserror::Error;

/// Form validation failures. The display text is what the user sees.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Service title is required")]
    MissingTitle,

    #[error("Please select a category")]
    MissingCategory,

    #[error("Service description is required")]
    MissingDescription,

    #[error("Price must be numeric and at least ₹100")]
    InvalidPrice,

    #[error("Delivery days must be integer and at least 1")]
    InvalidDelivery,

    #[error("Service with same title and price already exists")]
    DuplicateService,

    #[error("Name is required")]
    MissingName,

    #[error("Valid email is required")]
    InvalidEmail,

    #[error("Please fill in all required fields")]
    MissingRequired,

    #[error("Please select a service category")]
    MissingServiceCategory,

    #[error("Please enter email and password")]
    MissingCredentials,
}

impl ValidationError {
    /// Form field the message belongs to, for errors shown inline.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingName => Some("name"),
            ValidationError::InvalidEmail => Some("email"),
            _ => None,
        }
    }
}
