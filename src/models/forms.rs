use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Role, Service, User};
use crate::errors::ValidationError;

const DEFAULT_BIO: &str = "No bio added yet";
const NOT_PROVIDED: &str = "Not provided";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

#[derive(Debug, Deserialize, Default)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(LoginRequest { email: email.to_string(), password: self.password.clone() })
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl RegisterForm {
    /// Earners must pick a category before anything else is checked.
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        let role = match self.role.as_str() {
            "earner" => Some(Role::Earner),
            "buyer" => Some(Role::Buyer),
            _ => None,
        };

        let category = match role {
            Some(Role::Earner) => {
                let category = self.category.as_deref().unwrap_or("").trim();
                if category.is_empty() {
                    return Err(ValidationError::MissingServiceCategory);
                }
                Some(category.to_string())
            }
            _ => None,
        };

        let name = self.name.trim();
        let email = self.email.trim();
        let phone = self.phone.trim();
        let role = match role {
            Some(role) if !name.is_empty() && !email.is_empty() && !phone.is_empty() && !self.password.is_empty() => role,
            _ => return Err(ValidationError::MissingRequired),
        };

        Ok(RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password: self.password.clone(),
            role,
            category,
        })
    }
}

/// Raw values of the service editor, exactly as typed.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ServiceForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub delivery: String,
    #[serde(default)]
    pub image: String,
}

/// Service fields that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceFields {
    pub title: String,
    pub category: String,
    pub description: String,
    pub price: i64,
    pub delivery: i64,
    pub image: Option<String>,
}

fn parse_at_least(raw: &str, min: i64) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|n| *n >= min)
}

impl ServiceForm {
    /// Pre-fill values for editing an existing record.
    pub fn from_service(service: &Service) -> Self {
        Self {
            title: service.title.clone(),
            category: service.category.clone(),
            description: service.description.clone(),
            price: service.price.to_string(),
            delivery: service.delivery.to_string(),
            image: service.image.clone().unwrap_or_default(),
        }
    }

    /// Checks fields in form order and reports the first failure.
    pub fn validate(&self) -> Result<ServiceFields, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        let price = parse_at_least(&self.price, 100).ok_or(ValidationError::InvalidPrice)?;
        let delivery = parse_at_least(&self.delivery, 1).ok_or(ValidationError::InvalidDelivery)?;
        let image = Some(self.image.trim()).filter(|s| !s.is_empty()).map(str::to_string);

        Ok(ServiceFields {
            title: title.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            price,
            delivery,
            image,
        })
    }
}

fn or_fallback(value: &str, fallback: &str) -> String {
    let chosen = if value.is_empty() { fallback } else { value };
    chosen.to_string()
}

/// Raw values of the profile editor.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub avatar: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone().unwrap_or_default(),
            email: user.email.clone().unwrap_or_default(),
            bio: user.bio.clone().unwrap_or_default(),
            skills: user.skills.join(", "),
            location: user.location.clone().unwrap_or_default(),
            avatar: user.avatar.clone().unwrap_or_default(),
        }
    }

    /// Produces the updated user, or every field error found.
    pub fn apply(&self, user: &User, now: DateTime<Utc>) -> Result<User, Vec<ValidationError>> {
        let name = self.name.trim();
        let email = self.email.trim();

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(ValidationError::MissingName);
        }
        if !EMAIL_RE.is_match(email) {
            errors.push(ValidationError::InvalidEmail);
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let bio = self.bio.trim();
        let location = self.location.trim();
        let avatar = self.avatar.trim();
        let skills = self
            .skills
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let mut updated = user.clone();
        updated.name = Some(name.to_string());
        updated.email = Some(email.to_string());
        updated.bio = Some(or_fallback(bio, DEFAULT_BIO));
        updated.skills = skills;
        updated.location = Some(or_fallback(location, NOT_PROVIDED));
        if !avatar.is_empty() {
            updated.avatar = Some(avatar.to_string());
        }
        updated.extra.insert("updatedAt".into(), Value::String(now.to_rfc3339()));
        Ok(updated)
    }
}

/// Body of the delete confirmation dialog.
#[derive(Debug, Deserialize, Default)]
pub struct DeleteForm {
    pub confirm: Option<String>,
}

impl DeleteForm {
    pub fn confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("yes")
    }
}
