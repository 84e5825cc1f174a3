//! Input validation. Each validator reports at most one error per field,
//! in field order.

use serde::Serialize;

use crate::domain::types::{CharacterClass, Faction, Race};

pub const MAX_FIELD_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must be at most 255 characters")]
    TooLong(&'static str),
    #[error("enter a valid email address")]
    InvalidEmail,
    #[error("{0} must be a whole number")]
    NotANumber(&'static str),
    #[error("\"{0}\" is not a valid faction")]
    UnknownFaction(String),
    #[error("\"{0}\" is not a valid race")]
    UnknownRace(String),
    #[error("\"{0}\" is not a valid class")]
    UnknownClass(String),
    #[error("{race} cannot be a {class}. Available classes: {}", available(.race))]
    IncompatibleClass { race: Race, class: CharacterClass },
}

fn available(race: &Race) -> String {
    race.allowed_classes()
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing(field) | Self::TooLong(field) | Self::NotANumber(field) => field,
            Self::InvalidEmail => "email",
            Self::UnknownFaction(_) => "faction",
            Self::UnknownRace(_) => "race",
            Self::UnknownClass(_) | Self::IncompatibleClass { .. } => "character_class",
        }
    }
}

/// Wire form used in error bodies.
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl From<&ValidationError> for FieldError {
    fn from(e: &ValidationError) -> Self {
        Self {
            field: e.field(),
            message: e.to_string(),
        }
    }
}

fn required<'a>(
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::Missing(field)),
    }
}

fn bounded<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.chars().count() > MAX_FIELD_LEN {
        Err(ValidationError::TooLong(field))
    } else {
        Ok(value)
    }
}

/// `local@domain.tld` with no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub fn validate_registration(
    username: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<Registration, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let username = required("username", username)
        .and_then(|v| bounded("username", v))
        .map_err(|e| errors.push(e))
        .ok();
    let email = required("email", email)
        .and_then(|v| bounded("email", v))
        .and_then(|v| {
            if is_valid_email(v) {
                Ok(v)
            } else {
                Err(ValidationError::InvalidEmail)
            }
        })
        .map_err(|e| errors.push(e))
        .ok();
    let password = validate_password(password).map_err(|e| errors.push(e)).ok();

    match (username, email, password) {
        (Some(username), Some(email), Some(password)) if errors.is_empty() => Ok(Registration {
            username: username.to_owned(),
            email: email.to_owned(),
            password,
        }),
        _ => Err(errors),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Login uses the same password rule as registration, so any password that
/// could be registered can also be submitted.
pub fn validate_login(
    email: Option<&str>,
    password: Option<&str>,
) -> Result<Credentials, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let email = required("email", email).map_err(|e| errors.push(e)).ok();
    let password = validate_password(password).map_err(|e| errors.push(e)).ok();

    match (email, password) {
        (Some(email), Some(password)) => Ok(Credentials {
            email: email.to_owned(),
            password,
        }),
        _ => Err(errors),
    }
}

/// Passwords are not trimmed; only an absent or empty password is refused.
pub fn validate_password(password: Option<&str>) -> Result<String, ValidationError> {
    match password {
        Some(p) if !p.is_empty() => Ok(p.to_owned()),
        _ => Err(ValidationError::Missing("password")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterChoice {
    pub name: Option<String>,
    pub faction: Faction,
    pub race: Race,
    pub character_class: CharacterClass,
}

pub fn validate_character(
    name: Option<&str>,
    faction: Option<&str>,
    race: Option<&str>,
    character_class: Option<&str>,
) -> Result<CharacterChoice, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => bounded("name", n)
            .map(|n| Some(n.to_owned()))
            .map_err(|e| errors.push(e))
            .unwrap_or(None),
        None => None,
    };
    let faction = required("faction", faction)
        .and_then(|v| {
            v.parse::<Faction>()
                .map_err(|_| ValidationError::UnknownFaction(v.to_owned()))
        })
        .map_err(|e| errors.push(e))
        .ok();
    let race = required("race", race)
        .and_then(|v| v.parse::<Race>().map_err(|_| ValidationError::UnknownRace(v.to_owned())))
        .map_err(|e| errors.push(e))
        .ok();
    let class = required("character_class", character_class)
        .and_then(|v| {
            v.parse::<CharacterClass>()
                .map_err(|_| ValidationError::UnknownClass(v.to_owned()))
        })
        .map_err(|e| errors.push(e))
        .ok();

    if let (Some(race), Some(class)) = (race, class) {
        if !race.allows(class) {
            errors.push(ValidationError::IncompatibleClass { race, class });
        }
    }

    match (faction, race, class) {
        (Some(faction), Some(race), Some(character_class)) if errors.is_empty() => {
            Ok(CharacterChoice {
                name,
                faction,
                race,
                character_class,
            })
        }
        _ => Err(errors),
    }
}
