use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered account. `password` is the stored hash, never plaintext.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// What a token may be used for. Session tokens authenticate bearer requests.
/// Reset tokens only authorize a password change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Session,
    PasswordReset,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::PasswordReset => "password_reset",
        }
    }
}

impl FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session" => Ok(Self::Session),
            "password_reset" => Ok(Self::PasswordReset),
            other => Err(format!("unknown token kind: {other}")),
        }
    }
}

/// Single-use, time-bounded credential.
#[derive(Debug, Clone)]
pub struct Token {
    pub id: i32,
    pub token: String,
    pub kind: TokenKind,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub user_id: i32,
    pub is_used: bool,
}

impl Token {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    pub fn is_valid(&self) -> bool {
        !self.is_used && !self.is_expired()
    }
}

#[derive(Debug, Clone)]
pub struct NewToken {
    pub token: String,
    pub kind: TokenKind,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub user_id: i32,
}

/// Session token lifetime in days.
pub const SESSION_TOKEN_TTL_DAYS: i64 = 7;

/// Password reset token lifetime in days.
pub const RESET_TOKEN_TTL_DAYS: i64 = 1;

// ── Character enumerations ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    #[serde(rename = "The Crusaders")]
    Crusaders,
    #[serde(rename = "The Moors")]
    Moors,
}

impl Faction {
    pub const ALL: [Faction; 2] = [Self::Crusaders, Self::Moors];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crusaders => "The Crusaders",
            Self::Moors => "The Moors",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Race {
    Castilian,
    Aragonese,
    Leonese,
    Andalusian,
    Berber,
    Mashriqi,
}

impl Race {
    pub const ALL: [Race; 6] = [
        Self::Castilian,
        Self::Aragonese,
        Self::Leonese,
        Self::Andalusian,
        Self::Berber,
        Self::Mashriqi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Castilian => "Castilian",
            Self::Aragonese => "Aragonese",
            Self::Leonese => "Leonese",
            Self::Andalusian => "Andalusian",
            Self::Berber => "Berber",
            Self::Mashriqi => "Mashriqi",
        }
    }

    /// Classes this race may take.
    pub fn allowed_classes(self) -> &'static [CharacterClass] {
        use CharacterClass::*;
        match self {
            Self::Castilian => &[Knight, Arbalist],
            Self::Aragonese => &[Knight, Arbalist, Skirmisher, Alchemist],
            Self::Leonese => &[Knight, Arbalist, MysticPoet],
            Self::Andalusian => &[Skirmisher, BladeDancer, Alchemist, MysticPoet],
            Self::Berber => &[Arbalist, Skirmisher, BladeDancer],
            Self::Mashriqi => &[BladeDancer, Alchemist, MysticPoet],
        }
    }

    pub fn allows(self, class: CharacterClass) -> bool {
        self.allowed_classes().contains(&class)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterClass {
    Knight,
    Arbalist,
    Skirmisher,
    #[serde(rename = "Blade Dancer")]
    BladeDancer,
    Alchemist,
    #[serde(rename = "Mystic Poet")]
    MysticPoet,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 6] = [
        Self::Knight,
        Self::Arbalist,
        Self::Skirmisher,
        Self::BladeDancer,
        Self::Alchemist,
        Self::MysticPoet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Knight => "Knight",
            Self::Arbalist => "Arbalist",
            Self::Skirmisher => "Skirmisher",
            Self::BladeDancer => "Blade Dancer",
            Self::Alchemist => "Alchemist",
            Self::MysticPoet => "Mystic Poet",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Faction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown faction: {s}"))
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Race {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown race: {s}"))
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown class: {s}"))
    }
}

// ── Character ────────────────────────────────────────────────────────────────

/// A user's game persona.
#[derive(Debug, Clone)]
pub struct Character {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub faction: Faction,
    pub race: Race,
    pub character_class: CharacterClass,
    pub level: i32,
    pub experience: i32,
    pub gold: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Character {
    pub fn summary(&self) -> CharacterSummary {
        CharacterSummary {
            name: self.name.clone(),
            faction: self.faction,
            race: self.race,
            character_class: self.character_class,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCharacter {
    pub user_id: i32,
    pub name: String,
    pub faction: Faction,
    pub race: Race,
    pub character_class: CharacterClass,
}

/// Short form returned when a second active character is refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterSummary {
    pub name: String,
    pub faction: Faction,
    pub race: Race,
    pub character_class: CharacterClass,
}

pub const STARTING_LEVEL: i32 = 1;
pub const STARTING_EXPERIENCE: i32 = 0;
pub const STARTING_GOLD: i32 = 0;

/// Default character name when the client sends none.
pub fn default_character_name(username: &str) -> String {
    format!("{username}'s Hero")
}
