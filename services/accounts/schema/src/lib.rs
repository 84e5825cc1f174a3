//! sea-orm entities for the accounts database.

pub mod characters;
pub mod tokens;
pub mod users;
