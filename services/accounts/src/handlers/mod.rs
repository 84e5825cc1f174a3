pub mod bearer;
pub mod character;
pub mod health;
pub mod password;
pub mod token;
pub mod user;
