pub mod character;
pub mod password;
pub mod token;
pub mod user;
