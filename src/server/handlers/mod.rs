pub mod health;
pub mod passwords;
