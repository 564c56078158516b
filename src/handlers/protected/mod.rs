pub mod auth;
pub mod categories;
pub mod prompti;
pub mod settings;
pub mod tags;
pub mod users;
