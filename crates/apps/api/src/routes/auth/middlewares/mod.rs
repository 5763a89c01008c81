pub mod common;
pub mod optional_user;
pub mod user;
