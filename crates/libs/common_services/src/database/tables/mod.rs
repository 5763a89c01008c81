pub mod album;
pub mod app_user;
pub mod comment;
pub mod image;
