pub mod albums;
pub mod comments;
mod error;
pub mod images;
pub mod likes;
pub mod search;
pub mod users;

pub use error::*;
