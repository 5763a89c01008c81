mod error;
mod policy;
mod token;
mod user;

pub use error::*;
pub use policy::*;
pub use token::*;
pub use user::*;
