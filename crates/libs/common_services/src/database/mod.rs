mod document;
mod error;
pub mod firestore;
mod memory;
mod store;
mod stores;
mod tables;
mod utils;

pub use document::*;
pub use error::*;
pub use memory::*;
pub use store::*;
pub use stores::*;
pub use tables::*;
pub use utils::*;
