pub mod parser;
pub mod prompt;
pub mod search;
pub mod session;

pub use crate::domain::model::{GenerationOutput, GenerationRequest, GroceryResponse};
pub use crate::domain::ports::{ConfigProvider, GenerativeModel};
pub use crate::utils::error::Result;
