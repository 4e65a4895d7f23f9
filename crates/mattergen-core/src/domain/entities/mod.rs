pub mod common;
pub mod document;
pub mod effect;
pub mod manifest;
pub mod output;

use crate::domain::error::DomainError;

pub use common::RelativePath;
