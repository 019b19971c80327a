pub mod compose;
pub mod object;
pub mod orientation;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("unsupported vector representation for `{param}`")]
    InvalidArgumentType { param: &'static str },
}
