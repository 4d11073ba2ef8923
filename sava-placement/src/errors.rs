use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlacementError>;

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("No available broker for assignment")]
    NoAvailableBroker,

    #[error("Invalid bundle name: {0}")]
    InvalidBundle(String),
}
