use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board width and height must be positive")]
    InvalidSize,
    #[error("Mine density must be a fraction between 0 and 1")]
    InvalidDensity,
    #[error("Drawing surface must have a positive, finite size")]
    InvalidSurface,
}

pub type Result<T> = core::result::Result<T, GameError>;
