use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Position is outside of the grid")]
    InvalidPosition,
    #[error("Game already ended, no new reveals are accepted")]
    GameOver,
    #[error("Square is already revealed")]
    AlreadyRevealed,
}

pub type Result<T> = core::result::Result<T, GridError>;
