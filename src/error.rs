#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error ({0})")]
    Io(#[from] std::io::Error),

    #[error("invalid hex ({0})")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid Float8 length: expected 1 byte, got {0} bytes")]
    InvalidLength(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for dcbor::Error {
    fn from(err: Error) -> Self { dcbor::Error::msg(err.to_string()) }
}
