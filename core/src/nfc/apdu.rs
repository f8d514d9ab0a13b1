mod command;
mod handler;
mod ins;
mod response;

pub use command::Command;
pub use handler::Handler;
pub use response::Response;

pub const CLA_DEFAULT: u8 = 0x00;

/// An error status word returned by the card
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("The card returned an error ({sw1:#04X}, {sw2:#04X}).")]
pub struct Error {
    sw1: u8,
    sw2: u8,
}

impl Error {
    /// The status word pair that was reported.
    pub fn status_words(&self) -> (u8, u8) {
        (self.sw1, self.sw2)
    }
}

impl From<(u8, u8)> for Error {
    fn from((sw1, sw2): (u8, u8)) -> Self {
        Error { sw1, sw2 }
    }
}
