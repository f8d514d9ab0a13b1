//! A crate to dump Calypso transit cards through an APDU delegate.

#[cfg(feature = "pcsc")]
pub mod pcsc;

pub mod card;
pub mod catalog;
pub mod dump;
pub mod nfc;
pub mod protocol;

pub use card::Card;
pub use dump::{dump_tag, Feedback};
pub use protocol::Iso7816;
