//! Communicating with the card over its APDU channel

pub mod apdu;

pub use apdu::{Command, Error, Handler, Response};
