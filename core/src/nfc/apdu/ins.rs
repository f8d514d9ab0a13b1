//! INS octets of the ISO 7816-4 commands this crate issues

pub const SELECT_FILE: u8 = 0xA4;
pub const READ_RECORD: u8 = 0xB2;
