use crate::nfc::apdu;
use crate::nfc::apdu::ins;

const SELECT_P1_BY_NAME: u8 = 0x04;
const SELECT_P1_BY_ID: u8 = 0x00;
const SELECT_P2_FIRST: u8 = 0x00;
const READ_RECORD_P2_CURRENT_FILE: u8 = 0x04;

/// An APDU command to be transmitted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    cla: u8,
    ins: u8,
    p1: u8,
    p2: u8,
    le: Option<u8>,
    payload: Option<Vec<u8>>,
}

impl Command {
    /// Constructs a command with CLA, INS, P1, and P2.
    /// No payloads will be transmitted or received.
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            le: None,
            payload: None,
        }
    }

    /// Constructs a command with CLA, INS, P1, P2, and Le.
    /// A payload will be received.
    pub fn new_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            le: Some(le),
            payload: None,
        }
    }

    /// Constructs a command with CLA, INS, P1, P2, and a payload.
    /// No payload will be received.
    pub fn new_with_payload(cla: u8, ins: u8, p1: u8, p2: u8, payload: Vec<u8>) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            le: None,
            payload: Some(payload),
        }
    }

    /// Constructs a `SELECT` command addressing an application by its name.
    pub fn select_application(name: Vec<u8>) -> Self {
        Self::new_with_payload(
            apdu::CLA_DEFAULT,
            ins::SELECT_FILE,
            SELECT_P1_BY_NAME,
            SELECT_P2_FIRST,
            name,
        )
    }

    /// Constructs a `SELECT` command addressing a file by its two-octet identifier.
    pub fn select_file(id: u16) -> Self {
        Self::new_with_payload(
            apdu::CLA_DEFAULT,
            ins::SELECT_FILE,
            SELECT_P1_BY_ID,
            SELECT_P2_FIRST,
            id.to_be_bytes().into(),
        )
    }

    /// Constructs a `SELECT` command with no target, resetting the selection state.
    pub fn unselect_file() -> Self {
        Self::new(
            apdu::CLA_DEFAULT,
            ins::SELECT_FILE,
            SELECT_P1_BY_ID,
            SELECT_P2_FIRST,
        )
    }

    /// Constructs a `READ RECORD` command against the currently selected file.
    pub fn read_record(index: u8, le: u8) -> Self {
        Self::new_with_le(
            apdu::CLA_DEFAULT,
            ins::READ_RECORD,
            index,
            READ_RECORD_P2_CURRENT_FILE,
            le,
        )
    }

    /// Converts the command into octets.
    pub fn into_bytes(self) -> Vec<u8> {
        let Self {
            cla,
            ins,
            p1,
            p2,
            le,
            payload,
        } = self;

        let mut buffer: Vec<u8> = vec![cla, ins, p1, p2];
        if let Some(mut p) = payload {
            buffer.push(p.len() as u8);
            buffer.append(&mut p);
        }

        if let Some(l) = le {
            buffer.push(l);
        }

        buffer
    }
}
