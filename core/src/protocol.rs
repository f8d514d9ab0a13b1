use std::marker::PhantomData;

use crate::nfc;
use crate::nfc::apdu;

const SW_RECORD_NOT_FOUND: (u8, u8) = (0x6A, 0x83);
const SW_END_OF_FILE: (u8, u8) = (0x62, 0x82);

/// Outcome of a single record read against the selected file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadStep {
    /// The record at the requested index, as raw octets.
    Record(Vec<u8>),

    /// The file has no record at or beyond the requested index.
    /// This terminates a scan normally and is not an error.
    EndOfData,
}

/// The selection and record-read operations a scan is driven against.
///
/// `unselect_file` is treated as always succeeding: the card may answer it
/// with an error when nothing is selected, and that answer is discarded.
pub trait Protocol<Ctx> {
    fn select_application(&self, ctx: Ctx, name: &[u8]) -> Result<(), apdu::Error>;

    fn unselect_file(&self, ctx: Ctx);

    fn select_file(&self, ctx: Ctx, id: u16) -> Result<(), apdu::Error>;

    fn read_record(&self, ctx: Ctx, index: u8, max_len: u8) -> Result<ReadStep, apdu::Error>;
}

/// An ISO 7816-4 protocol adapter driving the card through the delegate
pub struct Iso7816<T, Ctx>
where
    T: nfc::Handler<Ctx>,
    Ctx: Copy,
{
    delegate: Box<T>,
    _ctx: PhantomData<Ctx>,
}

impl<T, Ctx> Iso7816<T, Ctx>
where
    T: nfc::Handler<Ctx>,
    Ctx: Copy,
{
    /// Initiates an adapter with the delegate.
    pub fn new(delegate: Box<T>) -> Self {
        Self {
            delegate,
            _ctx: PhantomData,
        }
    }

    fn handle(&self, ctx: Ctx, command: apdu::Command) -> Result<Vec<u8>, apdu::Error> {
        self.delegate.handle(ctx, command).into_result()
    }
}

impl<T, Ctx> Protocol<Ctx> for Iso7816<T, Ctx>
where
    T: nfc::Handler<Ctx>,
    Ctx: Copy,
{
    /// Selects an application by its name.
    fn select_application(&self, ctx: Ctx, name: &[u8]) -> Result<(), apdu::Error> {
        self.handle(ctx, apdu::Command::select_application(name.to_vec()))
            .map(|_| ())
    }

    /// Resets the selection state, discarding whatever the card answers.
    fn unselect_file(&self, ctx: Ctx) {
        let _ = self.delegate.handle(ctx, apdu::Command::unselect_file());
    }

    /// Narrows the selection to the folder or file with the given identifier.
    fn select_file(&self, ctx: Ctx, id: u16) -> Result<(), apdu::Error> {
        self.handle(ctx, apdu::Command::select_file(id)).map(|_| ())
    }

    /// Reads the record at `index` from the selected file, for `max_len` octets max.
    fn read_record(&self, ctx: Ctx, index: u8, max_len: u8) -> Result<ReadStep, apdu::Error> {
        let response = self.delegate.handle(ctx, apdu::Command::read_record(index, max_len));

        match response.trailer() {
            SW_RECORD_NOT_FOUND | SW_END_OF_FILE => Ok(ReadStep::EndOfData),
            _ => response.into_result().map(ReadStep::Record),
        }
    }
}
