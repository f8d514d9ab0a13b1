//! PC/SC support for the calypso library.
//! Can be enabled by turning the `pcsc` feature on.
//!
//! PC/SC is the platform abstraction for talking to smart card readers;
//! this module drives contactless readers through pcsc-rust. Refer to its
//! documentation for platform support details:
//! <https://github.com/bluetech/pcsc-rust>
//!
//! ## Usage
//! ```rust,no_run
//! use calypso::pcsc::Context;
//! use calypso::Iso7816;
//!
//! let ctx = Context::try_new().unwrap();
//! let device = ctx.open().unwrap();
//! let card = device.connect(ctx).unwrap();
//!
//! let tag_id = card.tag_id().unwrap();
//! let protocol = Iso7816::<_, ()>::new(Box::new(card));
//! ```

use std::ffi::{CStr, CString};
use std::marker::PhantomData;
use std::thread::sleep;
use std::time::Duration;

use pcsc::{Card, Protocols, Scope, ShareMode, MAX_BUFFER_SIZE};

#[cfg(feature = "tracing")]
use tracing::{debug, info};

use crate::nfc::apdu;
use crate::nfc::{Command, Handler, Response};

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($t: tt)*) => {
        let _ = format_args!($($t)*);
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! info {
    ($($t: tt)*) => {
        let _ = format_args!($($t)*);
    };
}

// GET DATA, UID of the contactless tag (PC/SC part 3 pseudo-APDU).
const GET_UID: [u8; 5] = [0xFF, 0xCA, 0x00, 0x00, 0x00];

// Reported when the PC/SC transport itself failed mid-exchange, so the
// failure surfaces to the scan as an unexpected read error.
const SW_TRANSPORT_FAILURE: (u8, u8) = (0x6F, 0x00);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error occurred while communicating with PC/SC: {0}")]
    PcscError(#[from] pcsc::Error),

    #[error("Reader not found on PC/SC service")]
    ReaderNotFound,

    #[error("Couldn't read the tag UID: {0}")]
    Uid(#[from] apdu::Error),
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// PC/SC context.
pub struct Context<'a> {
    ctx: pcsc::Context,
    _lifetime: PhantomData<&'a ()>,
}

impl<'a> Context<'a> {
    /// Creates a PC/SC context in user scope.
    pub fn try_new() -> Result<Self> {
        Ok(Self {
            ctx: pcsc::Context::establish(Scope::User).map_err(Error::PcscError)?,
            _lifetime: Default::default(),
        })
    }

    /// Finds a PC/SC device, then opens a connection to them.
    pub fn open<'b>(&self) -> Result<Device<'b>> {
        let mut buf = [0u8; 2048];

        Ok(Device::new(
            self.ctx
                .list_readers(&mut buf)
                .map_err(Error::PcscError)?
                .next()
                .ok_or(Error::ReaderNotFound)?,
        ))
    }
}

/// PC/SC device handle.
pub struct Device<'a> {
    reader: Box<CString>,
    _lifetime: PhantomData<&'a ()>,
}

impl<'a> Device<'a> {
    fn new(reader: &CStr) -> Self {
        debug!("Using device: {}", reader.to_str().unwrap_or_default());

        Self {
            reader: Box::new(reader.to_owned()),
            _lifetime: Default::default(),
        }
    }

    /// Connects to the card presented to the device after waiting for them.
    pub fn connect(&self, ctx: Context) -> Result<PcscCard<'a>> {
        // Waits for the card to be tapped, polling for each seconds.
        debug!("Waiting for a card");

        loop {
            match ctx
                .ctx
                .connect(&self.reader, ShareMode::Shared, Protocols::ANY)
            {
                Ok(card) => {
                    debug!("Connected to your card");

                    return Ok(PcscCard::new(card));
                }
                Err(e) => match e {
                    pcsc::Error::NoSmartcard => {
                        info!("Still waiting for your card...");
                        sleep(Duration::from_secs(1));

                        continue;
                    }
                    _ => return Err(Error::PcscError(e)),
                },
            }
        }
    }
}

/// A card to be communicated with through PC/SC.
pub struct PcscCard<'a> {
    card: Card,
    _lifetime: PhantomData<&'a ()>,
}

impl<'a> PcscCard<'a> {
    fn new(card: Card) -> Self {
        Self {
            card,
            _lifetime: Default::default(),
        }
    }

    /// Transmits an APDU command to the card, then receives a response from them.
    pub fn transmit(&self, tx: &[u8]) -> Result<Vec<u8>> {
        debug!("TX: {}", hex::encode(tx));

        let mut rx = [0u8; MAX_BUFFER_SIZE];
        let rx = self.card.transmit(tx, &mut rx).map_err(Error::PcscError)?;

        debug!("RX: {}", hex::encode(rx));

        Ok(Vec::from(rx))
    }

    /// Reads the UID of the contactless tag through the reader.
    pub fn tag_id(&self) -> Result<Vec<u8>> {
        let rx = self.transmit(&GET_UID)?;

        Response::from_bytes(rx).into_result().map_err(Error::Uid)
    }
}

type Ctx = ();

impl<'a> Handler<Ctx> for PcscCard<'a> {
    fn handle(&self, _: Ctx, command: Command) -> Response {
        match self.transmit(&command.into_bytes()) {
            Ok(rx) => Response::from_bytes(rx),
            Err(_) => Response::from(SW_TRANSPORT_FAILURE),
        }
    }
}
