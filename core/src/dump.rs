//! Walks the file catalog against a selected card and collects the dump.

use time::OffsetDateTime;

#[cfg(feature = "tracing")]
use tracing::warn;

use crate::card::{Card, File, Record};
use crate::catalog::{CatalogEntry, CATALOG};
use crate::nfc::apdu;
use crate::protocol::{Protocol, ReadStep};

#[cfg(not(feature = "tracing"))]
macro_rules! warn {
    ($($t: tt)*) => {
        let _ = format_args!($($t)*);
    };
}

/// Name of the Calypso ticketing application.
pub const APPLICATION_NAME: &[u8] = b"1TIC.ICA";

/// Maximum octets requested per record read. The card may return fewer.
pub const RECORD_WINDOW: u8 = 0x1D;

// Record indices are a single octet on the wire.
const MAX_RECORD_INDEX: u8 = 255;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The ticketing application could not be selected. Fatal: no dump is
    /// produced.
    #[error("couldn't select the card application: {0}")]
    ApplicationNotFound(#[source] apdu::Error),

    /// A catalog entry's folder or file could not be selected. Recoverable:
    /// the entry is skipped and the scan continues.
    #[error("couldn't select file {name}: {source}")]
    FileSelectionFailed {
        name: &'static str,
        #[source]
        source: apdu::Error,
    },

    /// A record read failed with something other than end-of-data. Fatal:
    /// the scan aborts and every file collected so far is discarded.
    #[error("unexpected failure while reading a record: {0}")]
    UnexpectedReadFailure(#[from] apdu::Error),
}

/// A sink for scan progress, shown to whoever is holding the card still.
pub trait Feedback {
    fn update_status_text(&mut self, text: &str);

    /// Called once per catalog entry attempted, before the attempt, with a
    /// strictly increasing `current` and a constant `total`.
    fn update_progress_bar(&mut self, current: usize, total: usize);
}

/// Issues the selection sequence for one catalog entry.
///
/// The selection state is always reset first, so a leftover selection from
/// the previous entry can't leak into this one.
fn select_entry<P, Ctx>(protocol: &P, ctx: Ctx, entry: &CatalogEntry) -> Result<(), Error>
where
    P: Protocol<Ctx>,
    Ctx: Copy,
{
    let fail = |source| Error::FileSelectionFailed {
        name: entry.name,
        source,
    };

    protocol.unselect_file(ctx);

    if entry.folder_id != 0 {
        protocol.select_file(ctx, entry.folder_id).map_err(fail)?;
    }

    protocol.select_file(ctx, entry.file_id).map_err(fail)
}

/// Reads records from the selected file until the card signals end-of-data.
///
/// End-of-data is a normal stop: the records gathered so far are the final
/// content of the file. Any other read failure propagates to the caller.
fn scan_records<P, Ctx>(protocol: &P, ctx: Ctx) -> Result<Vec<Record>, apdu::Error>
where
    P: Protocol<Ctx>,
    Ctx: Copy,
{
    let mut records = Vec::new();

    for index in 1..=MAX_RECORD_INDEX {
        match protocol.read_record(ctx, index, RECORD_WINDOW)? {
            ReadStep::Record(data) => records.push(Record::new(index, data)),
            ReadStep::EndOfData => break,
        }
    }

    Ok(records)
}

/// Dumps every readable file of the card behind `protocol`.
///
/// Selection failures skip the affected catalog entry; a failure to select
/// the application, or any unexpected record-read failure, aborts the whole
/// scan without producing a card.
pub fn dump_tag<P, Ctx, F>(
    protocol: &P,
    ctx: Ctx,
    tag_id: Vec<u8>,
    feedback: &mut F,
) -> Result<Card, Error>
where
    P: Protocol<Ctx>,
    Ctx: Copy,
    F: Feedback,
{
    feedback.update_status_text("Reading Calypso card...");

    protocol
        .select_application(ctx, APPLICATION_NAME)
        .map_err(|e| {
            warn!("couldn't select the application: {e}");
            Error::ApplicationNotFound(e)
        })?;

    let total = CATALOG.len();
    let mut files = Vec::new();

    for (position, entry) in CATALOG.iter().enumerate() {
        feedback.update_progress_bar(position, total);

        if let Err(e) = select_entry(protocol, ctx, entry) {
            warn!("{e}; skipping");
            continue;
        }

        let records = scan_records(protocol, ctx)?;
        files.push(File::new(entry.folder_id, entry.file_id, records));
    }

    Ok(Card::new(tag_id, OffsetDateTime::now_utc(), files))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::{dump_tag, Error, Feedback, APPLICATION_NAME, RECORD_WINDOW};
    use crate::catalog::CATALOG;
    use crate::nfc::apdu;
    use crate::protocol::{Protocol, ReadStep};

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Op {
        SelectApplication(Vec<u8>),
        UnselectFile,
        SelectFile(u16),
        ReadRecord(u8, u8),
    }

    const SW_DENIED: (u8, u8) = (0x69, 0x82);

    /// A deterministic card: every known file exists and holds
    /// `records_per_file` records, except for the configured failures.
    struct MockCard {
        ops: RefCell<Vec<Op>>,
        selected: RefCell<Option<u16>>,
        records_per_file: u16,
        application_present: bool,
        failing_select: Option<u16>,
        failing_read: Option<u16>,
    }

    impl MockCard {
        fn with_records(records_per_file: u16) -> Self {
            Self {
                ops: RefCell::new(Vec::new()),
                selected: RefCell::new(None),
                records_per_file,
                application_present: true,
                failing_select: None,
                failing_read: None,
            }
        }

        fn ops(&self) -> Vec<Op> {
            self.ops.borrow().clone()
        }

        fn read_count(&self) -> usize {
            self.ops()
                .iter()
                .filter(|op| matches!(op, Op::ReadRecord(..)))
                .count()
        }
    }

    impl Protocol<()> for MockCard {
        fn select_application(&self, _: (), name: &[u8]) -> Result<(), apdu::Error> {
            self.ops
                .borrow_mut()
                .push(Op::SelectApplication(name.to_vec()));

            match self.application_present {
                true => Ok(()),
                false => Err(SW_DENIED.into()),
            }
        }

        fn unselect_file(&self, _: ()) {
            self.ops.borrow_mut().push(Op::UnselectFile);
            *self.selected.borrow_mut() = None;
        }

        fn select_file(&self, _: (), id: u16) -> Result<(), apdu::Error> {
            self.ops.borrow_mut().push(Op::SelectFile(id));

            if self.failing_select == Some(id) {
                return Err(SW_DENIED.into());
            }

            *self.selected.borrow_mut() = Some(id);
            Ok(())
        }

        fn read_record(&self, _: (), index: u8, max_len: u8) -> Result<ReadStep, apdu::Error> {
            self.ops.borrow_mut().push(Op::ReadRecord(index, max_len));

            let selected = (*self.selected.borrow()).unwrap();
            if self.failing_read == Some(selected) {
                return Err(SW_DENIED.into());
            }

            match u16::from(index) <= self.records_per_file {
                true => Ok(ReadStep::Record(vec![index, 0xAA])),
                false => Ok(ReadStep::EndOfData),
            }
        }
    }

    #[derive(Default)]
    struct RecordingFeedback {
        status: Vec<String>,
        progress: Vec<(usize, usize)>,
    }

    impl Feedback for RecordingFeedback {
        fn update_status_text(&mut self, text: &str) {
            self.status.push(text.to_owned());
        }

        fn update_progress_bar(&mut self, current: usize, total: usize) {
            self.progress.push((current, total));
        }
    }

    fn dump(card: &MockCard) -> (Result<crate::Card, Error>, RecordingFeedback) {
        let mut feedback = RecordingFeedback::default();
        let result = dump_tag(card, (), vec![0x04, 0x13], &mut feedback);

        (result, feedback)
    }

    #[test]
    fn application_selection_failure_aborts_before_any_read() {
        let mut card = MockCard::with_records(1);
        card.application_present = false;

        let (result, feedback) = dump(&card);

        assert!(matches!(result, Err(Error::ApplicationNotFound(_))));
        assert_eq!(card.read_count(), 0);
        assert_eq!(card.ops(), vec![Op::SelectApplication(APPLICATION_NAME.to_vec())]);
        assert!(feedback.progress.is_empty());
    }

    #[test]
    fn every_entry_dumps_one_record_when_card_is_full() {
        let card = MockCard::with_records(1);

        let (result, feedback) = dump(&card);
        let dumped = result.unwrap();

        assert_eq!(dumped.tag_id(), &[0x04, 0x13][..]);
        assert_eq!(dumped.files().len(), CATALOG.len());

        for (file, entry) in dumped.files().iter().zip(CATALOG) {
            assert_eq!(file.folder_id(), entry.folder_id);
            assert_eq!(file.file_id(), entry.file_id);
            assert_eq!(file.records().len(), 1);
            assert_eq!(file.records()[0].index(), 1);
        }

        assert_eq!(feedback.status, vec!["Reading Calypso card...".to_owned()]);
        assert_eq!(
            feedback.progress,
            (0..CATALOG.len())
                .map(|i| (i, CATALOG.len()))
                .collect::<Vec<_>>(),
        );
    }

    #[test]
    fn selection_failure_skips_the_entry_and_continues() {
        let failing = CATALOG[5];
        assert_ne!(failing.folder_id, 0);

        let mut card = MockCard::with_records(0);
        card.failing_select = Some(failing.file_id);

        let (result, _) = dump(&card);
        let dumped = result.unwrap();

        assert_eq!(dumped.files().len(), CATALOG.len() - 1);
        assert!(dumped.files().iter().all(|f| f.file_id() != failing.file_id));

        // Remaining files keep the catalog order.
        let expected: Vec<u16> = CATALOG
            .iter()
            .filter(|e| e.file_id != failing.file_id)
            .map(|e| e.file_id)
            .collect();
        let actual: Vec<u16> = dumped.files().iter().map(|f| f.file_id()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn unexpected_read_failure_discards_the_whole_dump() {
        let mut card = MockCard::with_records(1);
        card.failing_read = Some(CATALOG[10].file_id);

        let (result, feedback) = dump(&card);

        assert!(matches!(result, Err(Error::UnexpectedReadFailure(_))));
        // The scan stopped at entry #10: progress never went further.
        assert_eq!(feedback.progress.len(), 11);
    }

    #[test]
    fn empty_files_are_retained() {
        let card = MockCard::with_records(0);

        let (result, _) = dump(&card);
        let dumped = result.unwrap();

        assert_eq!(dumped.files().len(), CATALOG.len());
        assert!(dumped.files().iter().all(|f| f.records().is_empty()));
    }

    #[test]
    fn record_indices_are_contiguous_from_one() {
        let card = MockCard::with_records(3);

        let (result, _) = dump(&card);
        let dumped = result.unwrap();

        for file in dumped.files() {
            let indices: Vec<u8> = file.records().iter().map(|r| r.index()).collect();
            assert_eq!(indices, vec![1, 2, 3]);
        }
    }

    #[test]
    fn record_index_never_exceeds_the_single_octet_space() {
        let card = MockCard::with_records(1000);

        let (result, _) = dump(&card);
        let dumped = result.unwrap();

        assert!(dumped
            .files()
            .iter()
            .all(|f| f.records().len() == 255 && f.records().last().unwrap().index() == 255));
    }

    #[test]
    fn transport_observes_the_exact_selection_discipline() {
        let card = MockCard::with_records(0);

        dump(&card).0.unwrap();

        let mut expected = vec![Op::SelectApplication(APPLICATION_NAME.to_vec())];
        for entry in CATALOG {
            expected.push(Op::UnselectFile);
            if entry.folder_id != 0 {
                expected.push(Op::SelectFile(entry.folder_id));
            }
            expected.push(Op::SelectFile(entry.file_id));
            expected.push(Op::ReadRecord(1, RECORD_WINDOW));
        }

        assert_eq!(card.ops(), expected);
    }

    #[test]
    fn repeat_scans_are_deterministic() {
        let (first, first_feedback) = dump(&MockCard::with_records(2));
        let (second, second_feedback) = dump(&MockCard::with_records(2));

        assert_eq!(first.unwrap().files(), second.unwrap().files());
        assert_eq!(first_feedback.progress, second_feedback.progress);
        assert_eq!(first_feedback.status, second_feedback.status);
    }
}
