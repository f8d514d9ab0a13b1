//! The fixed, ordered table of on-card file locations a dump walks.
//!
//! The table order is significant: it is both the scan order and the order of
//! files in the resulting dump. Entry names follow the customary labels for
//! these locations so dumps stay cross-referenceable with other tooling.

/// One known on-card location: a symbolic name and a two-level address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,

    /// Identifier of the enclosing folder, or 0 for a root-level file.
    pub folder_id: u16,

    pub file_id: u16,
}

const fn root(name: &'static str, file_id: u16) -> CatalogEntry {
    CatalogEntry {
        name,
        folder_id: 0,
        file_id,
    }
}

const fn file(name: &'static str, folder_id: u16, file_id: u16) -> CatalogEntry {
    CatalogEntry {
        name,
        folder_id,
        file_id,
    }
}

/// Every file location this crate knows how to read, in scan order.
pub const CATALOG: &[CatalogEntry] = &[
    root("AID", 0x3F04),
    root("ICC", 0x0002),
    root("ID", 0x0003),
    root("HOLDER_EXTENDED", 0x3F1C),
    root("DISPLAY", 0x2F10),
    // Ticketing application
    file("TICKETING_ENVIRONMENT", 0x2000, 0x2001),
    file("TICKETING_HOLDER", 0x2000, 0x2002),
    file("TICKETING_AID", 0x2000, 0x2004),
    file("TICKETING_LOG", 0x2000, 0x2010),
    file("TICKETING_CONTRACTS_1", 0x2000, 0x2020),
    file("TICKETING_CONTRACTS_2", 0x2000, 0x2030),
    file("TICKETING_COUNTERS_1", 0x2000, 0x202A),
    file("TICKETING_COUNTERS_2", 0x2000, 0x202B),
    file("TICKETING_COUNTERS_3", 0x2000, 0x202C),
    file("TICKETING_COUNTERS_4", 0x2000, 0x202D),
    file("TICKETING_COUNTERS_5", 0x2000, 0x202E),
    file("TICKETING_COUNTERS_6", 0x2000, 0x202F),
    file("TICKETING_SPECIAL_EVENTS", 0x2000, 0x2040),
    file("TICKETING_CONTRACT_LIST", 0x2000, 0x2050),
    file("TICKETING_COUNTERS_7", 0x2000, 0x2060),
    file("TICKETING_COUNTERS_8", 0x2000, 0x2062),
    file("TICKETING_COUNTERS_9", 0x2000, 0x2069),
    file("TICKETING_COUNTERS_10", 0x2000, 0x206A),
    file("TICKETING_FREE", 0x2000, 0x20F0),
    // Parking application (MPP)
    file("MPP_PUBLIC_PARAMETERS", 0x3100, 0x3102),
    file("MPP_AID", 0x3100, 0x3104),
    file("MPP_LOG", 0x3100, 0x3115),
    file("MPP_CONTRACTS", 0x3100, 0x3120),
    file("MPP_COUNTERS_1", 0x3100, 0x3113),
    file("MPP_COUNTERS_2", 0x3100, 0x3123),
    file("MPP_COUNTERS_3", 0x3100, 0x3133),
    file("MPP_MISCELLANEOUS", 0x3100, 0x3150),
    file("MPP_COUNTERS_4", 0x3100, 0x3169),
    file("MPP_FREE", 0x3100, 0x31F0),
    // Transport application (RT)
    file("RT2_ENVIRONMENT", 0x2100, 0x2101),
    file("RT2_AID", 0x2100, 0x2104),
    file("RT2_LOG", 0x2100, 0x2110),
    file("RT2_CONTRACTS", 0x2100, 0x2120),
    file("RT2_SPECIAL_EVENTS", 0x2100, 0x2140),
    file("RT2_CONTRACT_LIST", 0x2100, 0x2150),
    file("RT2_COUNTERS", 0x2100, 0x2169),
    file("RT2_FREE", 0x2100, 0x21F0),
    // Electronic purse application
    file("EP_AID", 0x1000, 0x1004),
    file("EP_LOAD_LOG", 0x1000, 0x1014),
    file("EP_PURCHASE_LOG", 0x1000, 0x1015),
    // E-ticket application
    file("ETICKET", 0x8000, 0x8004),
    file("ETICKET_EVENT_LOGS", 0x8000, 0x8010),
    file("ETICKET_PRESELECTION", 0x8000, 0x8030),
];
