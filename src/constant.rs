pub mod env_vars {
    pub const SERVICE_BASEPATH: &str = "SERVICE_BASE_PATH";
    // relative path starting from app / service home folder
    pub const CFG_FILEPATH: &str = "CONFIG_FILE_PATH";
    pub const EXPECTED_LABELS: [&str; 2] = [SERVICE_BASEPATH, CFG_FILEPATH];
}

pub mod hard_limit {
    // a line quantity below this floor is rejected locally, the backend
    // interprets quantity zero as line removal and this client never
    // relies on that shortcut
    pub const MIN_LINE_QUANTITY: u32 = 1;
}

// number of fraction digits rendered for any monetary amount, rounding
// happens only at display / comparison time, never during derivation
pub const AMOUNT_DISPLAY_SCALE: u32 = 2;

pub mod logging {
    use serde::Deserialize;

    #[allow(clippy::upper_case_acronyms)]
    #[derive(Deserialize, Clone, Copy)]
    pub enum Level {
        TRACE,
        DEBUG,
        INFO,
        WARNING,
        ERROR,
        FATAL,
    }

    #[allow(clippy::upper_case_acronyms)]
    #[derive(Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Destination {
        CONSOLE,
        LOCALFS,
    }
}
