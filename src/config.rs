// Serial port configuration
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
pub const DEFAULT_DATA_BITS: u8 = 8;
pub const SERIAL_TIMEOUT_MS: u64 = 100;
/// Shorter read timeouts turn the reader loop into a busy spin
pub const MIN_SERIAL_TIMEOUT_MS: u64 = 10;
pub const DATA_BITS: std::ops::RangeInclusive<u8> = 5..=8;
pub const READ_BUFFER_SIZE: usize = 1024;

pub const BAUD_RATES: &[u32] = &[9600, 19200, 38400, 57600, 115_200, 230_400, 460_800, 921_600];

/// USB vendor id of WCH, the maker of the CH340/CH341 bridges
pub const WCH_VENDOR_ID: u16 = 0x1A86;

// Buffer limits
pub const MAX_LOG_ENTRIES: usize = 5000;
pub const MAX_HISTORY: usize = 100;

// Persistence
pub const APP_DIR_NAME: &str = "ch341_terminal";
pub const SETTINGS_FILE: &str = "settings.json";
pub const QUICK_COMMANDS_FILE: &str = "quick_commands.json";

pub const DEFAULT_QUICK_COMMANDS: &[&str] = &[
    "AT", "AT+GMR", "AT+CWLAP", "help", "version", "status", "reset", "echo off", "echo on",
    "info", "test", "ping",
];
