//! Test data helpers: hex conversion, random identifiers, dates

use chrono::{Duration, Local};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Two lowercase hex digits per byte
pub fn string_to_hex(s: &str) -> String {
    hex::encode(s.as_bytes())
}

#[derive(Debug, thiserror::Error)]
pub enum HexDecodeError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("decoded bytes are not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Inverse of [`string_to_hex`]
pub fn hex_to_string(hex: &str) -> Result<String, HexDecodeError> {
    let bytes = hex::decode(hex)?;
    Ok(String::from_utf8(bytes)?)
}

/// Test SSN in the reserved 333-33 block
pub fn generate_ssn_number() -> u64 {
    rand::thread_rng().gen_range(3_333_300_000..=3_333_399_999)
}

pub fn generate_ttb_cola_id() -> u64 {
    rand::thread_rng().gen_range(0..100_000_000_000_000)
}

/// 11 digit FEIN with a two digit prefix between 10 and 99
pub fn generate_fein() -> String {
    let mut rng = rand::thread_rng();
    let prefix: u32 = rng.gen_range(10..=99);
    let rest: u32 = rng.gen_range(0..1_000_000_000);
    format!("{}{:09}", prefix, rest)
}

pub fn get_random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Digit string of exactly `len` digits, never starting with zero
pub fn get_random_number(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|i| {
            let low = if i == 0 { 1 } else { 0 };
            char::from(b'0' + rng.gen_range(low..=9u8))
        })
        .collect()
}

/// Local midnight `day_offset` days from today, as `MM/DD/YYYY 12:00:00 AM`
pub fn get_formatted_date(day_offset: i64) -> String {
    let date = Local::now().date_naive() + Duration::days(day_offset);
    format!("{} 12:00:00 AM", date.format("%m/%d/%Y"))
}

pub fn get_date_in_format_yyyy_mm_dd_hh_mm_ss(day_offset: i64) -> String {
    (Local::now() + Duration::days(day_offset))
        .format("%Y_%m_%d_%H_%M_%S")
        .to_string()
}
