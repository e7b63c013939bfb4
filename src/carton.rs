use chrono::{Datelike, NaiveDateTime};

/// format of the pack timestamp printed on the label
pub const PACK_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// build the carton identifier `C<YY><WW>-<NNN>` for the given point in time
///
/// `WW` is the week of the year with Sunday as first day of the week (00-53),
/// `NNN` the sequence number zero padded to at least three digits
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tspl_carton_printer::carton::carton_id;
///
/// let packed_at = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap().and_hms_opt(9, 30, 0).unwrap();
/// assert_eq!(carton_id(packed_at, 7), "C2544-007");
/// ```
pub fn carton_id(now: NaiveDateTime, sequence: u32) -> String {
    format!(
        "C{:02}{}-{:03}",
        now.year().rem_euclid(100),
        now.format("%U"),
        sequence
    )
}

/// the pack timestamp as printed on the label
pub fn pack_timestamp(now: NaiveDateTime) -> String {
    now.format(PACK_TIMESTAMP_FORMAT).to_string()
}
