use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

// the token ends at the first "PCB" marker, hence the lazy repetition
static SERIAL_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"S/N:\s*([A-Z0-9\-]+?)PCB").expect("serial number pattern is valid")
});

/// find the serial number inside a raw scanner payload
///
/// the scanned label reads like `EBD S/N: HAA02-2544-336PCB S/No: HB25390000142PCB Rev: ...`,
/// the token between `S/N:` and the first `PCB` marker is returned
///
/// # Returns
///
/// * `None` if the payload does not contain a serial number
pub fn find_serial_number(raw: &str) -> Option<String> {
    let captures = SERIAL_NUMBER.captures(raw)?;
    let token = captures.get(1)?.as_str();
    let serial: String = token
        .chars()
        .take_while(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    if serial.is_empty() {
        return None;
    }
    Some(serial)
}

/// reduce a raw scanner payload to the record stored for printing
///
/// falls back to the unchanged payload (and warns about it) when no serial number is found
///
/// # Examples
///
/// ```
/// use tspl_carton_printer::extract::extract_serial_number;
///
/// let raw = "EBD S/N: HAA02-2544-336PCB S/No: HB25390000142PCB Rev: HT_EBD_V25EBD FW: 14";
/// assert_eq!(extract_serial_number(raw), "HAA02-2544-336");
/// assert_eq!(extract_serial_number("4006381333931"), "4006381333931");
/// ```
pub fn extract_serial_number(raw: &str) -> String {
    match find_serial_number(raw) {
        Some(serial) => serial,
        None => {
            warn!("could not extract S/N from: {}", raw);
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_scanner_payload() {
        let raw = "EBD S/N: HAA02-2544-336PCB S/No: HB25390000142PCB Rev: HT_EBD_V25EBD FW: 14";
        assert_eq!(find_serial_number(raw).as_deref(), Some("HAA02-2544-336"));
    }

    #[test]
    fn test_whitespace_after_marker() {
        assert_eq!(find_serial_number("S/N:ABC-1PCB").as_deref(), Some("ABC-1"));
        assert_eq!(find_serial_number("S/N:   ABC-1PCB").as_deref(), Some("ABC-1"));
        assert_eq!(find_serial_number("S/N:\tABC-1PCB rest").as_deref(), Some("ABC-1"));
    }

    #[test]
    fn test_token_ends_at_first_pcb() {
        assert_eq!(find_serial_number("S/N: AB12PCBCD34PCB").as_deref(), Some("AB12"));
    }

    #[test]
    fn test_token_variants() {
        for token in ["A", "0", "-", "HAA02-2544-337", "X-1-Y-2", "999999999"] {
            let raw = format!("prefix S/N: {}PCB suffix", token);
            assert_eq!(find_serial_number(&raw).as_deref(), Some(token));
            assert_eq!(extract_serial_number(&raw), token);
        }
    }

    #[test]
    fn test_fallback_to_raw_input() {
        for raw in [
            "",
            "4006381333931",
            "S/N: HAA02-2544-336",
            "HAA02-2544-336PCB",
            "S/N: haa02-2544-336PCB",
            "S/N: HAA02 2544PCB",
            "S/N: PCB",
        ] {
            assert_eq!(find_serial_number(raw), None, "{:?}", raw);
            assert_eq!(extract_serial_number(raw), raw);
        }
    }
}
