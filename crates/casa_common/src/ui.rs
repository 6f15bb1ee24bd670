//! Terminal output helpers shared by casactl displays.

/// ANSI escape sequences. Kept raw so displays can compose them freely.
pub mod colors {
    pub const HEADER: &str = "\x1b[1;36m";
    pub const OK: &str = "\x1b[32m";
    pub const WARN: &str = "\x1b[33m";
    pub const ERR: &str = "\x1b[31m";
    pub const DIM: &str = "\x1b[2m";
    pub const RESET: &str = "\x1b[0m";
}

pub const HR: &str = "────────────────────────────────────────────────────────────";

/// Aligned key/value line, as the status displays print.
pub fn print_kv(key: &str, value: &str, width: usize) {
    println!("{key:width$} {value}");
}

/// Render a wire timestamp for display; unparseable input passes through.
pub fn short_date(iso: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(iso) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    iso.to_string()
}

/// Currency with a sign, colored green when owed to you, red when owing.
pub fn money(amount: f64) -> String {
    let color = if amount < 0.0 { colors::ERR } else { colors::OK };
    format!("{color}${amount:.2}{}", colors::RESET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_date_handles_backend_isoformat() {
        assert_eq!(short_date("2026-03-01T10:04:00"), "2026-03-01 10:04");
        assert_eq!(short_date("2026-03-01T10:04:00.123456"), "2026-03-01 10:04");
        assert_eq!(short_date("2026-03-01T10:04:00+00:00"), "2026-03-01 10:04");
        assert_eq!(short_date("soon"), "soon");
    }
}
