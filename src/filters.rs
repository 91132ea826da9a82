//! Custom askama filters shared by the page templates.

/// Splits a newline-separated feature blob into its non-empty lines.
pub fn lines(value: &str) -> askama::Result<Vec<String>> {
    Ok(value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Year prefix of an ISO date, or the raw value when it is too short.
pub fn year_of(value: &str) -> askama::Result<String> {
    Ok(value.get(..4).unwrap_or(value).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_drops_blanks() {
        let got = lines("PA system\n\n  Stage monitors  \n").unwrap();
        assert_eq!(got, vec!["PA system".to_string(), "Stage monitors".to_string()]);
    }

    #[test]
    fn year_of_iso_date() {
        assert_eq!(year_of("2024-06-15").unwrap(), "2024");
        assert_eq!(year_of("n/a").unwrap(), "n/a");
    }
}
