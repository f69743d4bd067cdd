use chrono::{DateTime, NaiveDate};

pub(crate) mod export;
pub(crate) mod files;

pub(crate) const DATE_FORMAT_SHORT: &str = "%d/%m/%y";
pub(crate) const DATE_FORMAT_LONG: &str = "%d/%m/%Y";
const ISO_DATE_LEN: usize = 10;

// takes the literal calendar date of the input, no timezone normalization
pub(crate) fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(input) {
        return Some(date_time.date_naive());
    }
    input
        .get(..ISO_DATE_LEN)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// `DD/MM/YY`, empty for empty or unparseable input.
pub(crate) fn format_date_short(input: &str) -> String {
    parse_date(input)
        .map(|d| d.format(DATE_FORMAT_SHORT).to_string())
        .unwrap_or_default()
}

/// `DD/MM/YYYY`, empty for empty or unparseable input.
pub(crate) fn format_date_long(input: &str) -> String {
    parse_date(input)
        .map(|d| d.format(DATE_FORMAT_LONG).to_string())
        .unwrap_or_default()
}

pub(crate) fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dates() {
        assert_eq!(format_date_short(""), "");
        assert_eq!(format_date_long(""), "");
        assert_eq!(format_date_long("  "), "");
    }

    #[test]
    fn invalid_dates() {
        assert_eq!(format_date_short("tomorrow"), "");
        assert_eq!(format_date_long("2024-13-01"), "");
    }

    #[test]
    fn short_dates() {
        assert_eq!(format_date_short("2024-03-05"), "05/03/24");
        assert_eq!(format_date_short("2009-12-31"), "31/12/09");
    }

    #[test]
    fn long_dates() {
        assert_eq!(format_date_long("2024-03-05"), "05/03/2024");
        assert_eq!(format_date_long("1999-01-09"), "09/01/1999");
    }

    #[test]
    fn timestamps_keep_their_calendar_date() {
        assert_eq!(format_date_long("2024-03-05T23:30:00+05:30"), "05/03/2024");
        assert_eq!(format_date_long("2024-03-05T00:15:00Z"), "05/03/2024");
        assert_eq!(format_date_short("2024-03-05T10:00"), "05/03/24");
        assert_eq!(format_date_short("2024-03-05 10:00:00"), "05/03/24");
    }

    #[test]
    fn escape() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
