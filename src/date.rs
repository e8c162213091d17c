use chrono::NaiveDate;

/// Accepted date layouts, tried in order: format, separator, index of the year segment.
/// Slash and dash forms are always day-first.
const DATE_FORMATS: [(&str, char, usize); 3] = [
    ("%Y-%m-%d", '-', 0),
    ("%d/%m/%Y", '/', 2),
    ("%d-%m-%Y", '-', 2),
];

/// Turn a date string read off a document into a calendar date.
///
/// Empty, absent or unrecognised input yields `None`; the first format that
/// parses wins, so `01/02/2003` is always 1 February 2003.
pub fn normalize_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .filter(|(_, sep, year_at)| has_shape(raw, *sep, *year_at))
        .find_map(|(fmt, _, _)| NaiveDate::parse_from_str(raw, fmt).ok())
}

// chrono's %Y takes any number of digits and a sign; require three digit-only
// segments with a four-digit year so "12/05/90" is not read as year 90.
fn has_shape(raw: &str, sep: char, year_at: usize) -> bool {
    let segments: Vec<&str> = raw.split(sep).collect();
    segments.len() == 3
        && segments
            .iter()
            .all(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        && segments[year_at].len() == 4
}
