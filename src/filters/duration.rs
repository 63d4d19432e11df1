/// Videos shorter than this are treated as short-form and never collected.
pub const MIN_DURATION_SECS: u64 = 60;

/// Parse a compact duration token (`PT1H2M10S`) into seconds.
///
/// The first two characters are taken as the `PT` prefix and skipped
/// without being checked. Components are read left to right: the text before `H` is hours, the text
/// before the following `M` is minutes, the text before the following `S` is
/// seconds. Missing components count as zero. Nothing here ever fails; a
/// magnitude that does not parse as an integer contributes zero and the rest
/// of the token is still read, so malformed input (`PT1X`, out-of-order
/// components) degrades to a partial result.
pub fn parse_duration(token: &str) -> u64 {
    let token = token.trim();
    if token.is_empty() {
        return 0;
    }

    let mut rest = match token.char_indices().nth(2) {
        Some((i, _)) => &token[i..],
        None => "",
    };

    let mut take = |marker: char| -> u64 {
        match rest.split_once(marker) {
            Some((magnitude, tail)) => {
                rest = tail;
                magnitude.trim().parse().unwrap_or(0)
            }
            None => 0,
        }
    };

    let hours = take('H');
    let minutes = take('M');
    let seconds = take('S');

    hours
        .saturating_mul(3600)
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds)
}

/// True when a duration token describes long-form content.
pub fn is_long_form(token: &str) -> bool {
    parse_duration(token) >= MIN_DURATION_SECS
}
