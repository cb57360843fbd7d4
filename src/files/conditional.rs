//! If-Modified-Since evaluation.

use std::time::{SystemTime, UNIX_EPOCH};

/// Reports whether a resource last modified at `modified` must be sent in full.
///
/// Returns `true` when there is no `If-Modified-Since` value or when it does
/// not parse as an HTTP date: a bad date never turns into an error status,
/// the client simply gets the full response. Otherwise the resource counts
/// as unmodified when its modification time, truncated to whole seconds, is
/// not later than the date in the header.
pub fn is_modified_since(modified: SystemTime, if_modified_since: Option<&str>) -> bool {
    let Some(value) = if_modified_since else {
        return true;
    };

    let Ok(since) = httpdate::parse_http_date(value.trim()) else {
        return true;
    };

    unix_secs(modified) > unix_secs(since)
}

/// Whole seconds since the epoch; times before it count as the epoch itself.
pub fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn sub_second_mtime_is_not_newer_than_header() {
        let header = httpdate::fmt_http_date(UNIX_EPOCH + Duration::from_secs(1_000));
        let mtime = UNIX_EPOCH + Duration::from_millis(1_000_900);

        assert!(!is_modified_since(mtime, Some(&header)));
    }

    #[test]
    fn pre_epoch_mtime_is_treated_as_epoch() {
        let mtime = UNIX_EPOCH - Duration::from_secs(60);

        assert_eq!(unix_secs(mtime), 0);
        assert!(!is_modified_since(mtime, Some("Thu, 01 Jan 1970 00:00:00 GMT")));
    }
}
