
use chrono::{DateTime, Utc};


/// Milliseconds between the Unix epoch and the first second of 2015.
const DISCORD_EPOCH: i64 = 1_420_070_400_000;

const UNITS: [(u64, &str); 4] = [
    (24 * 60 * 60, "day"),
    (60 * 60,      "hour"),
    (60,           "minute"),
    (1,            "second"),
];

/// Renders seconds largest unit first, e.g. `2 hours, 5 minutes`.
pub fn format_duration(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let mut rest = seconds.unsigned_abs();
    let mut parts = Vec::new();
    for (size, name) in UNITS {
        let amount = rest / size;
        rest %= size;
        if amount > 0 {
            let plural = if amount == 1 { "" } else { "s" };
            parts.push(format!("{} {}{}", amount, name, plural));
        }
    }
    match parts.is_empty() {
        true  => "0 seconds".to_string(),
        false => format!("{}{}", sign, parts.join(", "))
    }
}

pub fn creation_time(snowflake: u64) -> Option<DateTime<Utc>> {
    let millis = (snowflake >> 22) as i64 + DISCORD_EPOCH;
    DateTime::from_timestamp_millis(millis)
}

pub fn format_creation_time(snowflake: u64) -> String {
    match creation_time(snowflake) {
        Some(time) => time.to_rfc2822(),
        None => "Unknown".to_string()
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn durations_are_largest_unit_first() {
        assert_eq!(format_duration(3600), "1 hour");
        assert_eq!(format_duration(43200), "12 hours");
        assert_eq!(format_duration(3725), "1 hour, 2 minutes, 5 seconds");
        assert_eq!(format_duration(90061), "1 day, 1 hour, 1 minute, 1 second");
        assert_eq!(format_duration(0), "0 seconds");
    }

    #[test]
    fn overdue_durations_keep_their_sign() {
        assert_eq!(format_duration(-120), "-2 minutes");
    }

    #[test]
    fn creation_time_is_read_from_the_snowflake() {
        let epoch = format_creation_time(0);
        assert!(epoch.starts_with("Thu, "));
        assert!(epoch.contains("1 Jan 2015 00:00:00 +0000"));
        let time = creation_time(175928847299117063).unwrap();
        assert_eq!(time.timestamp_millis(), 1462015105796);
    }

}
