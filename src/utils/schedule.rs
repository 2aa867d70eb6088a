use chrono::{DateTime, Duration, NaiveTime, TimeZone};

pub fn parse_schedule_time(raw: &str) -> Option<NaiveTime> {
	NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

/// Next occurrence of `at` strictly after `now`, in `now`'s timezone.
pub fn next_run_after<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
	let tz = now.timezone();
	let mut day = now.date_naive();

	loop {
		// DST gaps can skip the wall-clock time entirely, `earliest` handles folds
		if let Some(candidate) = tz.from_local_datetime(&day.and_time(at)).earliest() {
			if candidate > *now {
				return candidate;
			}
		}
		day = day + Duration::days(1);
	}
}
