/// Accepts a bare spreadsheet id or a full sheet URL and returns the bare id.
pub fn clean_spreadsheet_id(raw: &str) -> Option<String> {
	let raw = raw.trim();
	let tail = match raw.split_once("/d/") {
		Some((_, tail)) => tail,
		None => raw.strip_prefix("d/").unwrap_or(raw),
	};
	let id = tail.split(['/', '#', '?']).next().unwrap_or("").trim();

	if id.is_empty() {
		None
	} else {
		Some(id.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bare_id_is_kept() {
		assert_eq!(clean_spreadsheet_id("1AbC-dEf_0"), Some("1AbC-dEf_0".to_string()));
	}

	#[test]
	fn url_is_reduced_to_id() {
		assert_eq!(
			clean_spreadsheet_id("https://docs.google.com/spreadsheets/d/1AbC-dEf_0/edit#gid=0"),
			Some("1AbC-dEf_0".to_string())
		);
		assert_eq!(clean_spreadsheet_id("d/1AbC-dEf_0"), Some("1AbC-dEf_0".to_string()));
	}

	#[test]
	fn id_ending_in_d_is_not_split() {
		assert_eq!(
			clean_spreadsheet_id("https://docs.google.com/spreadsheets/d/1AbCd/edit#gid=0"),
			Some("1AbCd".to_string())
		);
		assert_eq!(clean_spreadsheet_id("1AbCd"), Some("1AbCd".to_string()));
	}

	#[test]
	fn fragment_and_query_are_dropped() {
		assert_eq!(
			clean_spreadsheet_id("https://docs.google.com/spreadsheets/d/1AbC#gid=123"),
			Some("1AbC".to_string())
		);
		assert_eq!(
			clean_spreadsheet_id("https://docs.google.com/spreadsheets/d/1AbC?usp=sharing"),
			Some("1AbC".to_string())
		);
	}

	#[test]
	fn empty_input_is_none() {
		assert_eq!(clean_spreadsheet_id(""), None);
		assert_eq!(clean_spreadsheet_id("   "), None);
		assert_eq!(clean_spreadsheet_id("https://docs.google.com/spreadsheets/d/"), None);
	}
}
