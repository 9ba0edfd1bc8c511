/// Hex digest a device reports for its own server ID.
pub fn server_id_digest(server_id: &str) -> String {
	format!("{:x}", md5::compute(server_id.as_bytes()))
}

/// Check that a probe's reported digest belongs to `server_id`.
///
/// The comparison is case-sensitive against the lowercase hex digest, so
/// anything malformed simply fails to match.
pub fn verify_id(server_id: &str, digest: &str) -> bool {
	server_id_digest(server_id) == digest
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_known_digests() {
		assert_eq!(server_id_digest(""), "d41d8cd98f00b204e9800998ecf8427e");
		assert_eq!(server_id_digest("abc"), "900150983cd24fb0d6963f7d28e17f72");
	}

	#[test]
	fn test_verify_match() {
		assert!(verify_id("030344165", "36e618cde8a29a8a8ef945ae21402312"));
	}

	#[test]
	fn test_verify_is_case_sensitive() {
		assert!(!verify_id("030344165", "36E618CDE8A29A8A8EF945AE21402312"));
	}

	#[test]
	fn test_verify_rejects_malformed() {
		assert!(!verify_id("030344165", ""));
		assert!(!verify_id("030344165", "00000000000000000000000000000000"));
		assert!(!verify_id("030344165", "not hex at all"));
	}

	#[test]
	fn test_single_character_change() {
		let digest = server_id_digest("030344165");
		for (i, c) in "030344165".char_indices() {
			let replacement = if c == '9' { '8' } else { '9' };
			let mut changed = String::from("030344165");
			changed.replace_range(i..i + 1, &replacement.to_string());
			assert!(!verify_id(&changed, &digest), "{}", changed);
		}
	}
}
