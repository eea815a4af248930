use serde::*;

/// A dotted numeric product version such as `6.9.1`.
///
/// Missing trailing segments count as zero so `1.0` and `1.0.0.0` are the same version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
	segments: Vec<u64>,
}

impl Version {
	pub fn new(version: &str) -> crate::Result<Self> {
		let version = version.trim();
		if version.is_empty() {
			return Err(crate::Error::Parse("empty version string".to_string()))
		}

		let segments = version.split('.')
			.map(|s| s.parse::<u64>().map_err(|_| crate::Error::Parse(format!("invalid version segment `{}` in `{}`", s, version))))
			.collect::<crate::Result<Vec<_>>>()?;

		Ok(Version { segments })
	}

	pub fn segments(&self) -> &[u64] {
		&self.segments
	}

	/// Segments without the trailing zeros, used for every comparison.
	fn significant(&self) -> &[u64] {
		let len = self.segments.iter().rposition(|s| *s != 0).map_or(0, |i| i + 1);
		&self.segments[..len]
	}
}

impl TryFrom<String> for Version {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(&value) }
}

impl TryFrom<&str> for Version {
	type Error = crate::Error;
	fn try_from(value: &str) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Version> for String {
	fn from(value: Version) -> Self {
		value.to_string()
	}
}

impl std::str::FromStr for Version {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
}

impl PartialEq for Version {
	fn eq(&self, other: &Self) -> bool {
		self.significant() == other.significant()
	}
}

impl Eq for Version {}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		let lhs = self.significant();
		let rhs = other.significant();

		for i in 0..lhs.len().max(rhs.len()) {
			let l = lhs.get(i).copied().unwrap_or(0);
			let r = rhs.get(i).copied().unwrap_or(0);
			match l.cmp(&r) {
				std::cmp::Ordering::Equal => {},
				ord => return ord,
			}
		}

		std::cmp::Ordering::Equal
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::hash::Hash for Version {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.significant().hash(state);
	}
}

impl std::fmt::Display for Version {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let parts = self.segments.iter().map(|s| s.to_string()).collect::<Vec<_>>();
		write!(f, "{}", parts.join("."))
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test] fn version_segments_are_not_compared_lexically() { assert!(Version::new("1.2.4").unwrap() < Version::new("1.2.10").unwrap()) }
	#[test] fn version_trailing_zeros_are_eq() { assert!(Version::new("1.0").unwrap() == Version::new("1.0.0.0").unwrap()) }
	#[test] fn version_short_version_is_lt() { assert!(Version::new("1.2").unwrap() < Version::new("1.2.1").unwrap()) }
	#[test] fn version_higher_version_is_gt() { assert!(Version::new("2.0").unwrap() > Version::new("1.9.9").unwrap()) }
	#[test] fn version_rejects_garbage() { assert!(Version::new("1.x").is_err()) }
	#[test] fn version_rejects_empty() { assert!(Version::new("").is_err()) }
	#[test] fn version_keeps_trailing_zero_segments() { assert_eq!(Version::new("6.9.0").unwrap().segments(), &[6, 9, 0]) }
	#[test] fn version_display_keeps_segments() { assert_eq!(Version::new("6.9.0").unwrap().to_string(), "6.9.0") }

	#[test]
	fn version_hash_matches_eq() {
		use std::collections::HashSet;
		let mut set = HashSet::new();
		set.insert(Version::new("1.0").unwrap());
		assert!(set.contains(&Version::new("1.0.0").unwrap()));
	}
}
