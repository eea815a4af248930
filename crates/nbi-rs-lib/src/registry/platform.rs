use serde::*;

const GENERIC: &str = "generic";
const UNIX: &str = "unix";

/// Operating systems that a `unix` product platform covers.
const UNIX_FLAVOURS: &[&str] = &["linux", "solaris", "macosx", "freebsd", "openbsd", "aix", "hpux"];

/// A platform descriptor of the form `os[-arch]`, e.g. `linux-x64` or `windows`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Platform {
	os: String,
	arch: Option<String>,
}

impl Platform {
	pub fn new(s: &str) -> crate::Result<Self> {
		let s = s.trim().to_lowercase();
		if s.is_empty() || s.contains(char::is_whitespace) {
			return Err(crate::Error::Parse(format!("invalid platform `{}`", s)))
		}

		match s.split_once('-') {
			Some((os, arch)) if !os.is_empty() && !arch.is_empty() => Ok(Platform { os: os.to_string(), arch: Some(arch.to_string()) }),
			Some(_) => Err(crate::Error::Parse(format!("invalid platform `{}`", s))),
			None => Ok(Platform { os: s, arch: None }),
		}
	}

	/// A platform every target is compatible with.
	pub fn generic() -> Self {
		Platform { os: GENERIC.to_string(), arch: None }
	}

	/// The platform of the running process.
	pub fn current() -> Self {
		let os = match std::env::consts::OS {
			"macos" => "macosx",
			other => other,
		};
		let arch = match std::env::consts::ARCH {
			"x86_64" => "x64",
			"aarch64" => "arm64",
			other => other,
		};
		Platform { os: os.to_string(), arch: Some(arch.to_string()) }
	}

	pub fn os(&self) -> &str {
		&self.os
	}

	pub fn arch(&self) -> Option<&str> {
		self.arch.as_deref()
	}

	pub fn is_generic(&self) -> bool {
		self.os == GENERIC
	}

	/// Checks if a product built for `other` can be installed on this (target) platform.
	pub fn is_compatible_with(&self, other: &Platform) -> bool {
		if other.is_generic() { return true }

		let os_matches = self.os == other.os
			|| (other.os == UNIX && UNIX_FLAVOURS.contains(&self.os.as_str()));
		if !os_matches { return false }

		match (&self.arch, &other.arch) {
			(_, None) => true,
			(Some(lhs), Some(rhs)) => lhs == rhs,
			(None, Some(_)) => false,
		}
	}

	/// Checks if either platform is compatible with the other.
	pub fn intersects(lhs: &Platform, rhs: &Platform) -> bool {
		lhs.is_compatible_with(rhs) || rhs.is_compatible_with(lhs)
	}
}

impl TryFrom<String> for Platform {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(&value) }
}

impl TryFrom<&str> for Platform {
	type Error = crate::Error;
	fn try_from(value: &str) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Platform> for String {
	fn from(value: Platform) -> Self {
		value.to_string()
	}
}

impl std::fmt::Display for Platform {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.arch {
			Some(arch) => write!(f, "{}-{}", self.os, arch),
			None => write!(f, "{}", self.os),
		}
	}
}
