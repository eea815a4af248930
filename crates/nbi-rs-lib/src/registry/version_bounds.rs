use serde::{Serialize, Deserialize};

/// A generic enum to describe an inclusive range of versions.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionBounds<T>
where T: std::cmp::PartialEq + std::cmp::Ord + std::clone::Clone,
{
	#[default] Any,
	Explicit(T),
	MinOnly(T),
	MaxOnly(T),
	MinMax(T, T),
}

impl<T> VersionBounds<T>
where T: std::cmp::PartialEq + std::cmp::Ord + std::clone::Clone,
{
	/// When all arguments are `None` will return `Any`
	pub fn new(explicit: Option<T>, min: Option<T>, max: Option<T>) -> crate::Result<VersionBounds<T>> {
		match (explicit, min, max) {
			(None, min, max) => Ok(Self::from_range(min, max)),
			(Some(e), None, None) => Ok(VersionBounds::Explicit(e)),
			_ => Err(crate::Error::Parse("Attempted to create bounds with both explicit and min or max version constraint".to_string()))
		}
	}

	/// Bounds from an optional lower and upper version, an absent side is unbounded.
	pub fn from_range(lower: Option<T>, upper: Option<T>) -> VersionBounds<T> {
		match (lower, upper) {
			(None, None) => VersionBounds::Any,
			(None, Some(max)) => VersionBounds::MaxOnly(max),
			(Some(min), None) => VersionBounds::MinOnly(min),
			(Some(min), Some(max)) if min == max => VersionBounds::Explicit(min),
			(Some(min), Some(max)) => VersionBounds::MinMax(min, max),
		}
	}

	pub fn lower(&self) -> Option<&T> {
		match self {
			VersionBounds::Explicit(v) | VersionBounds::MinOnly(v) | VersionBounds::MinMax(v, _) => Some(v),
			VersionBounds::Any | VersionBounds::MaxOnly(_) => None,
		}
	}

	pub fn upper(&self) -> Option<&T> {
		match self {
			VersionBounds::Explicit(v) | VersionBounds::MaxOnly(v) | VersionBounds::MinMax(_, v) => Some(v),
			VersionBounds::Any | VersionBounds::MinOnly(_) => None,
		}
	}

	pub fn is_version_within(&self, other: &T) -> bool {
		match self {
			VersionBounds::Any => true,
			VersionBounds::Explicit(v) => other == v,
			VersionBounds::MinOnly(min) => other >= min,
			VersionBounds::MaxOnly(max) => other <= max,
			VersionBounds::MinMax(min, max) => min <= other && other <= max,
		}
	}

	/// Gets the intersection between the bounds, if no intersection exists returns `None`
	pub fn inner_join(&self, other: &Self) -> Option<Self> {
		let lower = match (self.lower(), other.lower()) {
			(Some(a), Some(b)) => Some(std::cmp::max(a, b).clone()),
			(a, b) => a.or(b).cloned(),
		};
		let upper = match (self.upper(), other.upper()) {
			(Some(a), Some(b)) => Some(std::cmp::min(a, b).clone()),
			(a, b) => a.or(b).cloned(),
		};

		if let (Some(min), Some(max)) = (&lower, &upper) {
			/* Bounds are inclusive so touching ranges still share a version */
			if min > max {
				return None
			}
		}

		Some(Self::from_range(lower, upper))
	}
}

impl<T> std::fmt::Display for VersionBounds<T>
where T: std::cmp::PartialEq + std::cmp::Ord + std::clone::Clone + std::fmt::Display,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			VersionBounds::Any => write!(f, "*"),
			VersionBounds::Explicit(v) => write!(f, "{}", v),
			VersionBounds::MinOnly(min) => write!(f, "{} - *", min),
			VersionBounds::MaxOnly(max) => write!(f, "* - {}", max),
			VersionBounds::MinMax(min, max) => write!(f, "{} - {}", min, max),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test] fn bounds_equal_ends_are_explicit() { assert_eq!(VersionBounds::from_range(Some(1), Some(1)), VersionBounds::Explicit(1)) }
	#[test] fn bounds_are_inclusive() { assert!(VersionBounds::MinMax(1, 3).is_version_within(&3)) }
	#[test] fn bounds_any_contains_everything() { assert!(VersionBounds::<i32>::Any.is_version_within(&i32::MAX)) }
	#[test] fn bounds_min_only_rejects_lower() { assert!(!VersionBounds::MinOnly(2).is_version_within(&1)) }
	#[test] fn bounds_explicit_with_range_is_err() { assert!(VersionBounds::new(Some(1), Some(0), None).is_err()) }
	#[test] fn bounds_join_disjoint_is_none() { assert_eq!(VersionBounds::MinMax(1, 2).inner_join(&VersionBounds::MinMax(3, 4)), None) }
	#[test] fn bounds_join_touching_is_explicit() { assert_eq!(VersionBounds::MinMax(1, 3).inner_join(&VersionBounds::MinOnly(3)), Some(VersionBounds::Explicit(3))) }
	#[test] fn bounds_join_any_is_identity() { assert_eq!(VersionBounds::Any.inner_join(&VersionBounds::MaxOnly(5)), Some(VersionBounds::MaxOnly(5))) }
	#[test] fn bounds_join_overlap() { assert_eq!(VersionBounds::MinMax(1, 5).inner_join(&VersionBounds::MinMax(3, 9)), Some(VersionBounds::MinMax(3, 5))) }
}
