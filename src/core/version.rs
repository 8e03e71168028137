//! Three-component release versions
//!
//! A version is `major.minor.patch`, nothing more: no `v` prefix, no
//! pre-release or build metadata. Ordering is numeric field by field, which
//! the derived `Ord` gives us from the field declaration order.

use crate::core::error::{ConfigError, ShipResult, ResultExt, ValidationError};
use serde::{Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Which component of a version to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BumpPart {
  Major,
  Minor,
  Patch,
}

/// A release version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
  pub major: u64,
  pub minor: u64,
  pub patch: u64,
}

impl Version {
  pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
    Self { major, minor, patch }
  }

  /// Parse `major.minor.patch`
  ///
  /// Surrounding whitespace is ignored. Each component must be a non-empty run
  /// of ASCII digits; signs, prefixes and extra components are rejected.
  pub fn parse(input: &str) -> Result<Self, ValidationError> {
    let trimmed = input.trim();
    let invalid = |reason: &str| ValidationError::InvalidVersion {
      input: input.to_string(),
      reason: reason.to_string(),
    };

    if trimmed.is_empty() {
      return Err(invalid("empty version string"));
    }

    let parts: Vec<&str> = trimmed.split('.').collect();
    if parts.len() != 3 {
      return Err(invalid(&format!("expected 3 components, found {}", parts.len())));
    }

    let mut fields = [0u64; 3];
    for (slot, (part, name)) in fields.iter_mut().zip(parts.iter().zip(["major", "minor", "patch"])) {
      if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(&format!("{} component '{}' is not a number", name, part)));
      }
      *slot = part
        .parse()
        .map_err(|_| invalid(&format!("{} component '{}' is too large", name, part)))?;
    }

    Ok(Self::new(fields[0], fields[1], fields[2]))
  }

  /// The version a bump of `part` produces
  ///
  /// Fails when the bumped component is already at `u64::MAX`.
  pub fn bump(self, part: BumpPart) -> Result<Self, ValidationError> {
    let (field, name) = match part {
      BumpPart::Major => (self.major, "major"),
      BumpPart::Minor => (self.minor, "minor"),
      BumpPart::Patch => (self.patch, "patch"),
    };
    let next = field.checked_add(1).ok_or_else(|| ValidationError::InvalidVersion {
      input: self.to_string(),
      reason: format!("{} component cannot be bumped past {}", name, u64::MAX),
    })?;

    Ok(match part {
      BumpPart::Major => Self::new(next, 0, 0),
      BumpPart::Minor => Self::new(self.major, next, 0),
      BumpPart::Patch => Self::new(self.major, self.minor, next),
    })
  }

  /// Require `requested` to be strictly greater than `self`
  pub fn ensure_newer(self, requested: Version) -> Result<(), ValidationError> {
    if requested > self {
      Ok(())
    } else {
      Err(ValidationError::VersionNotNewer {
        current: self.to_string(),
        requested: requested.to_string(),
      })
    }
  }

  /// Read the version recorded in `path`
  ///
  /// The first non-empty line is the version; anything after it is ignored.
  pub fn load(path: &Path) -> ShipResult<Self> {
    if !path.exists() {
      return Err(ConfigError::VersionFileNotFound {
        path: path.to_path_buf(),
      }
      .into());
    }

    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let line = content.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");

    Ok(Self::parse(line)?)
  }

  /// Record this version in `path` as a single line
  pub fn save(&self, path: &Path) -> ShipResult<()> {
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(path, format!("{}\n", self)).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
  }
}

impl FromStr for Version {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl Serialize for Version {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}
