//! Access level enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Capability attached to a share grant.
///
/// Ordered by permissiveness: Edit > Download > View.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "access_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Read-only viewing.
    View,
    /// Viewing plus downloading the rendered document.
    Download,
    /// Full editing of the document.
    Edit,
}

impl AccessLevel {
    /// All levels from least to most permissive.
    pub const ALL: [AccessLevel; 3] = [Self::View, Self::Download, Self::Edit];

    /// Return the permissiveness rank (higher = more permissive).
    pub fn rank(&self) -> u8 {
        match self {
            Self::View => 1,
            Self::Download => 2,
            Self::Edit => 3,
        }
    }

    /// Check if this level grants at least the given level.
    pub fn has_at_least(&self, required: AccessLevel) -> bool {
        self.rank() >= required.rank()
    }

    /// Return the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Download => "download",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = docshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "download" => Ok(Self::Download),
            "edit" => Ok(Self::Edit),
            _ => Err(docshare_core::AppError::validation(format!(
                "Invalid access level: '{s}' (expected view, download or edit)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_by_permissiveness() {
        assert!(AccessLevel::Edit.has_at_least(AccessLevel::Download));
        assert!(AccessLevel::Download.has_at_least(AccessLevel::Download));
        assert!(!AccessLevel::View.has_at_least(AccessLevel::Download));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Download".parse::<AccessLevel>().unwrap(), AccessLevel::Download);
        assert_eq!(" edit ".parse::<AccessLevel>().unwrap(), AccessLevel::Edit);
        assert!("owner".parse::<AccessLevel>().is_err());
    }
}
