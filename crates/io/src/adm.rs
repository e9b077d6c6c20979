//! Administrative granularity levels.

use std::fmt;

use crate::error::IoError;

/// Administrative level of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AdmLevel {
    /// Whole country.
    Country = 0,
    /// First-level subdivision (region, province).
    Region = 1,
    /// Second-level subdivision (district).
    District = 2,
}

impl AdmLevel {
    /// All levels, in ascending order.
    pub const ALL: [AdmLevel; 3] = [AdmLevel::Country, AdmLevel::Region, AdmLevel::District];

    /// Numeric level as stored in tables.
    pub fn get(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for AdmLevel {
    type Error = IoError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(AdmLevel::Country),
            1 => Ok(AdmLevel::Region),
            2 => Ok(AdmLevel::District),
            _ => Err(IoError::InvalidAdmLevel {
                level: i64::from(level),
            }),
        }
    }
}

impl fmt::Display for AdmLevel {
    /// Formats as the path token used in result layouts, e.g. `adm1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "adm{}", self.get())
    }
}
