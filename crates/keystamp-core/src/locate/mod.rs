mod constants;
mod field;
mod image_region;
mod key;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::encoding::Platform;
use crate::error::{Error, Result};

pub use constants::*;
pub use field::*;
pub use image_region::*;
pub use key::*;

/// The same logical field located once per Mac architecture slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformBundle<T> {
    pub ppc: Option<T>,
    pub x86: Option<T>,
    pub x64: Option<T>,
}

impl<T> Default for PlatformBundle<T> {
    fn default() -> Self {
        Self {
            ppc: None,
            x86: None,
            x64: None,
        }
    }
}

impl<T: Copy> PlatformBundle<T> {
    pub fn get(&self, platform: Platform) -> Option<T> {
        match platform {
            Platform::MacPpc => self.ppc,
            Platform::MacX86 => self.x86,
            Platform::MacX64 => self.x64,
            Platform::Windows => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ppc.is_none() && self.x86.is_none() && self.x64.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.ppc.is_some() && self.x86.is_some() && self.x64.is_some()
    }
}

/// `ppcValue,x86Value,x64Value`, `-` for a member that was not found
impl<T: fmt::Display> fmt::Display for PlatformBundle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let member = |value: &Option<T>| match value {
            Some(v) => v.to_string(),
            None => "-".to_string(),
        };
        write!(
            f,
            "{},{},{}",
            member(&self.ppc),
            member(&self.x86),
            member(&self.x64)
        )
    }
}

impl<T> FromStr for PlatformBundle<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [ppc, x86, x64] = parts.as_slice() else {
            return Err(Error::Validation(format!(
                "Platform bundle '{}' must have 3 comma-separated fields",
                s
            )));
        };

        let member = |value: &str| -> Result<Option<T>> {
            if value == "-" {
                return Ok(None);
            }
            value
                .parse::<T>()
                .map(Some)
                .map_err(|e| Error::Validation(format!("Invalid bundle member '{}': {}", value, e)))
        };

        Ok(Self {
            ppc: member(*ppc)?,
            x86: member(*x86)?,
            x64: member(*x64)?,
        })
    }
}
