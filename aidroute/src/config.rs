/* Copyright 2023 shadow3aaa@gitbub.com
*
*  Licensed under the Apache License, Version 2.0 (the "License");
*  you may not use this file except in compliance with the License.
*  You may obtain a copy of the License at
*
*      http://www.apache.org/licenses/LICENSE-2.0
*
*  Unless required by applicable law or agreed to in writing, software
*  distributed under the License is distributed on an "AS IS" BASIS,
*  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
*  See the License for the specific language governing permissions and
*  limitations under the License. */
use std::{fs, io, path::Path};

use serde::Deserialize;

use crate::error::ConfigError;

/// AID the catch-all service declares in its manifest. Arbitrary, it only
/// has to match what the service registers.
pub const DEFAULT_CATCH_ALL_AID: &str = "F04E66E75C02D8";

// ISO 7816-4 AIDs are 5 to 16 bytes.
const MIN_AID_BYTES: usize = 5;
const MAX_AID_BYTES: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub catch_all_aid: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catch_all_aid: DEFAULT_CATCH_ALL_AID.to_string(),
        }
    }
}

impl Config {
    pub fn new(catch_all_aid: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            catch_all_aid: catch_all_aid.into(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the config at `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// The AID is kept in whatever case it was written in, since lookups
    /// against the host table are case sensitive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let aid = &self.catch_all_aid;
        let invalid = |reason| ConfigError::InvalidAid {
            aid: aid.clone(),
            reason,
        };

        if !aid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid("not a hex string"));
        }
        if aid.len() % 2 != 0 {
            return Err(invalid("odd number of hex digits"));
        }

        let bytes = aid.len() / 2;
        if !(MIN_AID_BYTES..=MAX_AID_BYTES).contains(&bytes) {
            return Err(invalid("must be 5 to 16 bytes long"));
        }

        Ok(())
    }
}
