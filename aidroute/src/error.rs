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
use std::{io, path::PathBuf};

use thiserror::Error;

/// Why a resolution was left to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("query aid is empty")]
    EmptyQuery,

    #[error("no service registered for catch-all aid {aid} (table has {table_len} entries)")]
    NoCatchAllRegistered { aid: String, table_len: usize },

    #[error("catch-all aid {aid} has neither a default service nor any registered service")]
    InconsistentEntry { aid: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid catch-all aid {aid:?}: {reason}")]
    InvalidAid { aid: String, reason: &'static str },
}
