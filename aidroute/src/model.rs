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
use std::{collections::HashMap, fmt};

/// Opaque identity of an APDU service, usually its flattened component name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceRecord(String);

impl ServiceRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceRecord {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ServiceRecord {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Everything registered for one AID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteEntry {
    /// Set when exactly one service is the configured default for the AID.
    pub default_service: Option<ServiceRecord>,
    /// Registration order.
    pub services: Vec<ServiceRecord>,
}

impl RouteEntry {
    pub fn new(default_service: Option<ServiceRecord>, services: Vec<ServiceRecord>) -> Self {
        Self {
            default_service,
            services,
        }
    }

    /// The service a catch-all override promotes: the default if one is set,
    /// otherwise the first one registered.
    pub fn preferred_service(&self) -> Option<&ServiceRecord> {
        self.default_service.as_ref().or_else(|| self.services.first())
    }
}

/// Snapshot of the host's AID routing table.
///
/// AIDs are stored exactly as the host handed them over, no case folding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingTable {
    entries: HashMap<String, RouteEntry>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entry` under `aid`, replacing any previous entry.
    pub fn insert(&mut self, aid: impl Into<String>, entry: RouteEntry) -> Option<RouteEntry> {
        self.entries.insert(aid.into(), entry)
    }

    pub fn get(&self, aid: &str) -> Option<&RouteEntry> {
        self.entries.get(aid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A: Into<String>> FromIterator<(A, RouteEntry)> for RoutingTable {
    fn from_iter<I: IntoIterator<Item = (A, RouteEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(aid, e)| (aid.into(), e)).collect(),
        }
    }
}

/// Card emulation category, as in `CardEmulation.CATEGORY_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Payment,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Other => "other",
        }
    }
}

/// Which optional fields the host's resolve-info type carries.
///
/// The interception layer fills this in by looking for the fields on the
/// host class. `resolveAidPrefix` hosts have `aid` but no `category`,
/// `resolveAid` hosts have both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultSchema {
    pub aid: bool,
    pub category: bool,
}

impl ResultSchema {
    pub const LEGACY: Self = Self::new(true, false);
    pub const FULL: Self = Self::new(true, true);

    pub const fn new(aid: bool, category: bool) -> Self {
        Self { aid, category }
    }
}

impl Default for ResultSchema {
    fn default() -> Self {
        Self::FULL
    }
}

/// What the host gets back in place of its own resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub services: Vec<ServiceRecord>,
    pub default_service: Option<ServiceRecord>,
    pub aid: Option<String>,
    pub category: Option<Category>,
}

impl ResolutionResult {
    /// A result routing `aid` to `service` alone, filling only the fields
    /// `schema` knows about.
    pub fn single(service: ServiceRecord, aid: &str, schema: ResultSchema) -> Self {
        Self {
            services: vec![service.clone()],
            default_service: Some(service),
            aid: schema.aid.then(|| aid.to_string()),
            category: schema.category.then_some(Category::Payment),
        }
    }

    pub fn service(&self) -> Option<&ServiceRecord> {
        self.default_service.as_ref()
    }
}
