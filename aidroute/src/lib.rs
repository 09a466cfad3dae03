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
//! Catch-all AID routing for NFC host card emulation.
//!
//! Given the AID the NFC stack is resolving and a snapshot of its routing
//! table, [`AidResolutionOverride`] decides whether the query should be
//! handed to the service registered under the wildcard AID instead of
//! whatever the table would normally select.

mod config;
mod error;
mod model;
mod resolve;

pub use config::{Config, DEFAULT_CATCH_ALL_AID};
pub use error::{ConfigError, SkipReason};
pub use model::{
    Category, ResolutionResult, ResultSchema, RouteEntry, RoutingTable, ServiceRecord,
};
pub use resolve::{AidResolutionOverride, Diagnostic, DiagnosticSink};
