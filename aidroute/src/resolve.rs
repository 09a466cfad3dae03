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
use log::{debug, error, info, trace};

use crate::{
    config::Config,
    error::SkipReason,
    model::{ResolutionResult, ResultSchema, RoutingTable},
};

/// Something worth reporting about a resolution that was left to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub query_aid: String,
    pub reason: SkipReason,
}

/// Receives diagnostics for broken catch-all registrations.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn report(&self, diagnostic: &Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Drops every diagnostic. `resolve` already logs them.
impl DiagnosticSink for () {
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Routes every AID resolution to the service registered under the
/// catch-all AID, when there is one.
#[derive(Debug, Clone)]
pub struct AidResolutionOverride<S = ()> {
    catch_all_aid: String,
    schema: ResultSchema,
    sink: S,
}

impl AidResolutionOverride {
    pub fn new(catch_all_aid: impl Into<String>) -> Self {
        Self {
            catch_all_aid: catch_all_aid.into(),
            schema: ResultSchema::default(),
            sink: (),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.catch_all_aid.clone())
    }
}

impl<S: DiagnosticSink> AidResolutionOverride<S> {
    pub fn with_schema(mut self, schema: ResultSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_sink<T: DiagnosticSink>(self, sink: T) -> AidResolutionOverride<T> {
        AidResolutionOverride {
            catch_all_aid: self.catch_all_aid,
            schema: self.schema,
            sink,
        }
    }

    pub fn catch_all_aid(&self) -> &str {
        &self.catch_all_aid
    }

    pub fn schema(&self) -> ResultSchema {
        self.schema
    }

    /// The override for `query_aid`, or `None` to let the host resolve it
    /// the normal way.
    ///
    /// `table` is only read. A catch-all entry without any service is logged
    /// at error level and reported to the sink once per call.
    pub fn resolve(&self, query_aid: &str, table: &RoutingTable) -> Option<ResolutionResult> {
        match self.decide(query_aid, table) {
            Ok(result) => {
                if let Some(service) = result.service() {
                    debug!("rerouted aid {query_aid} to catch-all service {service}");
                }
                Some(result)
            }
            Err(reason @ SkipReason::EmptyQuery) => {
                trace!("{reason}, deferring");
                None
            }
            Err(reason @ SkipReason::NoCatchAllRegistered { .. }) => {
                info!("{reason}, no rerouting for {query_aid}");
                None
            }
            Err(reason @ SkipReason::InconsistentEntry { .. }) => {
                error!(
                    "resolve {query_aid}: {reason}, is the catch-all service registered correctly?"
                );
                self.sink.report(&Diagnostic {
                    query_aid: query_aid.to_string(),
                    reason,
                });
                None
            }
        }
    }

    /// Same rule as [`resolve`](Self::resolve), with the reason for leaving
    /// a query to the host and without logging or reporting anything.
    pub fn decide(
        &self,
        query_aid: &str,
        table: &RoutingTable,
    ) -> Result<ResolutionResult, SkipReason> {
        if query_aid.is_empty() {
            return Err(SkipReason::EmptyQuery);
        }

        let entry = table
            .get(&self.catch_all_aid)
            .ok_or_else(|| SkipReason::NoCatchAllRegistered {
                aid: self.catch_all_aid.clone(),
                table_len: table.len(),
            })?;

        let service = entry
            .preferred_service()
            .ok_or_else(|| SkipReason::InconsistentEntry {
                aid: self.catch_all_aid.clone(),
            })?;

        Ok(ResolutionResult::single(
            service.clone(),
            query_aid,
            self.schema,
        ))
    }
}
