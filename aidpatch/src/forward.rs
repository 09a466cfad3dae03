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
use std::ffi::CStr;

use aidroute::{AidResolutionOverride, Config, ResolutionResult, ResultSchema, RoutingTable};

/// AID routing lives in the NFC service process.
pub const TARGET_PACKAGE: &str = "com.android.nfc";

pub enum Forward {
    Allow,
    Override(ResolutionResult),
}

pub fn should_patch(package: &str) -> bool {
    package == TARGET_PACKAGE
}

/// `RegisteredAidCache` methods that do the routing. Hook every one the host
/// has; older hosts only have `resolveAidPrefix`.
pub const HOOKED_METHODS: [&CStr; 2] = [c"resolveAidPrefix", c"resolveAid"];

pub fn resolve_forward(
    config: &Config,
    table: &RoutingTable,
    aid: &str,
    schema: ResultSchema,
) -> Forward {
    AidResolutionOverride::from_config(config)
        .with_schema(schema)
        .resolve(aid, table)
        .map_or(Forward::Allow, Forward::Override)
}
