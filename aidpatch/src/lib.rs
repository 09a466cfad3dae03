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
#![allow(clippy::missing_safety_doc)]

//! Native half of the NFC catch-all routing patch.
//!
//! The interception layer inside `com.android.nfc` loads this library, hands
//! over a snapshot of the AID routing table through the `aid_table_*` calls
//! and asks `aid_route_resolve` whether to replace the host's resolution.

mod forward;
mod table;

use std::{ffi::CStr, ptr};

use aidroute::{Config, ResultSchema};
use anyhow::Context;
#[cfg(not(test))]
use ctor::ctor;
use libc::{c_char, c_int, size_t};
use log::{error, warn};
use once_cell::sync::Lazy;

use forward::{resolve_forward, Forward};
use table::{AidResolveInfo, AidTable};

#[cfg(not(test))]
const CONFIG_PATH: &str = "/data/adb/modules/nfc_aid_routing/config.toml";

#[cfg(not(test))]
static CONFIG: Lazy<Config> = Lazy::new(|| load_config(CONFIG_PATH));

#[cfg(test)]
static CONFIG: Lazy<Config> = Lazy::new(Config::default);

#[cfg(not(test))]
#[ctor]
fn patch_main() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Info)
            .with_tag("NfcAidRouting"),
    );

    log::info!(
        "loaded, rerouting all aids to the service behind {}",
        CONFIG.catch_all_aid
    );
}

fn load_config(path: &str) -> Config {
    match Config::load(path).with_context(|| format!("load {path}")) {
        Ok(config) => config,
        Err(e) => {
            error!("{e:?}");
            warn!(
                "falling back to catch-all aid {}",
                aidroute::DEFAULT_CATCH_ALL_AID
            );
            Config::default()
        }
    }
}

unsafe fn c_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }

    CStr::from_ptr(s).to_str().ok()
}

/// Whether the process named `package` is the one to patch.
#[no_mangle]
pub unsafe extern "C" fn aid_route_should_patch(package: *const c_char) -> bool {
    c_str(package).is_some_and(forward::should_patch)
}

/// Name of the `index`th host method to intercept, or null past the end.
#[no_mangle]
pub extern "C" fn aid_route_hook_method(index: size_t) -> *const c_char {
    forward::HOOKED_METHODS
        .get(index)
        .map_or(ptr::null(), |m| m.as_ptr())
}

#[no_mangle]
pub extern "C" fn aid_table_new() -> *mut AidTable {
    Box::into_raw(Box::default())
}

#[no_mangle]
pub unsafe extern "C" fn aid_table_free(table: *mut AidTable) {
    if !table.is_null() {
        drop(Box::from_raw(table));
    }
}

/// Registers `aid` with its services, in registration order.
///
/// `default_service` may be null. Returns 0, or `-EINVAL` leaving the table
/// untouched.
#[no_mangle]
pub unsafe extern "C" fn aid_table_register(
    table: *mut AidTable,
    aid: *const c_char,
    default_service: *const c_char,
    services: *const *const c_char,
    count: size_t,
) -> c_int {
    let Some(table) = table.as_mut() else {
        return -libc::EINVAL;
    };

    match table.register(aid, default_service, services, count) {
        Some(()) => 0,
        None => -libc::EINVAL,
    }
}

/// Decides the resolution of `aid` against `table`.
///
/// Null means the host should resolve it itself. `has_aid` and
/// `has_category` say whether the host's resolve-info class has those
/// fields, so only those get filled in.
#[no_mangle]
pub unsafe extern "C" fn aid_route_resolve(
    table: *const AidTable,
    aid: *const c_char,
    has_aid: bool,
    has_category: bool,
) -> *mut AidResolveInfo {
    let (Some(table), Some(aid)) = (table.as_ref(), c_str(aid)) else {
        warn!("aid_route_resolve: invalid arguments, deferring to host");
        return ptr::null_mut();
    };

    let schema = ResultSchema::new(has_aid, has_category);
    match resolve_forward(&CONFIG, table.routes(), aid, schema) {
        Forward::Allow => ptr::null_mut(),
        Forward::Override(result) => AidResolveInfo::new(result)
            .map_or(ptr::null_mut(), |info| Box::into_raw(Box::new(info))),
    }
}

/// The one service the query was routed to.
#[no_mangle]
pub unsafe extern "C" fn aid_resolve_info_service(info: *const AidResolveInfo) -> *const c_char {
    info.as_ref().map_or(ptr::null(), |i| i.service().as_ptr())
}

/// The queried aid, or null if the host has no `aid` field.
#[no_mangle]
pub unsafe extern "C" fn aid_resolve_info_aid(info: *const AidResolveInfo) -> *const c_char {
    info.as_ref()
        .and_then(AidResolveInfo::aid)
        .map_or(ptr::null(), CStr::as_ptr)
}

/// The category tag, or null if the host has no `category` field.
#[no_mangle]
pub unsafe extern "C" fn aid_resolve_info_category(info: *const AidResolveInfo) -> *const c_char {
    info.as_ref()
        .and_then(AidResolveInfo::category)
        .map_or(ptr::null(), CStr::as_ptr)
}

#[no_mangle]
pub unsafe extern "C" fn aid_resolve_info_free(info: *mut AidResolveInfo) {
    if !info.is_null() {
        drop(Box::from_raw(info));
    }
}
