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
use std::{
    ffi::{CStr, CString},
    slice,
};

use aidroute::{ResolutionResult, RouteEntry, RoutingTable, ServiceRecord};
use libc::{c_char, size_t};

use crate::c_str;

/// Routing table snapshot handed over by the interception layer.
#[derive(Debug, Default)]
pub struct AidTable {
    routes: RoutingTable,
}

impl AidTable {
    pub fn routes(&self) -> &RoutingTable {
        &self.routes
    }

    /// `None` if any pointer is invalid, in which case nothing is registered.
    pub unsafe fn register(
        &mut self,
        aid: *const c_char,
        default_service: *const c_char,
        services: *const *const c_char,
        count: size_t,
    ) -> Option<()> {
        let aid = c_str(aid)?;

        let default_service = if default_service.is_null() {
            None
        } else {
            Some(ServiceRecord::from(c_str(default_service)?))
        };

        let services = if count == 0 {
            Vec::new()
        } else if services.is_null() {
            return None;
        } else {
            slice::from_raw_parts(services, count)
                .iter()
                .map(|&s| c_str(s).map(ServiceRecord::from))
                .collect::<Option<Vec<_>>>()?
        };

        self.routes
            .insert(aid, RouteEntry::new(default_service, services));
        Some(())
    }
}

/// A resolution result in C-readable form.
#[derive(Debug)]
pub struct AidResolveInfo {
    service: CString,
    aid: Option<CString>,
    category: Option<CString>,
}

impl AidResolveInfo {
    pub fn new(result: ResolutionResult) -> Option<Self> {
        let service = CString::new(result.service()?.as_str()).ok()?;
        let aid = result.aid.map(CString::new).transpose().ok()?;
        let category = result
            .category
            .map(|c| CString::new(c.as_str()))
            .transpose()
            .ok()?;

        Some(Self {
            service,
            aid,
            category,
        })
    }

    pub fn service(&self) -> &CStr {
        &self.service
    }

    pub fn aid(&self) -> Option<&CStr> {
        self.aid.as_deref()
    }

    pub fn category(&self) -> Option<&CStr> {
        self.category.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use std::ptr;

    use super::*;
    use crate::{
        aid_resolve_info_aid, aid_resolve_info_category, aid_resolve_info_free,
        aid_resolve_info_service, aid_route_resolve, aid_table_free, aid_table_new,
        aid_table_register,
    };


    unsafe fn read(s: *const c_char) -> Option<String> {
        (!s.is_null()).then(|| CStr::from_ptr(s).to_string_lossy().into_owned())
    }

    unsafe fn register(
        table: *mut AidTable,
        aid: &CStr,
        default: Option<&CStr>,
        services: &[&CStr],
    ) -> libc::c_int {
        let services: Vec<*const c_char> = services.iter().map(|s| s.as_ptr()).collect();
        aid_table_register(
            table,
            aid.as_ptr(),
            default.map_or(ptr::null(), CStr::as_ptr),
            services.as_ptr(),
            services.len(),
        )
    }

    #[test]
    fn resolves_through_c_abi() {
        unsafe {
            let table = aid_table_new();
            let services = [c"CardReaderAppX", c"Other"];
            assert_eq!(register(table, c"F04E66E75C02D8", None, &services), 0);
            assert_eq!(
                register(table, c"A000000003", Some(c"VisaApp"), &[c"VisaApp"]),
                0
            );

            let info = aid_route_resolve(table, c"A000000003".as_ptr(), true, true);
            assert!(!info.is_null());
            assert_eq!(
                read(aid_resolve_info_service(info)).as_deref(),
                Some("CardReaderAppX")
            );
            assert_eq!(
                read(aid_resolve_info_aid(info)).as_deref(),
                Some("A000000003")
            );
            assert_eq!(
                read(aid_resolve_info_category(info)).as_deref(),
                Some("payment")
            );

            aid_resolve_info_free(info);
            aid_table_free(table);
        }
    }

    #[test]
    fn legacy_hosts_get_aid_but_no_category() {
        unsafe {
            let table = aid_table_new();
            register(table, c"F04E66E75C02D8", Some(c"CardReaderAppX"), &[]);

            let info = aid_route_resolve(table, c"A000000003".as_ptr(), true, false);
            assert_eq!(
                read(aid_resolve_info_service(info)).as_deref(),
                Some("CardReaderAppX")
            );
            assert_eq!(
                read(aid_resolve_info_aid(info)).as_deref(),
                Some("A000000003")
            );
            assert!(aid_resolve_info_category(info).is_null());

            aid_resolve_info_free(info);
            aid_table_free(table);
        }
    }

    #[test]
    fn fills_only_fields_the_host_has() {
        unsafe {
            let table = aid_table_new();
            register(table, c"F04E66E75C02D8", Some(c"CardReaderAppX"), &[]);

            let info = aid_route_resolve(table, c"A000000003".as_ptr(), false, true);
            assert!(aid_resolve_info_aid(info).is_null());
            assert_eq!(
                read(aid_resolve_info_category(info)).as_deref(),
                Some("payment")
            );

            aid_resolve_info_free(info);
            aid_table_free(table);
        }
    }

    #[test]
    fn defers_to_host() {
        unsafe {
            let table = aid_table_new();
            register(table, c"A000000003", Some(c"VisaApp"), &[c"VisaApp"]);

            assert!(aid_route_resolve(table, c"A000000003".as_ptr(), true, true).is_null());
            assert!(aid_route_resolve(table, c"".as_ptr(), true, true).is_null());
            assert!(aid_route_resolve(table, ptr::null(), true, true).is_null());
            assert!(aid_route_resolve(ptr::null(), c"A000000003".as_ptr(), true, true).is_null());

            aid_table_free(table);
        }
    }

    #[test]
    fn catch_all_without_services_defers() {
        unsafe {
            let table = aid_table_new();
            register(table, c"F04E66E75C02D8", None, &[]);

            assert!(aid_route_resolve(table, c"A000000003".as_ptr(), true, true).is_null());

            aid_table_free(table);
        }
    }

    #[test]
    fn rejects_invalid_registrations() {
        unsafe {
            let table = aid_table_new();

            assert_eq!(
                aid_table_register(table, ptr::null(), ptr::null(), ptr::null(), 0),
                -libc::EINVAL
            );
            let aid = c"F04E66E75C02D8".as_ptr();
            assert_eq!(
                aid_table_register(table, aid, ptr::null(), ptr::null(), 2),
                -libc::EINVAL
            );

            let invalid_utf8 = [0xffu8, 0];
            let services = [invalid_utf8.as_ptr() as *const c_char];
            assert_eq!(
                aid_table_register(
                    table,
                    aid,
                    ptr::null(),
                    services.as_ptr(),
                    services.len(),
                ),
                -libc::EINVAL
            );
            assert!((*table).routes().is_empty());

            assert_eq!(
                aid_table_register(ptr::null_mut(), aid, ptr::null(), ptr::null(), 0),
                -libc::EINVAL
            );

            aid_table_free(table);
        }
    }
}
