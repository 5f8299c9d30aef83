// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

#![no_main]

use libfuzzer_sys::fuzz_target;

use pkix_path::certificate::name::{GeneralNames, NameConstraints};
use pkix_path::certificate::{BackCert, IncludeCn};
use pkix_path::x509::{
    check_issuer_independent_properties, CertPolicyId, EndEntityOrCa, KeyPurposeId, KeyUsage,
    RequiredProperties, TrustLevel,
};
use pkix_path::Time;

// 2026-01-01T00:00:00Z
const VERIFY_TIME: u64 = 1_767_225_600;

fuzz_target!(|data: &[u8]| {
    for include_cn in [IncludeCn::No, IncludeCn::Yes] {
        let cert = match BackCert::new(data, None, include_cn) {
            Ok(cert) => cert,
            Err(_) => continue,
        };

        let _ = cert.parse_validity();
        if let Ok(time) = Time::from_unix_secs(VERIFY_TIME) {
            for role in [EndEntityOrCa::MustBeEndEntity, EndEntityOrCa::MustBeCa] {
                let required = RequiredProperties {
                    role,
                    key_usage: KeyUsage::NoParticularKeyUsageRequired,
                    eku: KeyPurposeId::ServerAuth,
                    policy: &CertPolicyId::ANY_POLICY,
                };
                let _ = check_issuer_independent_properties(
                    &cert,
                    time,
                    &required,
                    1,
                    TrustLevel::InheritsTrust,
                );
            }
        }
        if let Some(Ok(names)) = cert.subject_alt_name().map(GeneralNames::new) {
            for name in names {
                if name.is_err() {
                    break;
                }
            }
        }
        if let Some(nc) = cert.name_constraints() {
            if let Ok(constraints) = NameConstraints::parse(nc) {
                let _ = constraints.check(&cert);
            }
        }
    }
});
