// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use std::cell::RefCell;

use pkix_path::crypto_backend::{self, RingBackend};
use pkix_path::error::{fail, ErrorCode, Result, Severity};
use pkix_path::prelude::*;
use pkix_path::trust_domain::find_issuer_among;

pub mod pki;

/// Default verification time, 2026-01-01T00:00:00Z.
pub const VERIFY_TIME: u64 = 1_767_225_600;

/// Default cap on OCSP response lifetime.
pub const OCSP_MAX_LIFETIME_DAYS: u16 = 10;

/// Verification time for the integration tests.
/// PKIX_TEST_VERIFY_TIME=<unix seconds> overrides the default.
pub fn verify_time() -> Time {
    let secs = std::env::var("PKIX_TEST_VERIFY_TIME")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(VERIFY_TIME);
    Time::from_unix_secs(secs).unwrap()
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// What to do when no stapled OCSP response is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationPolicy {
    SoftFail,
    HardFail,
}

/// Trust domain over in-memory certificate lists, verifying with ring.
///
/// Anchors are offered as issuers before intermediates.
pub struct InMemoryTrustDomain {
    anchors: Vec<Vec<u8>>,
    intermediates: Vec<Vec<u8>>,
    distrusted: Vec<Vec<u8>>,
    revocation_policy: RevocationPolicy,
    revocation_checks: RefCell<Vec<Vec<u8>>>,
}

impl InMemoryTrustDomain {
    pub fn new() -> Self {
        Self {
            anchors: Vec::new(),
            intermediates: Vec::new(),
            distrusted: Vec::new(),
            revocation_policy: RevocationPolicy::SoftFail,
            revocation_checks: RefCell::new(Vec::new()),
        }
    }

    pub fn with_anchor(mut self, der: &[u8]) -> Self {
        self.anchors.push(der.to_vec());
        self
    }

    pub fn with_intermediate(mut self, der: &[u8]) -> Self {
        self.intermediates.push(der.to_vec());
        self
    }

    pub fn with_distrusted(mut self, der: &[u8]) -> Self {
        self.distrusted.push(der.to_vec());
        self
    }

    pub fn with_revocation_policy(mut self, policy: RevocationPolicy) -> Self {
        self.revocation_policy = policy;
        self
    }

    /// Serial numbers passed to `check_revocation`, in call order.
    pub fn revocation_checks(&self) -> Vec<Vec<u8>> {
        self.revocation_checks.borrow().clone()
    }
}

impl Default for InMemoryTrustDomain {
    fn default() -> Self {
        Self::new()
    }
}

impl TrustDomain for InMemoryTrustDomain {
    fn get_cert_trust(
        &self,
        _role: EndEntityOrCa,
        _policy: &CertPolicyId,
        candidate_der: &[u8],
    ) -> Result<TrustLevel> {
        if self.distrusted.iter().any(|c| c == candidate_der) {
            return Ok(TrustLevel::ActivelyDistrusted);
        }
        if self.anchors.iter().any(|c| c == candidate_der) {
            return Ok(TrustLevel::TrustAnchor);
        }
        Ok(TrustLevel::InheritsTrust)
    }

    fn find_issuer<'a>(
        &'a self,
        encoded_issuer_name: &[u8],
        checker: &mut dyn IssuerChecker<'a>,
        _time: Time,
    ) -> Result<()> {
        let candidates = self
            .anchors
            .iter()
            .chain(self.intermediates.iter())
            .map(|c| c.as_slice());
        find_issuer_among(candidates, encoded_issuer_name, checker)
    }

    fn verify_signed_data(
        &self,
        signed_data: &SignedData<'_>,
        subject_public_key_info: &[u8],
    ) -> Result<()> {
        crypto_backend::verify_signed_data(&RingBackend, signed_data, subject_public_key_info)
    }

    fn check_revocation(
        &self,
        role: EndEntityOrCa,
        cert_id: &CertId<'_>,
        time: Time,
        stapled_ocsp_response: Option<&[u8]>,
        _aia_extension: Option<&[u8]>,
    ) -> Result<()> {
        self.revocation_checks
            .borrow_mut()
            .push(cert_id.serial_number.to_vec());

        match stapled_ocsp_response {
            Some(response) => {
                let validity = verify_encoded_ocsp_response(
                    self,
                    &RingBackend,
                    cert_id,
                    time,
                    OCSP_MAX_LIFETIME_DAYS,
                    response,
                )?;
                log::debug!("stapled OCSP response good until {:?}", validity.valid_through);
                Ok(())
            }
            None if role == EndEntityOrCa::MustBeEndEntity
                && self.revocation_policy == RevocationPolicy::HardFail =>
            {
                Err(fail(Severity::Recoverable, ErrorCode::OcspUnknownCert))
            }
            None => Ok(()),
        }
    }

    fn is_chain_valid(&self, _chain: &CertChain<'_>) -> Result<()> {
        Ok(())
    }
}
