// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Test-only DER writer and a scripted trust domain.
//!
//! Certificates built here are structurally real but carry fake keys: the
//! "public key" is an arbitrary byte string (the subject CN by default) and
//! the "signature" is the signer's key bytes. [`MockTrustDomain`] verifies
//! by comparing the two, so search behaviour is fully deterministic.

use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::time::Duration;

use const_oid::ObjectIdentifier;
use der::asn1::UtcTime;
use der::{Decode, Encode};
use spki::SubjectPublicKeyInfoRef;

use crate::certificate::SignedData;
use crate::chain::CertChain;
use crate::error::{fail, ErrorCode, Result, Severity};
use crate::time::Time;
use crate::trust_domain::{find_issuer_among, CertId, IssuerChecker, TrustDomain};
use crate::x509::oids;
use crate::x509::types::{CertPolicyId, EndEntityOrCa, TrustLevel};

/// 2020-01-01T00:00:00Z
pub const DEFAULT_NOT_BEFORE: u64 = 1_577_836_800;
/// 2040-01-01T00:00:00Z
pub const DEFAULT_NOT_AFTER: u64 = 2_208_988_800;
/// 2026-01-01T00:00:00Z
pub const NOW: u64 = 1_767_225_600;

pub use crate::x509::oids::ECDSA_WITH_SHA256;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn now() -> Time {
    Time::from_unix_secs(NOW).unwrap()
}

// ============================================================================
// DER writer
// ============================================================================

pub fn tlv(tag: u8, contents: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = contents.len();
    if len < 0x80 {
        out.push(len as u8);
    } else if len <= 0xff {
        out.extend([0x81, len as u8]);
    } else {
        assert!(len <= 0xffff);
        out.extend([0x82, (len >> 8) as u8, len as u8]);
    }
    out.extend_from_slice(contents);
    out
}

pub fn seq(parts: &[&[u8]]) -> Vec<u8> {
    tlv(0x30, &parts.concat())
}

pub fn oid(oid: &ObjectIdentifier) -> Vec<u8> {
    tlv(0x06, oid.as_bytes())
}

pub fn utc_time(unix_secs: u64) -> Vec<u8> {
    UtcTime::from_unix_duration(Duration::from_secs(unix_secs))
        .unwrap()
        .to_der()
        .unwrap()
}

pub fn generalized_time(unix_secs: u64) -> Vec<u8> {
    der::asn1::GeneralizedTime::from_unix_duration(Duration::from_secs(unix_secs))
        .unwrap()
        .to_der()
        .unwrap()
}

/// Name with one single-valued RDN per attribute, values as UTF8String.
pub fn name_with(attributes: &[(&ObjectIdentifier, &str)]) -> Vec<u8> {
    let rdns: Vec<Vec<u8>> = attributes
        .iter()
        .map(|(attr, value)| tlv(0x31, &seq(&[&oid(attr), &tlv(0x0c, value.as_bytes())])))
        .collect();
    tlv(0x30, &rdns.concat())
}

pub fn name(cn: &str) -> Vec<u8> {
    name_with(&[(&oids::COMMON_NAME, cn)])
}

/// P-256 SubjectPublicKeyInfo around arbitrary key bytes.
pub fn spki(key: &[u8]) -> Vec<u8> {
    let mut bits = vec![0x00];
    bits.extend_from_slice(key);
    seq(&[
        &seq(&[&oid(&oids::ECPUBLICKEY), &oid(&oids::ECDSA_P256)]),
        &tlv(0x03, &bits),
    ])
}

pub fn algorithm(alg: &ObjectIdentifier) -> Vec<u8> {
    seq(&[&oid(alg)])
}

/// Extension with `value` wrapped in the extnValue OCTET STRING.
pub fn extension(extn_id: &ObjectIdentifier, critical: bool, value: &[u8]) -> Vec<u8> {
    let mut contents = oid(extn_id);
    if critical {
        contents.extend([0x01, 0x01, 0xff]);
    }
    contents.extend(tlv(0x04, value));
    tlv(0x30, &contents)
}

// ============================================================================
// Certificate builder
// ============================================================================

pub struct CertBuilder {
    version: Option<u8>,
    serial: Vec<u8>,
    inner_algorithm: Option<Vec<u8>>,
    issuer: Vec<u8>,
    not_before: u64,
    not_after: u64,
    subject: Vec<u8>,
    key: Vec<u8>,
    signature: Vec<u8>,
    extensions: Vec<Vec<u8>>,
    empty_extensions: bool,
}

impl CertBuilder {
    /// Key bytes are `subject_cn`, signature bytes are `issuer_cn`.
    pub fn new(subject_cn: &str, issuer_cn: &str) -> Self {
        Self {
            version: Some(2),
            serial: vec![0x01],
            inner_algorithm: None,
            issuer: name(issuer_cn),
            not_before: DEFAULT_NOT_BEFORE,
            not_after: DEFAULT_NOT_AFTER,
            subject: name(subject_cn),
            key: subject_cn.as_bytes().to_vec(),
            signature: issuer_cn.as_bytes().to_vec(),
            extensions: Vec::new(),
            empty_extensions: false,
        }
    }

    pub fn serial(mut self, serial: &[u8]) -> Self {
        self.serial = serial.to_vec();
        self
    }

    /// `None` omits the version field (v1).
    pub fn version(mut self, version: Option<u8>) -> Self {
        self.version = version;
        self
    }

    pub fn validity(mut self, not_before: u64, not_after: u64) -> Self {
        self.not_before = not_before;
        self.not_after = not_after;
        self
    }

    pub fn subject_name(mut self, subject: Vec<u8>) -> Self {
        self.subject = subject;
        self
    }

    pub fn key(mut self, key: &[u8]) -> Self {
        self.key = key.to_vec();
        self
    }

    pub fn signed_by(mut self, key: &[u8]) -> Self {
        self.signature = key.to_vec();
        self
    }

    pub fn inner_algorithm(mut self, alg: Vec<u8>) -> Self {
        self.inner_algorithm = Some(alg);
        self
    }

    pub fn raw_extension(mut self, ext: Vec<u8>) -> Self {
        self.extensions.push(ext);
        self
    }

    pub fn empty_extensions(mut self) -> Self {
        self.empty_extensions = true;
        self
    }

    /// Critical basicConstraints with cA TRUE.
    pub fn ca(self, path_len: Option<u32>) -> Self {
        let mut contents = vec![0x01, 0x01, 0xff];
        if let Some(n) = path_len {
            contents.extend(n.to_der().unwrap());
        }
        self.raw_extension(extension(
            &oids::BASIC_CONSTRAINTS,
            true,
            &tlv(0x30, &contents),
        ))
    }

    /// `bits` is the BIT STRING contents, unused-bits octet first.
    pub fn key_usage(self, bits: &[u8]) -> Self {
        self.raw_extension(extension(&oids::KEY_USAGE, true, &tlv(0x03, bits)))
    }

    pub fn eku(self, purposes: &[ObjectIdentifier]) -> Self {
        let list: Vec<Vec<u8>> = purposes.iter().map(oid).collect();
        self.raw_extension(extension(
            &oids::EXTENDED_KEY_USAGE,
            false,
            &tlv(0x30, &list.concat()),
        ))
    }

    pub fn policies(self, policies: &[ObjectIdentifier]) -> Self {
        let list: Vec<Vec<u8>> = policies.iter().map(|p| seq(&[&oid(p)])).collect();
        self.raw_extension(extension(
            &oids::CERTIFICATE_POLICIES,
            false,
            &tlv(0x30, &list.concat()),
        ))
    }

    pub fn inhibit_any_policy(self, skip_certs: u32) -> Self {
        self.raw_extension(extension(
            &oids::INHIBIT_ANY_POLICY,
            true,
            &skip_certs.to_der().unwrap(),
        ))
    }

    /// `general_names` is the concatenation of GeneralName TLVs.
    pub fn san(self, general_names: &[u8]) -> Self {
        self.raw_extension(extension(
            &oids::SUBJECT_ALT_NAME,
            false,
            &tlv(0x30, general_names),
        ))
    }

    /// Each argument is a concatenation of GeneralName TLVs, one subtree each.
    pub fn name_constraints(self, permitted: &[Vec<u8>], excluded: &[Vec<u8>]) -> Self {
        let subtrees = |names: &[Vec<u8>]| -> Vec<u8> {
            names.iter().map(|n| tlv(0x30, n)).collect::<Vec<_>>().concat()
        };
        let mut contents = Vec::new();
        if !permitted.is_empty() {
            contents.extend(tlv(0xa0, &subtrees(permitted)));
        }
        if !excluded.is_empty() {
            contents.extend(tlv(0xa1, &subtrees(excluded)));
        }
        self.raw_extension(extension(
            &oids::NAME_CONSTRAINTS,
            true,
            &tlv(0x30, &contents),
        ))
    }

    pub fn build(self) -> Vec<u8> {
        let sig_alg = algorithm(&ECDSA_WITH_SHA256);

        let mut tbs = Vec::new();
        if let Some(v) = self.version {
            tbs.extend(tlv(0xa0, &tlv(0x02, &[v])));
        }
        tbs.extend(tlv(0x02, &self.serial));
        tbs.extend(self.inner_algorithm.unwrap_or_else(|| sig_alg.clone()));
        tbs.extend(&self.issuer);
        tbs.extend(seq(&[
            &utc_time(self.not_before),
            &utc_time(self.not_after),
        ]));
        tbs.extend(&self.subject);
        tbs.extend(spki(&self.key));
        if !self.extensions.is_empty() || self.empty_extensions {
            tbs.extend(tlv(0xa3, &tlv(0x30, &self.extensions.concat())));
        }

        let mut signature = vec![0x00];
        signature.extend(&self.signature);
        seq(&[&tlv(0x30, &tbs), &sig_alg, &tlv(0x03, &signature)])
    }
}

// ============================================================================
// Mock trust domain
// ============================================================================

/// Calls observed by [`MockTrustDomain`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FindIssuer(Vec<u8>),
    IsChainValid(usize),
    /// Serial number of the subject, and whether a stapled response was given.
    CheckRevocation(Vec<u8>, bool),
}

#[derive(Default)]
pub struct MockTrustDomain {
    candidates: Vec<Vec<u8>>,
    anchors: Vec<(Vec<u8>, Option<CertPolicyId>)>,
    distrusted: Vec<Vec<u8>>,
    revoked_serials: Vec<Vec<u8>>,
    fatal_verify_keys: Vec<Vec<u8>>,
    reject_chains: bool,
    fatal_revocation: bool,
    events: RefCell<Vec<Event>>,
}

impl MockTrustDomain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offered by `find_issuer` in insertion order.
    pub fn candidate(mut self, der: &[u8]) -> Self {
        self.candidates.push(der.to_vec());
        self
    }

    /// Trust anchor under every policy; also becomes a candidate.
    pub fn anchor(mut self, der: &[u8]) -> Self {
        self.anchors.push((der.to_vec(), None));
        self.candidate(der)
    }

    /// Trust anchor only for `policy`; also becomes a candidate.
    pub fn anchor_for_policy(mut self, der: &[u8], policy: CertPolicyId) -> Self {
        self.anchors.push((der.to_vec(), Some(policy)));
        self.candidate(der)
    }

    pub fn distrust(mut self, der: &[u8]) -> Self {
        self.distrusted.push(der.to_vec());
        self
    }

    pub fn revoke(mut self, serial: &[u8]) -> Self {
        self.revoked_serials.push(serial.to_vec());
        self
    }

    /// Verification with `key` fails fatally.
    pub fn fatal_verify_with(mut self, key: &[u8]) -> Self {
        self.fatal_verify_keys.push(key.to_vec());
        self
    }

    pub fn reject_chains(mut self) -> Self {
        self.reject_chains = true;
        self
    }

    pub fn fatal_revocation(mut self) -> Self {
        self.fatal_revocation = true;
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl TrustDomain for MockTrustDomain {
    fn get_cert_trust(
        &self,
        _role: EndEntityOrCa,
        policy: &CertPolicyId,
        candidate_der: &[u8],
    ) -> Result<TrustLevel> {
        if self.distrusted.iter().any(|d| d == candidate_der) {
            return Ok(TrustLevel::ActivelyDistrusted);
        }
        let is_anchor = self.anchors.iter().any(|(der, scope)| {
            der == candidate_der
                && match scope {
                    None => true,
                    Some(scoped) => policy.is_any_policy() || scoped == policy,
                }
        });
        if is_anchor {
            Ok(TrustLevel::TrustAnchor)
        } else {
            Ok(TrustLevel::InheritsTrust)
        }
    }

    fn find_issuer<'a>(
        &'a self,
        encoded_issuer_name: &[u8],
        checker: &mut dyn IssuerChecker<'a>,
        _time: Time,
    ) -> Result<()> {
        self.record(Event::FindIssuer(encoded_issuer_name.to_vec()));
        find_issuer_among(
            self.candidates.iter().map(|c| c.as_slice()),
            encoded_issuer_name,
            checker,
        )
    }

    fn verify_signed_data(
        &self,
        signed_data: &SignedData<'_>,
        subject_public_key_info: &[u8],
    ) -> Result<()> {
        let spki = SubjectPublicKeyInfoRef::from_der(subject_public_key_info)?;
        let key = spki.subject_public_key.raw_bytes();
        if self.fatal_verify_keys.iter().any(|k| k == key) {
            return Err(fail(Severity::Fatal, ErrorCode::LibraryFailure));
        }
        if signed_data.signature == key {
            Ok(())
        } else {
            Err(fail(Severity::Recoverable, ErrorCode::BadSignature))
        }
    }

    fn check_revocation(
        &self,
        _role: EndEntityOrCa,
        cert_id: &CertId<'_>,
        _time: Time,
        stapled_ocsp_response: Option<&[u8]>,
        _aia_extension: Option<&[u8]>,
    ) -> Result<()> {
        self.record(Event::CheckRevocation(
            cert_id.serial_number.to_vec(),
            stapled_ocsp_response.is_some(),
        ));
        if self.fatal_revocation {
            return Err(fail(Severity::Fatal, ErrorCode::LibraryFailure));
        }
        if self
            .revoked_serials
            .iter()
            .any(|s| s == cert_id.serial_number)
        {
            return Err(fail(Severity::Recoverable, ErrorCode::RevokedCertificate));
        }
        Ok(())
    }

    fn is_chain_valid(&self, chain: &CertChain<'_>) -> Result<()> {
        self.record(Event::IsChainValid(chain.len()));
        if self.reject_chains {
            return Err(fail(Severity::Recoverable, ErrorCode::UntrustedCert));
        }
        Ok(())
    }
}
