// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! OCSP request encoding and response verification (RFC 6960).
//!
//! These are helpers for [`TrustDomain::check_revocation`] implementations;
//! the path builder never calls them itself.
//!
//! ```asn1
//! OCSPResponse ::= SEQUENCE {
//!    responseStatus         OCSPResponseStatus,
//!    responseBytes          [0] EXPLICIT ResponseBytes OPTIONAL }
//!
//! ResponseBytes ::= SEQUENCE {
//!    responseType   OBJECT IDENTIFIER,
//!    response       OCTET STRING }
//!
//! BasicOCSPResponse ::= SEQUENCE {
//!    tbsResponseData      ResponseData,
//!    signatureAlgorithm   AlgorithmIdentifier,
//!    signature            BIT STRING,
//!    certs            [0] EXPLICIT SEQUENCE OF Certificate OPTIONAL }
//!
//! ResponseData ::= SEQUENCE {
//!    version              [0] EXPLICIT Version DEFAULT v1,
//!    responderID              ResponderID,
//!    producedAt               GeneralizedTime,
//!    responses                SEQUENCE OF SingleResponse,
//!    responseExtensions   [1] EXPLICIT Extensions OPTIONAL }
//!
//! SingleResponse ::= SEQUENCE {
//!    certID                       CertID,
//!    certStatus                   CertStatus,
//!    thisUpdate                   GeneralizedTime,
//!    nextUpdate         [0]       EXPLICIT GeneralizedTime OPTIONAL,
//!    singleExtensions   [1]       EXPLICIT Extensions OPTIONAL }
//! ```
//!
//! [`TrustDomain::check_revocation`]: crate::trust_domain::TrustDomain::check_revocation

use alloc::vec::Vec;

use const_oid::ObjectIdentifier;
use der::asn1::GeneralizedTime;
use der::{Decode, Reader, SliceReader, Tag, TagNumber};

use crate::certificate::{
    context_tag, ensure_finished, next_is, read_tlv, tlv_contents, BackCert, IncludeCn, SignedData,
};
use crate::crypto_backend::{CryptoBackend, SHA1_LEN};
use crate::error::{fail, Error, ErrorCode, Result, Severity};
use crate::time::{Time, ONE_DAY};
use crate::trust_domain::{CertId, TrustDomain};
use crate::x509::check::{check_issuer_independent_properties, RequiredProperties};
use crate::x509::oids;
use crate::x509::types::{CertPolicyId, EndEntityOrCa, KeyPurposeId, KeyUsage, TrustLevel};

/// Allowed clock skew between us and the responder.
const SLOP: u64 = ONE_DAY;

/// Embedded certificates beyond this are not worth searching.
const MAX_RESPONSE_CERTS: usize = 8;

const RESPONDER_BY_NAME: Tag = context_tag(TagNumber::N1, true);
const RESPONDER_BY_KEY: Tag = context_tag(TagNumber::N2, true);
const CERT_STATUS_GOOD: Tag = context_tag(TagNumber::N0, false);
const CERT_STATUS_REVOKED: Tag = context_tag(TagNumber::N1, true);
const CERT_STATUS_UNKNOWN: Tag = context_tag(TagNumber::N2, false);

fn bad_der() -> Error {
    fail(Severity::Recoverable, ErrorCode::BadDer)
}

fn recoverable(code: ErrorCode) -> Error {
    fail(Severity::Recoverable, code)
}

// ============================================================================
// Request
// ============================================================================

/// SHA-1 of the subjectPublicKey BIT STRING value, unused-bits octet
/// excluded.
fn key_hash<B: CryptoBackend + ?Sized>(
    backend: &B,
    subject_public_key_info: &[u8],
) -> Result<[u8; SHA1_LEN]> {
    let mut spki = SliceReader::new(tlv_contents(subject_public_key_info, Tag::Sequence)?)?;
    read_tlv(&mut spki, Tag::Sequence)?;
    let (_, bits) = read_tlv(&mut spki, Tag::BitString)?;
    ensure_finished(&spki)?;
    match bits.split_first() {
        Some((0, key)) => backend.sha1_digest(key),
        _ => Err(bad_der()),
    }
}

/// Encode a single-certificate OCSPRequest for `cert_id`.
///
/// The request carries no extensions and uses SHA-1 for the CertID hashes,
/// the only algorithm every responder supports. All lengths fit in one
/// octet, which keeps the request small enough for OCSP GET.
pub fn create_encoded_ocsp_request<B: CryptoBackend + ?Sized>(
    backend: &B,
    cert_id: &CertId<'_>,
) -> Result<Vec<u8>> {
    // SEQUENCE { OID id-sha1, NULL }
    const HASH_ALGORITHM: [u8; 11] = [
        0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1a, 0x05, 0x00,
    ];
    const TOTAL_LEN_WITHOUT_SERIAL_NUMBER: usize = 2 // OCSPRequest
        + 2 // tbsRequest
        + 2 // requestList
        + 2 // Request
        + 2 // reqCert
        + HASH_ALGORITHM.len()
        + 2 + SHA1_LEN // issuerNameHash
        + 2 + SHA1_LEN // issuerKeyHash
        + 2; // serialNumber header

    let serial_number = cert_id.serial_number;
    if serial_number.len() > 127 - TOTAL_LEN_WITHOUT_SERIAL_NUMBER {
        log::debug!("serial number too long for OCSP request: {}", serial_number.len());
        return Err(recoverable(ErrorCode::BadData));
    }
    let total_len = TOTAL_LEN_WITHOUT_SERIAL_NUMBER + serial_number.len();

    let mut request = Vec::with_capacity(total_len);
    for depth in 1..=5 {
        request.push(0x30);
        request.push((total_len - 2 * depth) as u8);
    }
    request.extend_from_slice(&HASH_ALGORITHM);
    request.extend_from_slice(&[0x04, SHA1_LEN as u8]);
    request.extend_from_slice(&backend.sha1_digest(cert_id.issuer)?);
    request.extend_from_slice(&[0x04, SHA1_LEN as u8]);
    request.extend_from_slice(&key_hash(backend, cert_id.issuer_subject_public_key_info)?);
    request.extend_from_slice(&[0x02, serial_number.len() as u8]);
    request.extend_from_slice(serial_number);
    Ok(request)
}

// ============================================================================
// Response
// ============================================================================

/// Time span covered by an acceptable "good" response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OcspResponseValidity {
    pub this_update: Time,
    /// nextUpdate, capped at thisUpdate plus the maximum lifetime
    pub valid_through: Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CertStatus {
    Good,
    Revoked,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResponderIdType {
    ByName,
    ByKey,
}

/// Verify `encoded_response` for the certificate identified by `cert_id`.
///
/// The response must be signed by the certificate's issuer, or by a
/// delegated responder certificate embedded in the response that the issuer
/// signed and that carries the OCSPSigning purpose. Responses are accepted
/// up to a day into the future and a day past their validity to allow for
/// clock skew. `max_lifetime_in_days` caps how long a response with a far
/// nextUpdate is trusted.
///
/// Only a fresh "good" status returns `Ok`.
pub fn verify_encoded_ocsp_response<T, B>(
    trust_domain: &T,
    backend: &B,
    cert_id: &CertId<'_>,
    time: Time,
    max_lifetime_in_days: u16,
    encoded_response: &[u8],
) -> Result<OcspResponseValidity>
where
    T: TrustDomain + ?Sized,
    B: CryptoBackend + ?Sized,
{
    let mut ctx = Context {
        trust_domain,
        backend,
        cert_id,
        time,
        max_lifetime: u64::from(max_lifetime_in_days) * ONE_DAY,
        status: CertStatus::Unknown,
        expired: false,
        this_update: None,
        valid_through: None,
    };

    ctx.ocsp_response(encoded_response).map_err(|e| {
        if e.code() == ErrorCode::BadDer {
            e.with_code(ErrorCode::OcspMalformedResponse)
        } else {
            e
        }
    })?;

    match ctx.status {
        CertStatus::Good if ctx.expired => Err(recoverable(ErrorCode::OcspOldResponse)),
        CertStatus::Good => {
            let (this_update, valid_through) = match (ctx.this_update, ctx.valid_through) {
                (Some(t), Some(v)) => (t, v),
                _ => return Err(fail(Severity::Fatal, ErrorCode::InvalidState)),
            };
            let to_time = |secs| {
                Time::from_unix_secs(secs)
                    .map_err(|_| recoverable(ErrorCode::OcspMalformedResponse))
            };
            Ok(OcspResponseValidity {
                this_update: to_time(this_update)?,
                valid_through: to_time(valid_through)?,
            })
        }
        CertStatus::Revoked => Err(recoverable(ErrorCode::RevokedCertificate)),
        CertStatus::Unknown => Err(recoverable(ErrorCode::OcspUnknownCert)),
    }
}

struct Context<'c, T: ?Sized, B: ?Sized> {
    trust_domain: &'c T,
    backend: &'c B,
    cert_id: &'c CertId<'c>,
    time: Time,
    max_lifetime: u64,
    status: CertStatus,
    expired: bool,
    this_update: Option<u64>,
    valid_through: Option<u64>,
}

impl<'c, T, B> Context<'c, T, B>
where
    T: TrustDomain + ?Sized,
    B: CryptoBackend + ?Sized,
{
    fn ocsp_response(&mut self, encoded: &[u8]) -> Result<()> {
        let mut outer = SliceReader::new(encoded)?;
        let (_, response) = read_tlv(&mut outer, Tag::Sequence)?;
        ensure_finished(&outer)?;

        let mut reader = SliceReader::new(response)?;
        let (_, status) = read_tlv(&mut reader, Tag::Enumerated)?;
        match status {
            [0] => {}
            [1] => return Err(recoverable(ErrorCode::OcspMalformedRequest)),
            [2] => return Err(recoverable(ErrorCode::OcspServerError)),
            [3] => return Err(recoverable(ErrorCode::OcspTryServerLater)),
            [5] => return Err(recoverable(ErrorCode::OcspRequestNeedsSig)),
            [6] => return Err(recoverable(ErrorCode::OcspUnauthorizedRequest)),
            _ => return Err(recoverable(ErrorCode::OcspUnknownResponseStatus)),
        }

        let (_, wrapped) = read_tlv(&mut reader, context_tag(TagNumber::N0, true))?;
        ensure_finished(&reader)?;
        let mut response_bytes = SliceReader::new(tlv_contents(wrapped, Tag::Sequence)?)?;
        let response_type = ObjectIdentifier::decode(&mut response_bytes)?;
        if response_type != oids::OCSP_BASIC {
            log::debug!("unsupported OCSP response type {}", response_type);
            return Err(bad_der());
        }
        let (_, basic) = read_tlv(&mut response_bytes, Tag::OctetString)?;
        ensure_finished(&response_bytes)?;

        self.basic_response(tlv_contents(basic, Tag::Sequence)?)
    }

    fn basic_response(&mut self, contents: &[u8]) -> Result<()> {
        let mut reader = SliceReader::new(contents)?;
        let signed_data = SignedData::read(&mut reader)?;

        let mut certs: Vec<&[u8]> = Vec::new();
        if !reader.is_finished() {
            let (_, wrapped) = read_tlv(&mut reader, context_tag(TagNumber::N0, true))?;
            let mut list = SliceReader::new(tlv_contents(wrapped, Tag::Sequence)?)?;
            while !list.is_finished() {
                if certs.len() == MAX_RESPONSE_CERTS {
                    return Err(bad_der());
                }
                let (cert, _) = read_tlv(&mut list, Tag::Sequence)?;
                certs.push(cert);
            }
        }
        ensure_finished(&reader)?;

        self.response_data(
            tlv_contents(signed_data.data, Tag::Sequence)?,
            &signed_data,
            &certs,
        )
    }

    fn response_data(
        &mut self,
        contents: &[u8],
        signed_data: &SignedData<'_>,
        certs: &[&[u8]],
    ) -> Result<()> {
        let mut reader = SliceReader::new(contents)?;

        // v1 is the only version, and DER omits the default
        if next_is(&reader, context_tag(TagNumber::N0, true)) {
            return Err(bad_der());
        }

        let (responder_id_type, tag) = if next_is(&reader, RESPONDER_BY_NAME) {
            (ResponderIdType::ByName, RESPONDER_BY_NAME)
        } else {
            (ResponderIdType::ByKey, RESPONDER_BY_KEY)
        };
        let (_, responder_id) = read_tlv(&mut reader, tag)?;

        // Nothing below is trusted until the signature is.
        self.verify_signature(responder_id_type, responder_id, certs, signed_data)?;

        let _produced_at = GeneralizedTime::decode(&mut reader)?;

        let (_, responses) = read_tlv(&mut reader, Tag::Sequence)?;
        if responses.is_empty() {
            return Err(bad_der());
        }
        let mut list = SliceReader::new(responses)?;
        while !list.is_finished() {
            let (_, single) = read_tlv(&mut list, Tag::Sequence)?;
            self.single_response(single)?;
        }

        skip_extensions(&mut reader)?;
        ensure_finished(&reader)
    }

    fn verify_signature(
        &self,
        responder_id_type: ResponderIdType,
        responder_id: &[u8],
        certs: &[&[u8]],
        signed_data: &SignedData<'_>,
    ) -> Result<()> {
        let issuer_spki = self.cert_id.issuer_subject_public_key_info;
        if self.match_responder_id(
            responder_id_type,
            responder_id,
            self.cert_id.issuer,
            issuer_spki,
        )? {
            return self.verify_response_signature(signed_data, issuer_spki);
        }

        for der in certs {
            let cert = BackCert::new(der, None, IncludeCn::No)?;
            match self.match_responder_id(
                responder_id_type,
                responder_id,
                cert.subject(),
                cert.subject_public_key_info(),
            ) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) if e.is_fatal() => return Err(e),
                Err(_) => continue,
            }
            match self.check_signer_cert(&cert) {
                Ok(()) => {
                    return self
                        .verify_response_signature(signed_data, cert.subject_public_key_info())
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => log::debug!("delegated OCSP signer rejected: {}", e),
            }
        }

        Err(recoverable(ErrorCode::OcspInvalidSigningCert))
    }

    fn match_responder_id(
        &self,
        responder_id_type: ResponderIdType,
        responder_id: &[u8],
        subject: &[u8],
        subject_public_key_info: &[u8],
    ) -> Result<bool> {
        match responder_id_type {
            // byName [1] EXPLICIT Name
            ResponderIdType::ByName => Ok(responder_id == subject),
            // byKey [2] EXPLICIT KeyHash (OCTET STRING)
            ResponderIdType::ByKey => {
                let hash = tlv_contents(responder_id, Tag::OctetString)?;
                self.match_key_hash(hash, subject_public_key_info)
            }
        }
    }

    fn match_key_hash(&self, hash: &[u8], subject_public_key_info: &[u8]) -> Result<bool> {
        if hash.len() != SHA1_LEN {
            return Err(recoverable(ErrorCode::OcspMalformedResponse));
        }
        Ok(key_hash(self.backend, subject_public_key_info)?[..] == *hash)
    }

    fn verify_response_signature(
        &self,
        signed_data: &SignedData<'_>,
        subject_public_key_info: &[u8],
    ) -> Result<()> {
        self.trust_domain
            .verify_signed_data(signed_data, subject_public_key_info)
            .map_err(|e| {
                if e.code() == ErrorCode::BadSignature {
                    e.with_code(ErrorCode::OcspBadSignature)
                } else {
                    e
                }
            })
    }

    /// RFC 6960 Section 4.2.2.2: a delegated responder is an end-entity
    /// issued directly by the certificate's issuer for OCSPSigning.
    ///
    /// The issuer itself was already validated when the chain was built,
    /// so no path is built for the responder.
    fn check_signer_cert(&self, cert: &BackCert<'_>) -> Result<()> {
        let required = RequiredProperties {
            role: EndEntityOrCa::MustBeEndEntity,
            key_usage: KeyUsage::NoParticularKeyUsageRequired,
            eku: KeyPurposeId::OcspSigning,
            policy: &CertPolicyId::ANY_POLICY,
        };
        check_issuer_independent_properties(
            cert,
            self.time,
            &required,
            0,
            TrustLevel::InheritsTrust,
        )?;

        if cert.issuer() != self.cert_id.issuer {
            return Err(recoverable(ErrorCode::OcspResponderCertInvalid));
        }
        self.trust_domain.verify_signed_data(
            cert.signed_data(),
            self.cert_id.issuer_subject_public_key_info,
        )
    }

    fn single_response(&mut self, contents: &[u8]) -> Result<()> {
        let mut reader = SliceReader::new(contents)?;
        let (_, cert_id) = read_tlv(&mut reader, Tag::Sequence)?;
        if !self.match_cert_id(cert_id)? {
            return Ok(());
        }

        if next_is(&reader, CERT_STATUS_GOOD) {
            let (_, value) = read_tlv(&mut reader, CERT_STATUS_GOOD)?;
            if !value.is_empty() {
                return Err(bad_der());
            }
            if self.status != CertStatus::Revoked {
                self.status = CertStatus::Good;
            }
        } else if next_is(&reader, CERT_STATUS_REVOKED) {
            read_tlv(&mut reader, CERT_STATUS_REVOKED)?;
            self.status = CertStatus::Revoked;
        } else {
            let (_, value) = read_tlv(&mut reader, CERT_STATUS_UNKNOWN)?;
            if !value.is_empty() {
                return Err(bad_der());
            }
        }

        let time = self.time.unix_secs();
        let this_update = generalized_time_secs(&mut reader)?;
        if this_update > time.saturating_add(SLOP) {
            return Err(recoverable(ErrorCode::OcspFutureResponse));
        }

        let next_update_tag = context_tag(TagNumber::N0, true);
        let not_after = if next_is(&reader, next_update_tag) {
            let (_, wrapped) = read_tlv(&mut reader, next_update_tag)?;
            let mut inner = SliceReader::new(wrapped)?;
            let next_update = generalized_time_secs(&mut inner)?;
            ensure_finished(&inner)?;
            if next_update < this_update {
                return Err(recoverable(ErrorCode::OcspMalformedResponse));
            }
            if next_update - this_update <= self.max_lifetime {
                next_update
            } else {
                this_update.saturating_add(self.max_lifetime)
            }
        } else {
            this_update.saturating_add(ONE_DAY)
        };

        if time < SLOP {
            return Err(fail(Severity::Fatal, ErrorCode::InvalidArgs));
        }
        if time - SLOP > not_after {
            self.expired = true;
        }

        skip_extensions(&mut reader)?;
        ensure_finished(&reader)?;

        self.this_update = Some(this_update);
        self.valid_through = Some(not_after);
        Ok(())
    }

    /// ```asn1
    /// CertID ::= SEQUENCE {
    ///     hashAlgorithm       AlgorithmIdentifier,
    ///     issuerNameHash      OCTET STRING,
    ///     issuerKeyHash       OCTET STRING,
    ///     serialNumber        CertificateSerialNumber }
    /// ```
    ///
    /// CertIDs hashed with anything but SHA-1 are treated as not ours.
    fn match_cert_id(&self, contents: &[u8]) -> Result<bool> {
        let mut reader = SliceReader::new(contents)?;
        let (_, hash_algorithm) = read_tlv(&mut reader, Tag::Sequence)?;
        let hash_oid = ObjectIdentifier::decode(&mut SliceReader::new(hash_algorithm)?)?;
        let (_, issuer_name_hash) = read_tlv(&mut reader, Tag::OctetString)?;
        let (_, issuer_key_hash) = read_tlv(&mut reader, Tag::OctetString)?;
        let (_, serial_number) = read_tlv(&mut reader, Tag::Integer)?;
        ensure_finished(&reader)?;

        if serial_number != self.cert_id.serial_number || hash_oid != oids::SHA1 {
            return Ok(false);
        }
        if issuer_name_hash.len() != SHA1_LEN {
            return Err(recoverable(ErrorCode::OcspMalformedResponse));
        }
        if self.backend.sha1_digest(self.cert_id.issuer)?[..] != *issuer_name_hash {
            return Ok(false);
        }
        self.match_key_hash(
            issuer_key_hash,
            self.cert_id.issuer_subject_public_key_info,
        )
    }
}

fn generalized_time_secs(reader: &mut SliceReader<'_>) -> Result<u64> {
    Ok(GeneralizedTime::decode(reader)?
        .to_unix_duration()
        .as_secs())
}

/// `[1] EXPLICIT Extensions OPTIONAL`. No OCSP extension is understood, so
/// any critical one rejects the response.
fn skip_extensions(reader: &mut SliceReader<'_>) -> Result<()> {
    let tag = context_tag(TagNumber::N1, true);
    if !next_is(reader, tag) {
        return Ok(());
    }
    let (_, wrapped) = read_tlv(reader, tag)?;
    let list = tlv_contents(wrapped, Tag::Sequence)?;
    if list.is_empty() {
        return Err(bad_der());
    }
    let mut extensions = SliceReader::new(list)?;
    while !extensions.is_finished() {
        let (_, extension) = read_tlv(&mut extensions, Tag::Sequence)?;
        let mut fields = SliceReader::new(extension)?;
        let extn_id = ObjectIdentifier::decode(&mut fields)?;
        if next_is(&fields, Tag::Boolean) {
            if !bool::decode(&mut fields)? {
                return Err(bad_der());
            }
            log::debug!("unknown critical OCSP extension {}", extn_id);
            return Err(recoverable(ErrorCode::UnknownCriticalExtension));
        }
        read_tlv(&mut fields, Tag::OctetString)?;
        ensure_finished(&fields)?;
    }
    Ok(())
}
