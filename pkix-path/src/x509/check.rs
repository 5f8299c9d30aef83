// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Checks that depend only on the certificate itself.
//!
//! Run for every node as soon as the path builder reaches it, before any
//! issuer is looked up. Signature and name constraint checks need the issuer
//! and live in the builder.

use crate::certificate::{BackCert, Version};
use crate::error::{fail, Error, ErrorCode, Result, Severity};
use crate::time::Time;
use crate::x509::extensions::KeyUsageFlags;
use crate::x509::oids;
use crate::x509::types::{CertPolicyId, EndEntityOrCa, KeyPurposeId, KeyUsage, TrustLevel};

fn recoverable(code: ErrorCode) -> Error {
    fail(Severity::Recoverable, code)
}

/// What the caller needs a certificate to be good for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredProperties<'p> {
    pub role: EndEntityOrCa,
    /// Enforced only when the certificate has a keyUsage extension
    pub key_usage: KeyUsage,
    pub eku: KeyPurposeId,
    pub policy: &'p CertPolicyId,
}

/// Run the issuer-independent checks on `cert`.
///
/// Order: key usage, certificate policies, basic constraints, extended key
/// usage, then validity last so that an expired certificate with another
/// defect reports the other defect.
pub fn check_issuer_independent_properties(
    cert: &BackCert<'_>,
    time: Time,
    required: &RequiredProperties<'_>,
    sub_ca_count: u32,
    trust_level: TrustLevel,
) -> Result<()> {
    let is_trust_anchor = trust_level == TrustLevel::TrustAnchor;

    check_key_usage(cert, required.role, required.key_usage)?;
    check_certificate_policies(cert, required.role, is_trust_anchor, required.policy)?;
    check_basic_constraints(cert, required.role, is_trust_anchor, sub_ca_count)?;
    check_extended_key_usage(cert, required.role, required.eku)?;
    check_validity(cert, time)
}

/// RFC 5280 Section 4.2.1.3.
fn check_key_usage(cert: &BackCert<'_>, role: EndEntityOrCa, required: KeyUsage) -> Result<()> {
    let key_usage = match cert.key_usage() {
        Some(ku) => ku,
        None => return Ok(()),
    };

    if let Some(bit) = required.bit() {
        if !key_usage.has(bit) {
            log::debug!("key usage {} lacks {:?}", key_usage, required);
            return Err(recoverable(ErrorCode::InadequateKeyUsage));
        }
    }

    // keyCertSign requires cA, so it is never acceptable on an end-entity
    if role == EndEntityOrCa::MustBeEndEntity && key_usage.has(KeyUsageFlags::KEY_CERT_SIGN) {
        return Err(recoverable(ErrorCode::InadequateKeyUsage));
    }
    Ok(())
}

/// RFC 5280 Section 4.2.1.4, without policy mapping.
fn check_certificate_policies(
    cert: &BackCert<'_>,
    role: EndEntityOrCa,
    is_trust_anchor: bool,
    required: &CertPolicyId,
) -> Result<()> {
    if required.is_any_policy() {
        return Ok(());
    }

    // A root may omit the policies it is trusted for.
    if role == EndEntityOrCa::MustBeCa && is_trust_anchor {
        return Ok(());
    }

    let policies = match cert.certificate_policies() {
        Some(policies) => policies,
        None => return Err(recoverable(ErrorCode::PolicyValidationFailed)),
    };

    let any_policy_allowed = role == EndEntityOrCa::MustBeCa && cert.inhibit_any_policy().is_none();
    let found = policies.iter().any(|oid| {
        *oid == required.as_bytes()
            || (any_policy_allowed && *oid == oids::ANY_POLICY.as_bytes())
    });
    if !found {
        return Err(recoverable(ErrorCode::PolicyValidationFailed));
    }
    Ok(())
}

/// RFC 5280 Section 4.2.1.9.
fn check_basic_constraints(
    cert: &BackCert<'_>,
    role: EndEntityOrCa,
    is_trust_anchor: bool,
    sub_ca_count: u32,
) -> Result<()> {
    let (is_ca, path_len_constraint) = match cert.basic_constraints() {
        Some(bc) => (bc.ca, bc.path_len_constraint),
        // v1 roots predate basicConstraints
        None => (
            role == EndEntityOrCa::MustBeCa && is_trust_anchor && cert.version() == Version::V1,
            None,
        ),
    };

    match role {
        EndEntityOrCa::MustBeEndEntity => {
            if is_ca {
                return Err(recoverable(ErrorCode::CaCertUsedAsEndEntity));
            }
            Ok(())
        }
        EndEntityOrCa::MustBeCa => {
            if !is_ca {
                return Err(recoverable(ErrorCode::CaCertInvalid));
            }
            match path_len_constraint {
                Some(max) if sub_ca_count > max => {
                    Err(recoverable(ErrorCode::PathLenConstraintInvalid))
                }
                _ => Ok(()),
            }
        }
    }
}

/// RFC 5280 Section 4.2.1.12.
///
/// OCSP signing is special: it is never implied by a missing extension, and
/// an end-entity asserting it may only be used for OCSP signing.
fn check_extended_key_usage(
    cert: &BackCert<'_>,
    role: EndEntityOrCa,
    required: KeyPurposeId,
) -> Result<()> {
    // Issuers of OCSP responder certificates need not assert OCSP signing.
    let required = if role == EndEntityOrCa::MustBeCa && required == KeyPurposeId::OcspSigning {
        KeyPurposeId::AnyExtendedKeyUsage
    } else {
        required
    };

    let eku = match cert.ext_key_usage() {
        Some(eku) => eku,
        None if required == KeyPurposeId::OcspSigning => {
            return Err(recoverable(ErrorCode::InadequateCertType));
        }
        None => return Ok(()),
    };

    if role == EndEntityOrCa::MustBeEndEntity
        && required != KeyPurposeId::OcspSigning
        && eku.has_purpose(&oids::KP_OCSP_SIGNING)
    {
        return Err(recoverable(ErrorCode::InadequateCertType));
    }

    match required.oid() {
        Some(oid) if !eku.has_purpose(&oid) => Err(recoverable(ErrorCode::InadequateCertType)),
        _ => Ok(()),
    }
}

fn check_validity(cert: &BackCert<'_>, time: Time) -> Result<()> {
    cert.parse_validity()?.check(&time)
}

// ============================================================================
// Tests
// ============================================================================
