// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! The policy and crypto boundary of the path builder.
//!
//! A [`TrustDomain`] decides which certificates are trusted, finds candidate
//! issuers, verifies signatures and checks revocation. The builder never
//! touches a certificate store, a network or a crypto library directly.

use alloc::vec::Vec;

use crate::certificate::{BackCert, IncludeCn, SignedData};
use crate::chain::CertChain;
use crate::error::Result;
use crate::time::Time;
use crate::x509::types::{CertPolicyId, EndEntityOrCa, TrustLevel};

/// Returned by an [`IssuerChecker`] to continue or end issuer enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchControl {
    Continue,
    Stop,
}

/// Receives candidate issuers from [`TrustDomain::find_issuer`].
///
/// `Ok(Stop)`: a complete chain was found through this candidate.
/// `Ok(Continue)`: the candidate was rejected, offer the next one.
/// `Err(_)`: a fatal error; the trust domain must return it unchanged.
pub trait IssuerChecker<'a> {
    fn check(&mut self, potential_issuer_der: &'a [u8]) -> Result<SearchControl>;
}

/// Identifies a certificate for revocation checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertId<'a> {
    /// Issuer Name TLV of the subject certificate
    pub issuer: &'a [u8],
    /// SubjectPublicKeyInfo TLV of the issuer certificate
    pub issuer_subject_public_key_info: &'a [u8],
    /// Serial number INTEGER contents of the subject certificate
    pub serial_number: &'a [u8],
}

impl<'a> CertId<'a> {
    pub fn new(subject: &BackCert<'a>, issuer: &BackCert<'a>) -> Self {
        Self {
            issuer: subject.issuer(),
            issuer_subject_public_key_info: issuer.subject_public_key_info(),
            serial_number: subject.serial_number(),
        }
    }
}

/// Policy and crypto operations the path builder delegates.
///
/// All methods take `&self`; implementations needing mutable state use
/// interior mutability. Return Recoverable errors for anything a different
/// candidate could fix and Fatal errors only for conditions that make the
/// whole verification meaningless (allocation failure, broken backend).
pub trait TrustDomain {
    /// Trust placed in `candidate_der` when acting as `role` under `policy`.
    ///
    /// A certificate that is an anchor only for some policies must not be
    /// reported as [`TrustLevel::TrustAnchor`] for others. Under
    /// [`CertPolicyId::ANY_POLICY`] that restriction is lifted.
    fn get_cert_trust(
        &self,
        role: EndEntityOrCa,
        policy: &CertPolicyId,
        candidate_der: &[u8],
    ) -> Result<TrustLevel>;

    /// Offer every certificate whose subject equals `encoded_issuer_name`
    /// byte for byte to `checker`, never the same DER twice.
    ///
    /// Return `Ok(())` when the checker says [`SearchControl::Stop`] or the
    /// candidates are exhausted, and propagate checker errors unchanged.
    /// [`find_issuer_among`] implements this contract over any list.
    fn find_issuer<'a>(
        &'a self,
        encoded_issuer_name: &[u8],
        checker: &mut dyn IssuerChecker<'a>,
        time: Time,
    ) -> Result<()>;

    /// Verify `signed_data` with the key in `subject_public_key_info`.
    fn verify_signed_data(
        &self,
        signed_data: &SignedData<'_>,
        subject_public_key_info: &[u8],
    ) -> Result<()>;

    /// Revocation status of the certificate identified by `cert_id` at `time`.
    ///
    /// `stapled_ocsp_response` is only given for the end-entity.
    /// `aia_extension` is the subject's authorityInfoAccess value, if any.
    fn check_revocation(
        &self,
        role: EndEntityOrCa,
        cert_id: &CertId<'_>,
        time: Time,
        stapled_ocsp_response: Option<&[u8]>,
        aia_extension: Option<&[u8]>,
    ) -> Result<()>;

    /// Final veto over a complete chain, before any revocation check.
    fn is_chain_valid(&self, chain: &CertChain<'_>) -> Result<()>;
}

/// Offer `candidates` to `checker` following the [`TrustDomain::find_issuer`]
/// contract.
///
/// Candidates that do not parse are skipped, since they cannot be matched
/// by subject.
pub fn find_issuer_among<'a, I>(
    candidates: I,
    encoded_issuer_name: &[u8],
    checker: &mut dyn IssuerChecker<'a>,
) -> Result<()>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut offered: Vec<&'a [u8]> = Vec::new();
    for candidate in candidates {
        if offered.contains(&candidate) {
            continue;
        }
        let subject_matches = match BackCert::new(candidate, None, IncludeCn::No) {
            Ok(cert) => cert.subject() == encoded_issuer_name,
            Err(e) => {
                log::trace!("skipping unparseable issuer candidate: {}", e);
                false
            }
        };
        if !subject_matches {
            continue;
        }
        offered.push(candidate);
        if checker.check(candidate)? == SearchControl::Stop {
            return Ok(());
        }
    }
    Ok(())
}
