// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Path building.
//!
//! Starting from the end-entity, the builder asks the trust domain for
//! certificates named by the current node's issuer field, and recurses into
//! each acceptable candidate until one branch reaches a trust anchor. A
//! branch that fails with a recoverable error is dropped and the next
//! candidate is tried; a fatal error ends the whole search.
//!
//! Exactly one chain is produced. Among several valid chains, the first one
//! found in the trust domain's candidate order wins.

use crate::certificate::name::NameConstraints;
use crate::certificate::{BackCert, IncludeCn};
use crate::chain::{CertChain, NodeArena, NodeIndex};
use crate::error::{fail, Error, ErrorCode, Result, Severity};
use crate::time::Time;
use crate::trust_domain::{CertId, IssuerChecker, SearchControl, TrustDomain};
use crate::x509::check::{check_issuer_independent_properties, RequiredProperties};
use crate::x509::types::{CertPolicyId, EndEntityOrCa, KeyPurposeId, KeyUsage, TrustLevel};

/// Default limit on intermediate CAs between the end-entity and the anchor.
pub const DEFAULT_MAX_SUB_CA_COUNT: u32 = 6;

// ============================================================================
// Build options
// ============================================================================

/// What the end-entity must be good for, and how far to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Role of the first certificate
    pub end_entity_or_ca: EndEntityOrCa,

    /// Key usage the first certificate must allow; issuers always need
    /// keyCertSign
    pub required_key_usage: KeyUsage,

    /// Extended key usage enforced at every level
    pub required_eku: KeyPurposeId,

    /// Policy enforced at every level
    pub required_policy: CertPolicyId,

    /// Maximum number of sub-CAs (intermediates) in the chain
    pub max_sub_ca_count: u32,

    /// Whether name constraints treat the end-entity's CN as a dNSName
    pub include_cn: IncludeCn,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            end_entity_or_ca: EndEntityOrCa::MustBeEndEntity,
            required_key_usage: KeyUsage::NoParticularKeyUsageRequired,
            required_eku: KeyPurposeId::AnyExtendedKeyUsage,
            required_policy: CertPolicyId::ANY_POLICY,
            max_sub_ca_count: DEFAULT_MAX_SUB_CA_COUNT,
            include_cn: IncludeCn::No,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_end_entity_or_ca(mut self, role: EndEntityOrCa) -> Self {
        self.end_entity_or_ca = role;
        self
    }

    pub fn with_required_key_usage(mut self, key_usage: KeyUsage) -> Self {
        self.required_key_usage = key_usage;
        self
    }

    pub fn with_required_eku(mut self, eku: KeyPurposeId) -> Self {
        self.required_eku = eku;
        self
    }

    pub fn with_required_policy(mut self, policy: CertPolicyId) -> Self {
        self.required_policy = policy;
        self
    }

    /// Set the maximum number of sub-CAs
    pub fn with_max_sub_ca_count(mut self, count: u32) -> Self {
        self.max_sub_ca_count = count;
        self
    }

    pub fn with_include_cn(mut self, include_cn: IncludeCn) -> Self {
        self.include_cn = include_cn;
        self
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Build and verify a chain from `end_entity_der` to a trust anchor of
/// `trust_domain`, valid at `time`.
///
/// `stapled_ocsp_response` is handed to the trust domain when the end-entity
/// is checked for revocation. On success the chain is ordered end-entity
/// first, anchor last.
///
/// # Example
/// ```no_run
/// use pkix_path::prelude::*;
///
/// # fn example<T: TrustDomain>(trust_domain: &T, ee_der: &[u8], now: Time) -> Result<()> {
/// let chain = build_cert_chain(trust_domain, ee_der, now, &BuildOptions::new(), None)?;
/// assert!(chain.len() >= 1);
/// # Ok(())
/// # }
/// ```
pub fn build_cert_chain<'a, T>(
    trust_domain: &'a T,
    end_entity_der: &'a [u8],
    time: Time,
    options: &BuildOptions,
    stapled_ocsp_response: Option<&[u8]>,
) -> Result<CertChain<'a>>
where
    T: TrustDomain + ?Sized,
{
    log::trace!(
        "build_cert_chain: role={:?}, ee_len={}",
        options.end_entity_or_ca,
        end_entity_der.len()
    );

    let end_entity = BackCert::new(end_entity_der, None, options.include_cn)?;
    let mut ctx = BuildContext {
        trust_domain,
        time,
        options,
        stapled_ocsp_response,
        arena: NodeArena::new(),
    };
    let root = ctx.arena.push(end_entity);
    let chain = ctx.build_forward(root, 0)?;

    log::trace!("build_cert_chain: found chain of {} certificates", chain.len());
    Ok(chain)
}

// ============================================================================
// Search
// ============================================================================

struct BuildContext<'a, 'o, T: ?Sized> {
    trust_domain: &'a T,
    time: Time,
    options: &'o BuildOptions,
    stapled_ocsp_response: Option<&'o [u8]>,
    arena: NodeArena<'a>,
}

impl<'a, 'o, T> BuildContext<'a, 'o, T>
where
    T: TrustDomain + ?Sized,
{
    fn node(&self, index: NodeIndex) -> Result<&BackCert<'a>> {
        self.arena
            .get(index)
            .ok_or_else(|| fail(Severity::Fatal, ErrorCode::InvalidState))
    }

    fn role_of(&self, cert: &BackCert<'a>) -> EndEntityOrCa {
        match cert.child() {
            None => self.options.end_entity_or_ca,
            Some(_) => EndEntityOrCa::MustBeCa,
        }
    }

    /// Search upward from `index`. On success returns the complete chain.
    fn build_forward(&mut self, index: NodeIndex, sub_ca_count: u32) -> Result<CertChain<'a>> {
        let cert = self.node(index)?;
        let role = self.role_of(cert);
        let is_end_entity = cert.child().is_none();
        let der = cert.der();
        let issuer_name = cert.issuer();

        let trust_level =
            self.trust_domain
                .get_cert_trust(role, &self.options.required_policy, der)?;
        if trust_level == TrustLevel::ActivelyDistrusted {
            return Err(fail(Severity::Recoverable, ErrorCode::UntrustedCert));
        }

        let required = RequiredProperties {
            role,
            key_usage: if is_end_entity {
                self.options.required_key_usage
            } else {
                KeyUsage::KeyCertSign
            },
            eku: self.options.required_eku,
            policy: &self.options.required_policy,
        };

        // An end-entity defect is reported only once the rest of the chain
        // is known to be fine, so the caller sees it instead of an issuer
        // error caused by it.
        let mut deferred: Option<Error> = None;
        if let Err(e) = check_issuer_independent_properties(
            self.node(index)?,
            self.time,
            &required,
            sub_ca_count,
            trust_level,
        ) {
            if e.is_fatal() || !is_end_entity {
                return Err(e);
            }
            log::debug!("deferring end-entity error: {}", e);
            deferred = Some(e);
        }

        let chain = if trust_level == TrustLevel::TrustAnchor {
            self.complete_chain(index)?
        } else {
            // an anchor at the limit is still accepted; only a further
            // issuer search would exceed it
            if role == EndEntityOrCa::MustBeCa && sub_ca_count >= self.options.max_sub_ca_count {
                log::debug!("sub-CA count {} reached the limit", sub_ca_count);
                return Err(fail(Severity::Recoverable, ErrorCode::ChainTooLong));
            }
            let trust_domain = self.trust_domain;
            let time = self.time;
            let mut step = PathBuildingStep {
                ctx: self,
                subject: index,
                sub_ca_count,
                found: None,
                last_error: None,
            };
            trust_domain.find_issuer(issuer_name, &mut step, time)?;
            step.into_result()?
        };

        match deferred {
            Some(e) => Err(e),
            None => Ok(chain),
        }
    }

    /// Try `issuer_der` as the issuer of `subject`.
    fn try_issuer(
        &mut self,
        subject: NodeIndex,
        sub_ca_count: u32,
        issuer_der: &'a [u8],
    ) -> Result<CertChain<'a>> {
        let candidate = BackCert::new(issuer_der, Some(subject), IncludeCn::No)?;

        // RFC 4158 Section 5.2: the same subject and key twice in one path is
        // a loop, whichever certificate carries them.
        let loops = self.arena.walk_down(subject).any(|prev| {
            prev.subject() == candidate.subject()
                && prev.subject_public_key_info() == candidate.subject_public_key_info()
        });
        if loops {
            log::debug!("issuer candidate would form a loop");
            return Err(fail(Severity::Recoverable, ErrorCode::UnknownIssuer));
        }

        if let Some(value) = candidate.name_constraints() {
            let constraints = NameConstraints::parse(value)?;
            for descendant in self.arena.walk_down(subject) {
                constraints.check(descendant)?;
            }
        }

        let subject_cert = self.node(subject)?;
        let next_sub_ca_count = match self.role_of(subject_cert) {
            EndEntityOrCa::MustBeCa => sub_ca_count + 1,
            EndEntityOrCa::MustBeEndEntity => sub_ca_count,
        };
        self.trust_domain.verify_signed_data(
            subject_cert.signed_data(),
            candidate.subject_public_key_info(),
        )?;

        let index = self.arena.push(candidate);
        let result = self.build_forward(index, next_sub_ca_count);
        if result.is_err() {
            self.arena.truncate(index);
        }
        result
    }

    /// `top` is a trust anchor: vet the chain it completes.
    fn complete_chain(&self, top: NodeIndex) -> Result<CertChain<'a>> {
        let chain = self.arena.chain_to(top);
        self.trust_domain.is_chain_valid(&chain)?;

        // Anchor side first, so a revoked intermediate is found before any
        // end-entity status is fetched.
        for i in (1..chain.len()).rev() {
            let (subject, issuer) = match (chain.get(i - 1), chain.get(i)) {
                (Some(subject), Some(issuer)) => (subject, issuer),
                _ => return Err(fail(Severity::Fatal, ErrorCode::InvalidState)),
            };
            let is_end_entity = i == 1;
            let role = if is_end_entity {
                self.options.end_entity_or_ca
            } else {
                EndEntityOrCa::MustBeCa
            };
            let stapled = if is_end_entity {
                self.stapled_ocsp_response
            } else {
                None
            };
            let cert_id = CertId::new(subject, issuer);
            self.trust_domain.check_revocation(
                role,
                &cert_id,
                self.time,
                stapled,
                subject.authority_info_access(),
            )?;
        }
        Ok(chain)
    }
}

/// Issuer checker for one level of the search.
struct PathBuildingStep<'c, 'a, 'o, T: ?Sized> {
    ctx: &'c mut BuildContext<'a, 'o, T>,
    subject: NodeIndex,
    sub_ca_count: u32,
    found: Option<CertChain<'a>>,
    last_error: Option<Error>,
}

impl<'c, 'a, 'o, T> PathBuildingStep<'c, 'a, 'o, T>
where
    T: TrustDomain + ?Sized,
{
    fn into_result(self) -> Result<CertChain<'a>> {
        match (self.found, self.last_error) {
            (Some(chain), _) => Ok(chain),
            (None, Some(e)) => Err(e),
            (None, None) => Err(fail(Severity::Recoverable, ErrorCode::UnknownIssuer)),
        }
    }
}

impl<'c, 'a, 'o, T> IssuerChecker<'a> for PathBuildingStep<'c, 'a, 'o, T>
where
    T: TrustDomain + ?Sized,
{
    fn check(&mut self, potential_issuer_der: &'a [u8]) -> Result<SearchControl> {
        if self.found.is_some() {
            return Ok(SearchControl::Stop);
        }
        log::trace!(
            "checking issuer candidate ({} bytes) at depth {}",
            potential_issuer_der.len(),
            self.sub_ca_count
        );
        match self
            .ctx
            .try_issuer(self.subject, self.sub_ca_count, potential_issuer_der)
        {
            Ok(chain) => {
                self.found = Some(chain);
                Ok(SearchControl::Stop)
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                log::debug!("issuer candidate rejected: {}", e);
                self.last_error = Some(e);
                Ok(SearchControl::Continue)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
