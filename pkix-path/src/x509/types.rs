// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Value types passed across the trust domain boundary.

use core::fmt;

use const_oid::ObjectIdentifier;

use super::oids;
use crate::error::{fail, ErrorCode, Result, Severity};

/// Role a certificate plays in the chain being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndEntityOrCa {
    MustBeEndEntity,
    MustBeCa,
}

/// Key usage the caller requires, if the certificate has a keyUsage extension.
///
/// Discriminants are the RFC 5280 bit numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyUsage {
    DigitalSignature = 0,
    NonRepudiation = 1,
    KeyEncipherment = 2,
    DataEncipherment = 3,
    KeyAgreement = 4,
    KeyCertSign = 5,
    NoParticularKeyUsageRequired = 0xff,
}

impl KeyUsage {
    /// Bit number inside the keyUsage BIT STRING, if a bit is required.
    pub fn bit(self) -> Option<u8> {
        match self {
            KeyUsage::NoParticularKeyUsageRequired => None,
            other => Some(other as u8),
        }
    }
}

/// Extended key usage the caller requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPurposeId {
    /// No particular purpose required
    AnyExtendedKeyUsage,
    ServerAuth,
    ClientAuth,
    CodeSigning,
    EmailProtection,
    OcspSigning,
}

impl KeyPurposeId {
    /// OID for the purpose, `None` for [`KeyPurposeId::AnyExtendedKeyUsage`].
    pub fn oid(self) -> Option<ObjectIdentifier> {
        match self {
            KeyPurposeId::AnyExtendedKeyUsage => None,
            KeyPurposeId::ServerAuth => Some(oids::KP_SERVER_AUTH),
            KeyPurposeId::ClientAuth => Some(oids::KP_CLIENT_AUTH),
            KeyPurposeId::CodeSigning => Some(oids::KP_CODE_SIGNING),
            KeyPurposeId::EmailProtection => Some(oids::KP_EMAIL_PROTECTION),
            KeyPurposeId::OcspSigning => Some(oids::KP_OCSP_SIGNING),
        }
    }
}

/// Trust the trust domain places in one certificate for one role and policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrustLevel {
    /// A trusted root, or equivalent, *for the queried policy*.
    TrustAnchor,
    /// Known bad. Never chain through it.
    ActivelyDistrusted,
    /// Must chain to a trust anchor.
    InheritsTrust,
}

/// A certificate policy OID, stored as its DER contents octets.
///
/// ```text
/// CertPolicyId ::= OBJECT IDENTIFIER
/// ```
#[derive(Clone, Copy)]
pub struct CertPolicyId {
    num_bytes: u16,
    bytes: [u8; CertPolicyId::MAX_BYTES],
}

impl CertPolicyId {
    pub const MAX_BYTES: usize = 24;

    /// anyPolicy (2.5.29.32.0): no policy constraint.
    pub const ANY_POLICY: CertPolicyId = CertPolicyId {
        num_bytes: 4,
        bytes: [
            0x55, 0x1d, 0x20, 0x00, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        ],
    };

    /// Build from OID contents octets (no tag, no length).
    pub fn new(oid_contents: &[u8]) -> Result<Self> {
        if oid_contents.is_empty() || oid_contents.len() > Self::MAX_BYTES {
            return Err(fail(Severity::Fatal, ErrorCode::InvalidArgs));
        }
        let mut bytes = [0u8; Self::MAX_BYTES];
        bytes[..oid_contents.len()].copy_from_slice(oid_contents);
        Ok(Self {
            num_bytes: oid_contents.len() as u16,
            bytes,
        })
    }

    pub fn from_oid(oid: &ObjectIdentifier) -> Result<Self> {
        Self::new(oid.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.num_bytes)]
    }

    pub fn is_any_policy(&self) -> bool {
        *self == Self::ANY_POLICY
    }
}

impl PartialEq for CertPolicyId {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for CertPolicyId {}

impl fmt::Debug for CertPolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match ObjectIdentifier::from_bytes(self.as_bytes()) {
            Ok(oid) => write!(f, "CertPolicyId({})", oid),
            Err(_) => write!(f, "CertPolicyId({:02x?})", self.as_bytes()),
        }
    }
}
