// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Certificate field extraction.
//!
//! [`BackCert`] parses one DER certificate strictly and keeps borrowed spans
//! of every field the path builder needs. Nothing is copied: the DER buffer
//! must outlive the node.
//!
//! ```asn1
//! Certificate  ::=  SEQUENCE  {
//!     tbsCertificate       TBSCertificate,
//!     signatureAlgorithm   AlgorithmIdentifier,
//!     signatureValue       BIT STRING
//! }
//!
//! TBSCertificate  ::=  SEQUENCE  {
//!     version         [0]  EXPLICIT Version DEFAULT v1,
//!     serialNumber         CertificateSerialNumber,
//!     signature            AlgorithmIdentifier,
//!     issuer               Name,
//!     validity             Validity,
//!     subject              Name,
//!     subjectPublicKeyInfo SubjectPublicKeyInfo,
//!     issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
//!     subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
//!     extensions      [3]  EXPLICIT Extensions OPTIONAL
//! }
//! ```

pub mod name;

use core::fmt;

use const_oid::ObjectIdentifier;
use der::{Decode, Header, Reader, SliceReader, Tag, TagNumber};

use crate::chain::NodeIndex;
use crate::error::{fail, ErrorCode, Result, Severity};
use crate::time::Validity;
use crate::x509::extensions::{
    BasicConstraints, ExtendedKeyUsage, ExtensionId, Extensions, KeyUsageFlags, ParsedExtension,
};

// ============================================================================
// DER span helpers
// ============================================================================

fn bad_der() -> crate::error::Error {
    fail(Severity::Recoverable, ErrorCode::BadDer)
}

/// Read the next TLV, which must carry `tag`. Returns `(tlv, contents)`.
pub(crate) fn read_tlv<'a>(
    reader: &mut SliceReader<'a>,
    tag: Tag,
) -> Result<(&'a [u8], &'a [u8])> {
    let tlv = reader.tlv_bytes()?;
    let contents = tlv_contents(tlv, tag)?;
    Ok((tlv, contents))
}

/// Contents of `tlv`, which must be exactly one TLV carrying `tag`.
pub(crate) fn tlv_contents(tlv: &[u8], tag: Tag) -> Result<&[u8]> {
    let mut reader = SliceReader::new(tlv)?;
    let header = Header::decode(&mut reader)?;
    if header.tag != tag {
        return Err(bad_der());
    }
    let contents = reader.read_slice(header.length)?;
    if !reader.is_finished() {
        return Err(bad_der());
    }
    Ok(contents)
}

/// Whether the next element carries `tag`. `false` at end of input.
pub(crate) fn next_is(reader: &SliceReader<'_>, tag: Tag) -> bool {
    !reader.is_finished() && matches!(reader.peek_tag(), Ok(t) if t == tag)
}

pub(crate) fn ensure_finished(reader: &SliceReader<'_>) -> Result<()> {
    if reader.is_finished() {
        Ok(())
    } else {
        Err(bad_der())
    }
}

pub(crate) const fn context_tag(number: TagNumber, constructed: bool) -> Tag {
    Tag::ContextSpecific {
        constructed,
        number,
    }
}

// ============================================================================
// Version - RFC 5280 Section 4.1.2.1
// ============================================================================

/// ```asn1
/// Version  ::=  INTEGER  {  v1(0), v2(1), v3(2)  }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Version {
    V1 = 0,
    V2 = 1,
    V3 = 2,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::V1 => write!(f, "v1"),
            Version::V2 => write!(f, "v2"),
            Version::V3 => write!(f, "v3"),
        }
    }
}

// ============================================================================
// Signed data
// ============================================================================

/// The three parts of any signed X.509 structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedData<'a> {
    /// The signed TLV (e.g. the full tbsCertificate encoding)
    pub data: &'a [u8],
    /// AlgorithmIdentifier TLV
    pub algorithm: &'a [u8],
    /// Signature bytes, without the BIT STRING unused-bits octet
    pub signature: &'a [u8],
}

impl<'a> SignedData<'a> {
    /// Read `tbs, signatureAlgorithm, signature BIT STRING` from `reader`.
    ///
    /// The signature BIT STRING must not have unused bits.
    pub(crate) fn read(reader: &mut SliceReader<'a>) -> Result<Self> {
        let (data, _) = read_tlv(reader, Tag::Sequence)?;
        let (algorithm, _) = read_tlv(reader, Tag::Sequence)?;
        let (_, bits) = read_tlv(reader, Tag::BitString)?;
        let signature = match bits.split_first() {
            Some((0, signature)) => signature,
            _ => return Err(bad_der()),
        };
        Ok(Self {
            data,
            algorithm,
            signature,
        })
    }
}

// ============================================================================
// BackCert
// ============================================================================

/// Whether name constraints treat the subject CN as a dNSName.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IncludeCn {
    #[default]
    No,
    Yes,
}

/// One certificate under consideration during path building.
///
/// Holds the position of the node one step closer to the end-entity
/// (`child`), so properties that span the chain, such as name constraints,
/// can walk back down.
#[derive(Debug, Clone)]
pub struct BackCert<'a> {
    der: &'a [u8],
    child: Option<NodeIndex>,
    include_cn: IncludeCn,
    version: Version,
    signed_data: SignedData<'a>,
    issuer: &'a [u8],
    validity: &'a [u8],
    serial_number: &'a [u8],
    subject: &'a [u8],
    subject_public_key_info: &'a [u8],
    extensions: Extensions<'a>,
}

impl<'a> BackCert<'a> {
    /// Parse `der`.
    ///
    /// Every failure is recoverable: a malformed certificate only disqualifies
    /// itself, never the search.
    pub fn new(der: &'a [u8], child: Option<NodeIndex>, include_cn: IncludeCn) -> Result<Self> {
        let mut outer = SliceReader::new(der)?;
        let (_, cert_contents) = read_tlv(&mut outer, Tag::Sequence)?;
        ensure_finished(&outer)?;

        let mut cert = SliceReader::new(cert_contents)?;
        let signed_data = SignedData::read(&mut cert)?;
        ensure_finished(&cert)?;

        let tbs_contents = tlv_contents(signed_data.data, Tag::Sequence)?;
        let mut tbs = SliceReader::new(tbs_contents)?;

        let version = Self::read_version(&mut tbs)?;

        let (_, serial_number) = read_tlv(&mut tbs, Tag::Integer)?;
        if serial_number.is_empty() {
            return Err(bad_der());
        }

        let (inner_algorithm, _) = read_tlv(&mut tbs, Tag::Sequence)?;
        let (issuer, _) = read_tlv(&mut tbs, Tag::Sequence)?;
        let (validity, _) = read_tlv(&mut tbs, Tag::Sequence)?;
        let (subject, _) = read_tlv(&mut tbs, Tag::Sequence)?;
        let (subject_public_key_info, _) = read_tlv(&mut tbs, Tag::Sequence)?;

        for number in [TagNumber::N1, TagNumber::N2] {
            if next_is(&tbs, context_tag(number, false)) {
                if version == Version::V1 {
                    return Err(bad_der());
                }
                tbs.tlv_bytes()?;
            }
        }

        let mut extensions = Extensions::new();
        if next_is(&tbs, context_tag(TagNumber::N3, true)) {
            if version != Version::V3 {
                return Err(bad_der());
            }
            let (_, wrapped) = read_tlv(&mut tbs, context_tag(TagNumber::N3, true))?;
            Self::read_extensions(tlv_contents(wrapped, Tag::Sequence)?, &mut extensions)?;
        }
        ensure_finished(&tbs)?;

        // Compared after the structure is known to be well-formed, so a
        // truncated certificate reports BadDer first.
        if inner_algorithm != signed_data.algorithm {
            return Err(fail(
                Severity::Recoverable,
                ErrorCode::SignatureAlgorithmMismatch,
            ));
        }

        Ok(Self {
            der,
            child,
            include_cn,
            version,
            signed_data,
            issuer,
            validity,
            serial_number,
            subject,
            subject_public_key_info,
            extensions,
        })
    }

    /// `[0] EXPLICIT Version DEFAULT v1`. An explicitly encoded v1 is not DER.
    fn read_version(tbs: &mut SliceReader<'a>) -> Result<Version> {
        if !next_is(tbs, context_tag(TagNumber::N0, true)) {
            return Ok(Version::V1);
        }
        let (_, wrapped) = read_tlv(tbs, context_tag(TagNumber::N0, true))?;
        match u8::from_der(wrapped)? {
            1 => Ok(Version::V2),
            2 => Ok(Version::V3),
            _ => Err(bad_der()),
        }
    }

    /// ```asn1
    /// Extensions  ::=  SEQUENCE SIZE (1..MAX) OF Extension
    /// Extension  ::=  SEQUENCE  {
    ///     extnID      OBJECT IDENTIFIER,
    ///     critical    BOOLEAN DEFAULT FALSE,
    ///     extnValue   OCTET STRING
    /// }
    /// ```
    fn read_extensions(contents: &'a [u8], extensions: &mut Extensions<'a>) -> Result<()> {
        if contents.is_empty() {
            return Err(bad_der());
        }
        let mut list = SliceReader::new(contents)?;
        while !list.is_finished() {
            let (_, extension) = read_tlv(&mut list, Tag::Sequence)?;
            let mut fields = SliceReader::new(extension)?;

            let extn_id = ObjectIdentifier::decode(&mut fields)?;
            let critical = if next_is(&fields, Tag::Boolean) {
                // DEFAULT FALSE must be omitted
                if !bool::decode(&mut fields)? {
                    return Err(bad_der());
                }
                true
            } else {
                false
            };
            let (_, value) = read_tlv(&mut fields, Tag::OctetString)?;
            ensure_finished(&fields)?;

            match ExtensionId::from_oid(&extn_id) {
                Some(id) => extensions.record(id, critical, value)?,
                None if critical => {
                    log::debug!("unknown critical extension {}", extn_id);
                    return Err(fail(
                        Severity::Recoverable,
                        ErrorCode::UnknownCriticalExtension,
                    ));
                }
                None => {}
            }
        }
        Ok(())
    }

    pub fn der(&self) -> &'a [u8] {
        self.der
    }

    /// Arena index of the node one step closer to the end-entity.
    pub fn child(&self) -> Option<NodeIndex> {
        self.child
    }

    pub fn include_cn(&self) -> IncludeCn {
        self.include_cn
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn signed_data(&self) -> &SignedData<'a> {
        &self.signed_data
    }

    /// Issuer Name TLV.
    pub fn issuer(&self) -> &'a [u8] {
        self.issuer
    }

    /// Validity TLV.
    pub fn validity(&self) -> &'a [u8] {
        self.validity
    }

    /// Parse the validity span.
    pub fn parse_validity(&self) -> Result<Validity> {
        Validity::parse(self.validity)
    }

    /// Serial number INTEGER contents.
    pub fn serial_number(&self) -> &'a [u8] {
        self.serial_number
    }

    /// Subject Name TLV.
    pub fn subject(&self) -> &'a [u8] {
        self.subject
    }

    /// SubjectPublicKeyInfo TLV.
    pub fn subject_public_key_info(&self) -> &'a [u8] {
        self.subject_public_key_info
    }

    pub fn extensions(&self) -> &Extensions<'a> {
        &self.extensions
    }

    fn parsed(&self, id: ExtensionId) -> Option<&ParsedExtension<'a>> {
        self.extensions.get(id).map(|ext| &ext.parsed)
    }

    /// authorityInfoAccess `extnValue`.
    pub fn authority_info_access(&self) -> Option<&'a [u8]> {
        match self.parsed(ExtensionId::AuthorityInfoAccess) {
            Some(ParsedExtension::AuthorityInfoAccess(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn basic_constraints(&self) -> Option<BasicConstraints> {
        match self.parsed(ExtensionId::BasicConstraints) {
            Some(ParsedExtension::BasicConstraints(bc)) => Some(*bc),
            _ => None,
        }
    }

    /// Policy OID contents in certificate order.
    pub fn certificate_policies(&self) -> Option<&[&'a [u8]]> {
        match self.parsed(ExtensionId::CertificatePolicies) {
            Some(ParsedExtension::CertificatePolicies(policies)) => Some(policies.as_slice()),
            _ => None,
        }
    }

    pub fn ext_key_usage(&self) -> Option<&ExtendedKeyUsage> {
        match self.parsed(ExtensionId::ExtKeyUsage) {
            Some(ParsedExtension::ExtKeyUsage(eku)) => Some(eku),
            _ => None,
        }
    }

    /// SkipCerts of inhibitAnyPolicy.
    pub fn inhibit_any_policy(&self) -> Option<u32> {
        match self.parsed(ExtensionId::InhibitAnyPolicy) {
            Some(ParsedExtension::InhibitAnyPolicy(skip)) => Some(*skip),
            _ => None,
        }
    }

    pub fn key_usage(&self) -> Option<KeyUsageFlags> {
        match self.parsed(ExtensionId::KeyUsage) {
            Some(ParsedExtension::KeyUsage(ku)) => Some(*ku),
            _ => None,
        }
    }

    /// nameConstraints `extnValue`.
    pub fn name_constraints(&self) -> Option<&'a [u8]> {
        match self.parsed(ExtensionId::NameConstraints) {
            Some(ParsedExtension::NameConstraints(value)) => Some(*value),
            _ => None,
        }
    }

    /// subjectAltName `extnValue`.
    pub fn subject_alt_name(&self) -> Option<&'a [u8]> {
        match self.parsed(ExtensionId::SubjectAltName) {
            Some(ParsedExtension::SubjectAltName(value)) => Some(*value),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
