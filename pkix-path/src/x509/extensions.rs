// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! X.509 v3 certificate extensions recognized by the path builder.
//!
//! Each certificate's extension block is read once. The eight recognized
//! extensions are stored in a fixed map keyed by [`ExtensionId`], each
//! entry holding the raw `extnValue` span and its parsed content, so later
//! checks can consult them in whatever order they need.
//!
//! # Recognized extensions
//!
//! - Authority Information Access (kept as a span for revocation lookups)
//! - Basic Constraints
//! - Certificate Policies
//! - Extended Key Usage
//! - Inhibit anyPolicy
//! - Key Usage
//! - Name Constraints (kept as a span, evaluated by `certificate::name`)
//! - Subject Alternative Name (kept as a span, evaluated by `certificate::name`)

use alloc::vec::Vec;
use core::fmt;

use const_oid::ObjectIdentifier;
use der::{Decode, DecodeValue, Header, Reader, Sequence, SliceReader, Tag};

use super::oids;
use crate::error::{fail, Error, ErrorCode, Result, Severity};

fn invalid_value() -> Error {
    fail(Severity::Recoverable, ErrorCode::ExtensionValueInvalid)
}

// ============================================================================
// Extension identifiers
// ============================================================================

/// The extensions the path builder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionId {
    AuthorityInfoAccess,
    BasicConstraints,
    CertificatePolicies,
    ExtKeyUsage,
    InhibitAnyPolicy,
    KeyUsage,
    NameConstraints,
    SubjectAltName,
}

impl ExtensionId {
    pub const COUNT: usize = 8;

    pub const ALL: [ExtensionId; ExtensionId::COUNT] = [
        ExtensionId::AuthorityInfoAccess,
        ExtensionId::BasicConstraints,
        ExtensionId::CertificatePolicies,
        ExtensionId::ExtKeyUsage,
        ExtensionId::InhibitAnyPolicy,
        ExtensionId::KeyUsage,
        ExtensionId::NameConstraints,
        ExtensionId::SubjectAltName,
    ];

    /// Map an `extnID` onto a recognized extension, `None` if not understood.
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.oid() == *oid)
    }

    pub fn oid(self) -> ObjectIdentifier {
        match self {
            ExtensionId::AuthorityInfoAccess => oids::AUTHORITY_INFO_ACCESS,
            ExtensionId::BasicConstraints => oids::BASIC_CONSTRAINTS,
            ExtensionId::CertificatePolicies => oids::CERTIFICATE_POLICIES,
            ExtensionId::ExtKeyUsage => oids::EXTENDED_KEY_USAGE,
            ExtensionId::InhibitAnyPolicy => oids::INHIBIT_ANY_POLICY,
            ExtensionId::KeyUsage => oids::KEY_USAGE,
            ExtensionId::NameConstraints => oids::NAME_CONSTRAINTS,
            ExtensionId::SubjectAltName => oids::SUBJECT_ALT_NAME,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

// ============================================================================
// Basic Constraints - RFC 5280 Section 4.2.1.9
// ============================================================================

/// Basic Constraints extension.
///
/// ```asn1
/// BasicConstraints ::= SEQUENCE {
///     cA                      BOOLEAN DEFAULT FALSE,
///     pathLenConstraint       INTEGER (0..MAX) OPTIONAL
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Sequence)]
pub struct BasicConstraints {
    #[asn1(default = "default_false")]
    pub ca: bool,

    #[asn1(optional = "true")]
    pub path_len_constraint: Option<u32>,
}

fn default_false() -> bool {
    false
}

// ============================================================================
// Key Usage - RFC 5280 Section 4.2.1.3
// ============================================================================

/// Key Usage bits, indexed by their RFC 5280 bit number.
///
/// ```asn1
/// KeyUsage ::= BIT STRING {
///     digitalSignature        (0),
///     nonRepudiation          (1),
///     keyEncipherment         (2),
///     dataEncipherment        (3),
///     keyAgreement            (4),
///     keyCertSign             (5),
///     cRLSign                 (6),
///     encipherOnly            (7),
///     decipherOnly            (8)
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsageFlags {
    bits: u16,
}

impl KeyUsageFlags {
    pub const DIGITAL_SIGNATURE: u8 = 0;
    pub const KEY_CERT_SIGN: u8 = 5;
    pub const CRL_SIGN: u8 = 6;

    pub fn from_bits(bits: u16) -> Self {
        Self { bits }
    }

    /// Whether RFC 5280 bit `bit` is asserted.
    pub fn has(&self, bit: u8) -> bool {
        bit < 16 && (self.bits & (1 << bit)) != 0
    }

    /// Parse a DER `KeyUsage` BIT STRING.
    ///
    /// Padding bits must be zero and the last named bit must be set, since
    /// DER strips trailing zero bits from named bit lists.
    pub fn parse(value: &[u8]) -> Result<Self> {
        let mut reader = SliceReader::new(value).map_err(|_| invalid_value())?;
        let header = Header::decode(&mut reader).map_err(|_| invalid_value())?;
        if header.tag != Tag::BitString {
            return Err(invalid_value());
        }
        let contents = reader
            .read_slice(header.length)
            .map_err(|_| invalid_value())?;
        if !reader.is_finished() {
            return Err(invalid_value());
        }

        let (unused_bits, bytes) = match contents.split_first() {
            Some((unused, bytes)) if !bytes.is_empty() => (*unused, bytes),
            _ => return Err(invalid_value()),
        };
        if unused_bits > 7 || bytes.len() > 2 {
            return Err(invalid_value());
        }
        let last = bytes[bytes.len() - 1];
        let padding_mask = (1u8 << unused_bits) - 1;
        if last & padding_mask != 0 || (last >> unused_bits) & 1 == 0 {
            return Err(invalid_value());
        }

        let mut bits = 0u16;
        for (byte_index, byte) in bytes.iter().enumerate() {
            for bit_in_byte in 0..8 {
                if byte & (0x80 >> bit_in_byte) != 0 {
                    bits |= 1 << (byte_index * 8 + bit_in_byte);
                }
            }
        }
        Ok(Self { bits })
    }
}

impl fmt::Display for KeyUsageFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; 9] = [
            "digitalSignature",
            "nonRepudiation",
            "keyEncipherment",
            "dataEncipherment",
            "keyAgreement",
            "keyCertSign",
            "cRLSign",
            "encipherOnly",
            "decipherOnly",
        ];
        let mut first = true;
        for (bit, name) in NAMES.iter().enumerate() {
            if self.has(bit as u8) {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Extended Key Usage - RFC 5280 Section 4.2.1.12
// ============================================================================

/// Extended Key Usage extension.
///
/// ```asn1
/// ExtKeyUsageSyntax ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId
/// KeyPurposeId ::= OBJECT IDENTIFIER
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedKeyUsage {
    pub key_purposes: Vec<ObjectIdentifier>,
}

// Manual Decode implementation for SEQUENCE OF
impl<'a> DecodeValue<'a> for ExtendedKeyUsage {
    fn decode_value<R: Reader<'a>>(reader: &mut R, header: Header) -> der::Result<Self> {
        header.tag.assert_eq(Tag::Sequence)?;
        reader.read_nested(header.length, |reader| {
            let mut key_purposes = Vec::new();
            while !reader.is_finished() {
                key_purposes.push(ObjectIdentifier::decode(reader)?);
            }
            Ok(Self { key_purposes })
        })
    }
}

impl<'a> Decode<'a> for ExtendedKeyUsage {
    fn decode<R: Reader<'a>>(reader: &mut R) -> der::Result<Self> {
        let header = Header::decode(reader)?;
        Self::decode_value(reader, header)
    }
}

impl ExtendedKeyUsage {
    pub fn new(key_purposes: Vec<ObjectIdentifier>) -> Self {
        Self { key_purposes }
    }

    pub fn has_purpose(&self, oid: &ObjectIdentifier) -> bool {
        self.key_purposes.iter().any(|p| p == oid)
    }
}

// ============================================================================
// Parsed content and the recognized-extension map
// ============================================================================

/// Parsed content of one recognized extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedExtension<'a> {
    /// `AuthorityInfoAccessSyntax` SEQUENCE, left unparsed
    AuthorityInfoAccess(&'a [u8]),
    BasicConstraints(BasicConstraints),
    /// policyIdentifier OID contents, in certificate order
    CertificatePolicies(Vec<&'a [u8]>),
    ExtKeyUsage(ExtendedKeyUsage),
    /// SkipCerts
    InhibitAnyPolicy(u32),
    KeyUsage(KeyUsageFlags),
    /// `NameConstraints` SEQUENCE, left unparsed
    NameConstraints(&'a [u8]),
    /// `GeneralNames` SEQUENCE, left unparsed
    SubjectAltName(&'a [u8]),
}

impl<'a> ParsedExtension<'a> {
    /// Parse the `extnValue` contents of a recognized extension.
    pub fn parse(id: ExtensionId, value: &'a [u8]) -> Result<Self> {
        match id {
            ExtensionId::AuthorityInfoAccess => {
                Ok(ParsedExtension::AuthorityInfoAccess(single_sequence(value)?))
            }
            ExtensionId::NameConstraints => {
                Ok(ParsedExtension::NameConstraints(single_sequence(value)?))
            }
            ExtensionId::SubjectAltName => {
                let names = single_sequence(value)?;
                if sequence_contents(names)?.is_empty() {
                    return Err(invalid_value());
                }
                Ok(ParsedExtension::SubjectAltName(names))
            }
            ExtensionId::BasicConstraints => BasicConstraints::from_der(value)
                .map(ParsedExtension::BasicConstraints)
                .map_err(|_| invalid_value()),
            ExtensionId::CertificatePolicies => {
                parse_certificate_policies(value).map(ParsedExtension::CertificatePolicies)
            }
            ExtensionId::ExtKeyUsage => {
                let eku = ExtendedKeyUsage::from_der(value).map_err(|_| invalid_value())?;
                if eku.key_purposes.is_empty() {
                    return Err(invalid_value());
                }
                Ok(ParsedExtension::ExtKeyUsage(eku))
            }
            ExtensionId::InhibitAnyPolicy => u32::from_der(value)
                .map(ParsedExtension::InhibitAnyPolicy)
                .map_err(|_| invalid_value()),
            ExtensionId::KeyUsage => KeyUsageFlags::parse(value).map(ParsedExtension::KeyUsage),
        }
    }
}

/// `value` must be exactly one SEQUENCE TLV.
fn single_sequence(value: &[u8]) -> Result<&[u8]> {
    sequence_contents(value)?;
    Ok(value)
}

fn sequence_contents(value: &[u8]) -> Result<&[u8]> {
    let mut reader = SliceReader::new(value).map_err(|_| invalid_value())?;
    let header = Header::decode(&mut reader).map_err(|_| invalid_value())?;
    if header.tag != Tag::Sequence {
        return Err(invalid_value());
    }
    let contents = reader
        .read_slice(header.length)
        .map_err(|_| invalid_value())?;
    if !reader.is_finished() {
        return Err(invalid_value());
    }
    Ok(contents)
}

/// ```asn1
/// certificatePolicies ::= SEQUENCE SIZE (1..MAX) OF PolicyInformation
/// PolicyInformation ::= SEQUENCE {
///     policyIdentifier   CertPolicyId,
///     policyQualifiers   SEQUENCE SIZE (1..MAX) OF PolicyQualifierInfo OPTIONAL }
/// ```
fn parse_certificate_policies(value: &[u8]) -> Result<Vec<&[u8]>> {
    let contents = sequence_contents(value)?;
    let mut reader = SliceReader::new(contents).map_err(|_| invalid_value())?;
    let mut policies = Vec::new();
    while !reader.is_finished() {
        let info = reader.tlv_bytes().map_err(|_| invalid_value())?;
        let info_contents = sequence_contents(info)?;
        let mut info_reader = SliceReader::new(info_contents).map_err(|_| invalid_value())?;
        let oid_header = Header::decode(&mut info_reader).map_err(|_| invalid_value())?;
        if oid_header.tag != Tag::ObjectIdentifier {
            return Err(invalid_value());
        }
        let oid = info_reader
            .read_slice(oid_header.length)
            .map_err(|_| invalid_value())?;
        ObjectIdentifier::from_bytes(oid).map_err(|_| invalid_value())?;
        if !info_reader.is_finished() {
            let qualifiers = info_reader.tlv_bytes().map_err(|_| invalid_value())?;
            sequence_contents(qualifiers)?;
            if !info_reader.is_finished() {
                return Err(invalid_value());
            }
        }
        policies.push(oid);
    }
    if policies.is_empty() {
        return Err(invalid_value());
    }
    Ok(policies)
}

/// One recognized extension as it appeared in the certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedExtension<'a> {
    pub critical: bool,
    /// `extnValue` OCTET STRING contents
    pub value: &'a [u8],
    pub parsed: ParsedExtension<'a>,
}

/// The recognized extensions of one certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extensions<'a> {
    entries: [Option<RecordedExtension<'a>>; ExtensionId::COUNT],
}

impl<'a> Extensions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recognized extension.
    ///
    /// Empty values, duplicates and unparseable content are all
    /// `ExtensionValueInvalid`.
    pub fn record(&mut self, id: ExtensionId, critical: bool, value: &'a [u8]) -> Result<()> {
        if value.is_empty() {
            return Err(invalid_value());
        }
        let slot = &mut self.entries[id.index()];
        if slot.is_some() {
            return Err(invalid_value());
        }
        let parsed = ParsedExtension::parse(id, value)?;
        *slot = Some(RecordedExtension {
            critical,
            value,
            parsed,
        });
        Ok(())
    }

    pub fn get(&self, id: ExtensionId) -> Option<&RecordedExtension<'a>> {
        self.entries[id.index()].as_ref()
    }

    pub fn contains(&self, id: ExtensionId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExtensionId, &RecordedExtension<'a>)> + '_ {
        ExtensionId::ALL
            .iter()
            .filter_map(move |id| self.get(*id).map(|ext| (*id, ext)))
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Tests
// ============================================================================
