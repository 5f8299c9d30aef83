// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! GeneralName iteration and name constraint evaluation (RFC 5280 4.2.1.10).
//!
//! Names are borrowed spans of the certificate; nothing is decoded into
//! owned strings. Supported constraint forms are dNSName, rfc822Name,
//! iPAddress and directoryName. A constraint of any other form rejects a
//! certificate carrying a name of that form, since it cannot be evaluated.

use alloc::vec::Vec;

use const_oid::ObjectIdentifier;
use der::{Decode, Header, Reader, SliceReader, Tag};

use super::{next_is, read_tlv, tlv_contents, BackCert, IncludeCn};
use crate::error::{fail, Error, ErrorCode, Result, Severity};
use crate::x509::oids;

fn bad_der() -> Error {
    fail(Severity::Recoverable, ErrorCode::BadDer)
}

fn not_in_name_space() -> Error {
    fail(Severity::Recoverable, ErrorCode::CertNotInNameSpace)
}

// ============================================================================
// GeneralName - RFC 5280 Section 4.2.1.6
// ============================================================================

/// ```asn1
/// GeneralName ::= CHOICE {
///      otherName                       [0]     OtherName,
///      rfc822Name                      [1]     IA5String,
///      dNSName                         [2]     IA5String,
///      x400Address                     [3]     ORAddress,
///      directoryName                   [4]     Name,
///      ediPartyName                    [5]     EDIPartyName,
///      uniformResourceIdentifier       [6]     IA5String,
///      iPAddress                       [7]     OCTET STRING,
///      registeredID                    [8]     OBJECT IDENTIFIER }
/// ```
///
/// Every variant holds the contents octets, except `DirectoryName` which
/// holds the inner Name TLV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneralName<'a> {
    OtherName(&'a [u8]),
    Rfc822Name(&'a [u8]),
    DnsName(&'a [u8]),
    X400Address(&'a [u8]),
    DirectoryName(&'a [u8]),
    EdiPartyName(&'a [u8]),
    Uri(&'a [u8]),
    IpAddress(&'a [u8]),
    RegisteredId(&'a [u8]),
}

impl<'a> GeneralName<'a> {
    pub fn read(reader: &mut SliceReader<'a>) -> Result<Self> {
        let header = Header::decode(reader)?;
        let contents = reader.read_slice(header.length)?;
        let (constructed, number) = match header.tag {
            Tag::ContextSpecific {
                constructed,
                number,
            } => (constructed, number.value()),
            _ => return Err(bad_der()),
        };
        let name = match (number, constructed) {
            (0, true) => GeneralName::OtherName(contents),
            (1, false) => GeneralName::Rfc822Name(contents),
            (2, false) => GeneralName::DnsName(contents),
            (3, true) => GeneralName::X400Address(contents),
            (4, true) => {
                // EXPLICIT: exactly one Name inside
                tlv_contents(contents, Tag::Sequence)?;
                GeneralName::DirectoryName(contents)
            }
            (5, true) => GeneralName::EdiPartyName(contents),
            (6, false) => GeneralName::Uri(contents),
            (7, false) => GeneralName::IpAddress(contents),
            (8, false) => GeneralName::RegisteredId(contents),
            _ => return Err(bad_der()),
        };
        Ok(name)
    }

    /// The CHOICE tag number, shared by names of the same form.
    pub fn form(&self) -> u8 {
        match self {
            GeneralName::OtherName(_) => 0,
            GeneralName::Rfc822Name(_) => 1,
            GeneralName::DnsName(_) => 2,
            GeneralName::X400Address(_) => 3,
            GeneralName::DirectoryName(_) => 4,
            GeneralName::EdiPartyName(_) => 5,
            GeneralName::Uri(_) => 6,
            GeneralName::IpAddress(_) => 7,
            GeneralName::RegisteredId(_) => 8,
        }
    }
}

/// Iterator over a `GeneralNames` SEQUENCE, e.g. a subjectAltName value.
///
/// Yields an error once and then stops if the encoding is malformed.
pub struct GeneralNames<'a> {
    reader: Option<SliceReader<'a>>,
}

impl<'a> GeneralNames<'a> {
    pub fn new(sequence_tlv: &'a [u8]) -> Result<Self> {
        let contents = tlv_contents(sequence_tlv, Tag::Sequence)?;
        Ok(Self {
            reader: Some(SliceReader::new(contents)?),
        })
    }
}

impl<'a> Iterator for GeneralNames<'a> {
    type Item = Result<GeneralName<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        if reader.is_finished() {
            self.reader = None;
            return None;
        }
        let item = GeneralName::read(reader);
        if item.is_err() {
            self.reader = None;
        }
        Some(item)
    }
}

/// commonName values of `name_tlv` that are string typed.
pub fn common_names(name_tlv: &[u8]) -> Result<Vec<&[u8]>> {
    let mut found = Vec::new();
    let mut rdns = SliceReader::new(tlv_contents(name_tlv, Tag::Sequence)?)?;
    while !rdns.is_finished() {
        let (_, rdn) = read_tlv(&mut rdns, Tag::Set)?;
        let mut atvs = SliceReader::new(rdn)?;
        while !atvs.is_finished() {
            let (_, atv) = read_tlv(&mut atvs, Tag::Sequence)?;
            let mut fields = SliceReader::new(atv)?;
            let attr_type = ObjectIdentifier::decode(&mut fields)?;
            let header = Header::decode(&mut fields)?;
            let value = fields.read_slice(header.length)?;
            if attr_type == oids::COMMON_NAME
                && matches!(
                    header.tag,
                    Tag::Utf8String | Tag::PrintableString | Tag::Ia5String
                )
            {
                found.push(value);
            }
        }
    }
    Ok(found)
}

fn is_empty_name(name_tlv: &[u8]) -> Result<bool> {
    Ok(tlv_contents(name_tlv, Tag::Sequence)?.is_empty())
}

fn looks_like_dns_name(value: &[u8]) -> bool {
    !value.is_empty()
        && value
            .iter()
            .all(|&c| c.is_ascii_alphanumeric() || matches!(c, b'-' | b'.' | b'*' | b'_'))
}

// ============================================================================
// NameConstraints
// ============================================================================

/// ```asn1
/// NameConstraints ::= SEQUENCE {
///      permittedSubtrees       [0]     GeneralSubtrees OPTIONAL,
///      excludedSubtrees        [1]     GeneralSubtrees OPTIONAL }
///
/// GeneralSubtree ::= SEQUENCE {
///      base                    GeneralName,
///      minimum         [0]     BaseDistance DEFAULT 0,
///      maximum         [1]     BaseDistance OPTIONAL }
/// ```
///
/// `minimum` and `maximum` must be absent; RFC 5280 gives them no meaning
/// for any supported form.
#[derive(Debug, Clone, Default)]
pub struct NameConstraints<'a> {
    permitted: Vec<GeneralName<'a>>,
    excluded: Vec<GeneralName<'a>>,
}

impl<'a> NameConstraints<'a> {
    pub fn parse(tlv: &'a [u8]) -> Result<Self> {
        let mut reader = SliceReader::new(tlv_contents(tlv, Tag::Sequence)?)?;
        let mut constraints = Self::default();

        let permitted_tag = Tag::ContextSpecific {
            constructed: true,
            number: der::TagNumber::N0,
        };
        let excluded_tag = Tag::ContextSpecific {
            constructed: true,
            number: der::TagNumber::N1,
        };
        if next_is(&reader, permitted_tag) {
            let (_, subtrees) = read_tlv(&mut reader, permitted_tag)?;
            constraints.permitted = Self::read_subtrees(subtrees)?;
        }
        if next_is(&reader, excluded_tag) {
            let (_, subtrees) = read_tlv(&mut reader, excluded_tag)?;
            constraints.excluded = Self::read_subtrees(subtrees)?;
        }
        if !reader.is_finished()
            || (constraints.permitted.is_empty() && constraints.excluded.is_empty())
        {
            return Err(bad_der());
        }
        Ok(constraints)
    }

    fn read_subtrees(contents: &'a [u8]) -> Result<Vec<GeneralName<'a>>> {
        if contents.is_empty() {
            return Err(bad_der());
        }
        let mut bases = Vec::new();
        let mut reader = SliceReader::new(contents)?;
        while !reader.is_finished() {
            let (_, subtree) = read_tlv(&mut reader, Tag::Sequence)?;
            let mut fields = SliceReader::new(subtree)?;
            bases.push(GeneralName::read(&mut fields)?);
            if !fields.is_finished() {
                log::debug!("name constraint subtree carries minimum/maximum");
                return Err(bad_der());
            }
        }
        Ok(bases)
    }

    pub fn permitted(&self) -> &[GeneralName<'a>] {
        &self.permitted
    }

    pub fn excluded(&self) -> &[GeneralName<'a>] {
        &self.excluded
    }

    /// Check every name of `cert` against these constraints.
    ///
    /// The subject counts as a directoryName unless it is empty. With
    /// [`IncludeCn::Yes`] and no dNSName in subjectAltName, each subject CN
    /// that looks like a host name counts as a dNSName.
    pub fn check(&self, cert: &BackCert<'_>) -> Result<()> {
        let mut has_dns_name = false;
        if let Some(san) = cert.subject_alt_name() {
            for name in GeneralNames::new(san)? {
                let name = name?;
                if let GeneralName::DnsName(_) = name {
                    has_dns_name = true;
                }
                self.check_name(&name)?;
            }
        }

        if !is_empty_name(cert.subject())? {
            self.check_name(&GeneralName::DirectoryName(cert.subject()))?;
        }

        if cert.include_cn() == IncludeCn::Yes && !has_dns_name {
            for cn in common_names(cert.subject())? {
                if looks_like_dns_name(cn) {
                    self.check_name(&GeneralName::DnsName(cn))?;
                }
            }
        }
        Ok(())
    }

    /// Check a single presented name.
    pub fn check_name(&self, name: &GeneralName<'_>) -> Result<()> {
        if let GeneralName::IpAddress(address) = name {
            if address.len() != 4 && address.len() != 16 {
                return Err(bad_der());
            }
        }

        for base in self.excluded.iter().filter(|b| b.form() == name.form()) {
            if matches(base, name)? {
                log::debug!("name in excluded subtree {:?}", name);
                return Err(not_in_name_space());
            }
        }

        let mut constrained = false;
        for base in self.permitted.iter().filter(|b| b.form() == name.form()) {
            if matches(base, name)? {
                return Ok(());
            }
            constrained = true;
        }
        if constrained {
            log::debug!("name outside permitted subtrees {:?}", name);
            return Err(not_in_name_space());
        }
        Ok(())
    }
}

/// Whether `name` falls inside the subtree rooted at `base`. Both have the
/// same form.
fn matches(base: &GeneralName<'_>, name: &GeneralName<'_>) -> Result<bool> {
    match (base, name) {
        (GeneralName::DnsName(c), GeneralName::DnsName(n)) => Ok(dns_name_matches(c, n)),
        (GeneralName::Rfc822Name(c), GeneralName::Rfc822Name(n)) => Ok(rfc822_name_matches(c, n)),
        (GeneralName::IpAddress(c), GeneralName::IpAddress(n)) => ip_address_matches(c, n),
        (GeneralName::DirectoryName(c), GeneralName::DirectoryName(n)) => {
            directory_name_matches(c, n)
        }
        _ => {
            log::debug!("unsupported name constraint form {}", base.form());
            Err(not_in_name_space())
        }
    }
}

fn ends_with_ignore_case(value: &[u8], suffix: &[u8]) -> bool {
    value.len() >= suffix.len() && value[value.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// `example.com` matches itself and any subdomain; `.example.com` matches
/// subdomains only.
fn dns_name_matches(constraint: &[u8], name: &[u8]) -> bool {
    if constraint.is_empty() {
        return true;
    }
    if constraint[0] == b'.' {
        return name.len() > constraint.len() && ends_with_ignore_case(name, constraint);
    }
    if name.len() == constraint.len() {
        return name.eq_ignore_ascii_case(constraint);
    }
    name.len() > constraint.len()
        && name[name.len() - constraint.len() - 1] == b'.'
        && ends_with_ignore_case(name, constraint)
}

/// A constraint is a mailbox, a host, or `.domain` for any host under it.
fn rfc822_name_matches(constraint: &[u8], name: &[u8]) -> bool {
    if constraint.is_empty() {
        return true;
    }
    let (local, host) = match name.iter().rposition(|&b| b == b'@') {
        Some(at) => (&name[..at], &name[at + 1..]),
        None => return false,
    };
    if let Some(at) = constraint.iter().rposition(|&b| b == b'@') {
        return local == &constraint[..at] && host.eq_ignore_ascii_case(&constraint[at + 1..]);
    }
    if constraint[0] == b'.' {
        return host.len() > constraint.len() && ends_with_ignore_case(host, constraint);
    }
    host.eq_ignore_ascii_case(constraint)
}

/// Constraint is address followed by mask, 8 bytes for IPv4 or 32 for IPv6.
fn ip_address_matches(constraint: &[u8], address: &[u8]) -> Result<bool> {
    if constraint.len() != 8 && constraint.len() != 32 {
        return Err(bad_der());
    }
    let (network, mask) = constraint.split_at(constraint.len() / 2);
    if address.len() != network.len() {
        return Ok(false);
    }
    Ok(address
        .iter()
        .zip(network)
        .zip(mask)
        .all(|((a, n), m)| a & m == n & m))
}

/// The constraint's RDNs must be a prefix of the name's, compared byte for
/// byte per RDN.
fn directory_name_matches(constraint: &[u8], name: &[u8]) -> Result<bool> {
    let mut constraint_rdns = SliceReader::new(tlv_contents(constraint, Tag::Sequence)?)?;
    let mut name_rdns = SliceReader::new(tlv_contents(name, Tag::Sequence)?)?;
    while !constraint_rdns.is_finished() {
        let (expected, _) = read_tlv(&mut constraint_rdns, Tag::Set)?;
        if name_rdns.is_finished() {
            return Ok(false);
        }
        let (actual, _) = read_tlv(&mut name_rdns, Tag::Set)?;
        if expected != actual {
            return Ok(false);
        }
    }
    Ok(true)
}
