// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Cryptographic backend abstraction.
//!
//! The path builder itself never calls a crypto library. Trust domains verify
//! signatures through a [`CryptoBackend`], usually via [`verify_signed_data`],
//! and OCSP helpers use it for SHA-1 CertID hashes.

use const_oid::ObjectIdentifier;
use der::{AnyRef, Decode, Reader, SliceReader, TagMode, TagNumber};
use spki::{AlgorithmIdentifierRef, SubjectPublicKeyInfoRef};

use crate::certificate::SignedData;
use crate::error::{fail, Error, ErrorCode, Result, Severity};
use crate::x509::oids;

#[cfg(feature = "ring-backend")]
mod ring;
#[cfg(feature = "ring-backend")]
pub use self::ring::*;

/// Length of a SHA-1 digest.
pub const SHA1_LEN: usize = 20;

fn unsupported() -> Error {
    fail(
        Severity::Recoverable,
        ErrorCode::UnsupportedSignatureAlgorithm,
    )
}

/// Signature schemes a backend may be asked to verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    EcdsaP256Sha256,
    EcdsaP256Sha384,
    EcdsaP384Sha256,
    EcdsaP384Sha384,
    RsaPkcs1Sha256,
    RsaPkcs1Sha384,
    RsaPkcs1Sha512,
    RsaPssSha256,
    RsaPssSha384,
    RsaPssSha512,
    /// Pure EdDSA, no separate digest
    Ed25519,
}

impl SignatureAlgorithm {
    /// Resolve a signature AlgorithmIdentifier against the signer's key.
    ///
    /// ECDSA identifiers name only the digest, so `curve` (the namedCurve of
    /// an ecPublicKey) picks the curve. RSASSA-PSS takes its digest from the
    /// identifier's parameters.
    pub fn from_oid_with_params(
        sig_oid: &ObjectIdentifier,
        curve: Option<&ObjectIdentifier>,
        params: Option<&AnyRef<'_>>,
    ) -> Result<Self> {
        let p256 = Some(&oids::ECDSA_P256);
        let p384 = Some(&oids::ECDSA_P384);

        let algorithm = match (*sig_oid, curve) {
            (oids::ECDSA_WITH_SHA256, c) if c == p256 => Self::EcdsaP256Sha256,
            (oids::ECDSA_WITH_SHA256, c) if c == p384 => Self::EcdsaP384Sha256,
            (oids::ECDSA_WITH_SHA384, c) if c == p256 => Self::EcdsaP256Sha384,
            (oids::ECDSA_WITH_SHA384, c) if c == p384 => Self::EcdsaP384Sha384,
            (oids::SHA256_WITH_RSA, _) => Self::RsaPkcs1Sha256,
            (oids::SHA384_WITH_RSA, _) => Self::RsaPkcs1Sha384,
            (oids::SHA512_WITH_RSA, _) => Self::RsaPkcs1Sha512,
            (oids::RSASSA_PSS, _) => Self::rsa_pss(params)?,
            (oids::ED25519, _) => Self::Ed25519,
            (oid, curve) => {
                log::debug!("unsupported signature algorithm {} (curve {:?})", oid, curve);
                return Err(unsupported());
            }
        };
        Ok(algorithm)
    }

    /// ```asn1
    /// RSASSA-PSS-params ::= SEQUENCE {
    ///     hashAlgorithm     [0] HashAlgorithm DEFAULT sha1,
    ///     maskGenAlgorithm  [1] MaskGenAlgorithm DEFAULT mgf1SHA1,
    ///     saltLength        [2] INTEGER DEFAULT 20,
    ///     trailerField      [3] TrailerField DEFAULT trailerFieldBC
    /// }
    /// ```
    ///
    /// The SHA-1 defaults are not supported.
    fn rsa_pss(params: Option<&AnyRef<'_>>) -> Result<Self> {
        let params = params.ok_or_else(unsupported)?;
        let mut reader = SliceReader::new(params.value()).map_err(|_| unsupported())?;
        let hash = reader
            .context_specific::<AlgorithmIdentifierRef<'_>>(TagNumber::N0, TagMode::Explicit)
            .ok()
            .flatten()
            .map(|alg| alg.oid);

        match hash {
            Some(oids::SHA256) => Ok(Self::RsaPssSha256),
            Some(oids::SHA384) => Ok(Self::RsaPssSha384),
            Some(oids::SHA512) => Ok(Self::RsaPssSha512),
            other => {
                log::debug!("RSA-PSS with unsupported hash {:?}", other);
                Err(unsupported())
            }
        }
    }
}

/// Crypto operations needed for certificate and OCSP verification.
pub trait CryptoBackend {
    /// Verify `signature` over `tbs_data` with a raw public key (the
    /// subjectPublicKey BIT STRING contents).
    fn verify_signature(
        &self,
        algorithm: SignatureAlgorithm,
        tbs_data: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<()>;

    /// SHA-1, for OCSP CertID hashes only.
    fn sha1_digest(&self, data: &[u8]) -> Result<[u8; SHA1_LEN]>;
}

/// Verify `signed_data` with the key in the `subject_public_key_info` TLV.
pub fn verify_signed_data<B: CryptoBackend + ?Sized>(
    backend: &B,
    signed_data: &SignedData<'_>,
    subject_public_key_info: &[u8],
) -> Result<()> {
    let signature_algorithm = AlgorithmIdentifierRef::from_der(signed_data.algorithm)?;
    let spki = SubjectPublicKeyInfoRef::from_der(subject_public_key_info)
        .map_err(|_| fail(Severity::Recoverable, ErrorCode::BadKey))?;

    let curve = match spki.algorithm.oid {
        oids::ECPUBLICKEY => spki
            .algorithm
            .parameters
            .and_then(|p| p.decode_as::<ObjectIdentifier>().ok()),
        _ => None,
    };
    let algorithm = SignatureAlgorithm::from_oid_with_params(
        &signature_algorithm.oid,
        curve.as_ref(),
        signature_algorithm.parameters.as_ref(),
    )?;

    let public_key = spki
        .subject_public_key
        .as_bytes()
        .ok_or_else(|| fail(Severity::Recoverable, ErrorCode::BadKey))?;

    log::trace!("verify_signed_data: {:?}", algorithm);
    backend.verify_signature(algorithm, signed_data.data, signed_data.signature, public_key)
}
