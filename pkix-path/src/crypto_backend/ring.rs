// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Ring cryptographic backend implementation.

use super::{CryptoBackend, SignatureAlgorithm, SHA1_LEN};
use crate::error::{fail, ErrorCode, Result, Severity};
use ring::digest;
use ring::signature::{self, UnparsedPublicKey};

/// Ring-based cryptographic backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct RingBackend;

impl CryptoBackend for RingBackend {
    fn verify_signature(
        &self,
        algorithm: SignatureAlgorithm,
        tbs_data: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<()> {
        log::trace!("Verifying signature with algorithm {:?}", algorithm);

        let ring_algo: &dyn signature::VerificationAlgorithm = match algorithm {
            SignatureAlgorithm::EcdsaP256Sha256 => &signature::ECDSA_P256_SHA256_ASN1,
            SignatureAlgorithm::EcdsaP256Sha384 => &signature::ECDSA_P256_SHA384_ASN1,
            SignatureAlgorithm::EcdsaP384Sha256 => &signature::ECDSA_P384_SHA256_ASN1,
            SignatureAlgorithm::EcdsaP384Sha384 => &signature::ECDSA_P384_SHA384_ASN1,
            SignatureAlgorithm::RsaPkcs1Sha256 => &signature::RSA_PKCS1_2048_8192_SHA256,
            SignatureAlgorithm::RsaPkcs1Sha384 => &signature::RSA_PKCS1_2048_8192_SHA384,
            SignatureAlgorithm::RsaPkcs1Sha512 => &signature::RSA_PKCS1_2048_8192_SHA512,
            SignatureAlgorithm::RsaPssSha256 => &signature::RSA_PSS_2048_8192_SHA256,
            SignatureAlgorithm::RsaPssSha384 => &signature::RSA_PSS_2048_8192_SHA384,
            SignatureAlgorithm::RsaPssSha512 => &signature::RSA_PSS_2048_8192_SHA512,
            SignatureAlgorithm::Ed25519 => &signature::ED25519,
        };

        let pk = UnparsedPublicKey::new(ring_algo, public_key);

        // ring does not tell a wrong signature from an unusable key
        pk.verify(tbs_data, signature).map_err(|_| {
            log::debug!("Signature verification failed ({:?})", algorithm);
            fail(Severity::Recoverable, ErrorCode::BadSignature)
        })?;

        log::trace!("Signature verification successful");
        Ok(())
    }

    fn sha1_digest(&self, data: &[u8]) -> Result<[u8; SHA1_LEN]> {
        let d = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, data);
        let mut out = [0u8; SHA1_LEN];
        if d.as_ref().len() != SHA1_LEN {
            log::error!("SHA-1 digest has unexpected length {}", d.as_ref().len());
            return Err(fail(Severity::Fatal, ErrorCode::LibraryFailure));
        }
        out.copy_from_slice(d.as_ref());
        Ok(out)
    }
}
