// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Certificate Path Building
//!
//! A no_std-compatible X.509 certification path builder. Given an end-entity
//! certificate, it searches for a chain to a trust anchor through a
//! caller-supplied [`TrustDomain`], which owns every policy decision: what
//! is trusted, where candidate issuers come from, how signatures are
//! verified and how revocation is checked.
//!
//! # Features
//! - Depth-first search with backtracking across alternative issuers
//! - Recoverable versus fatal errors, so one bad candidate never ends a search
//! - RFC 5280 checks: key usage, basic constraints, policies, EKU, validity
//!   and name constraints
//! - OCSP request encoding and response verification
//! - Optional `ring` signature verification backend
//!
//! # Example
//! ```no_run
//! use pkix_path::prelude::*;
//!
//! # fn example<T: TrustDomain>(trust_domain: &T, ee_der: &[u8]) -> pkix_path::Result<()> {
//! let now = pkix_path::time::current_time()?;
//! let options = BuildOptions::new().with_required_eku(KeyPurposeId::ServerAuth);
//! let chain = build_cert_chain(trust_domain, ee_der, now, &options, None)?;
//! for cert in chain.iter() {
//!     let _ = cert.subject();
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod certificate;
pub mod chain;
pub mod crypto_backend;
pub mod error;
pub mod pem;
pub mod time;
pub mod trust_domain;
pub mod x509;

#[cfg(test)]
pub(crate) mod test_utils;

pub use certificate::{BackCert, IncludeCn, SignedData};
pub use chain::CertChain;
pub use error::{Error, ErrorCode, Outcome, Result, Severity};
pub use time::Time;
pub use trust_domain::{find_issuer_among, CertId, IssuerChecker, SearchControl, TrustDomain};
pub use x509::{
    build_cert_chain, create_encoded_ocsp_request, verify_encoded_ocsp_response, BuildOptions,
    CertPolicyId, EndEntityOrCa, KeyPurposeId, KeyUsage, OcspResponseValidity, TrustLevel,
};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::certificate::{BackCert, SignedData};
    pub use crate::chain::CertChain;
    pub use crate::error::{Error, ErrorCode, Result};
    pub use crate::time::Time;
    pub use crate::trust_domain::{CertId, IssuerChecker, SearchControl, TrustDomain};
    pub use crate::x509::{
        build_cert_chain, create_encoded_ocsp_request, verify_encoded_ocsp_response,
        BuildOptions, CertPolicyId, EndEntityOrCa, KeyPurposeId, KeyUsage, OcspResponseValidity,
        TrustLevel,
    };
}
