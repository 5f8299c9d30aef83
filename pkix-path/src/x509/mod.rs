// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! X.509 path validation.
//!
//! Extension decoding and the per-certificate checks of RFC 5280, the path
//! search built on top of them, and OCSP (RFC 6960) helpers for trust
//! domains that check revocation.

pub mod build;
pub mod check;
pub mod extensions;
pub mod ocsp;
pub mod oids;
pub mod types;

pub use build::{build_cert_chain, BuildOptions, DEFAULT_MAX_SUB_CA_COUNT};
pub use check::{check_issuer_independent_properties, RequiredProperties};
pub use ocsp::{create_encoded_ocsp_request, verify_encoded_ocsp_response, OcspResponseValidity};
pub use types::{CertPolicyId, EndEntityOrCa, KeyPurposeId, KeyUsage, TrustLevel};
