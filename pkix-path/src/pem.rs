// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! PEM input for trust domains that load certificates from text.
//!
//! The path builder itself only ever sees DER.

use alloc::vec;
use alloc::vec::Vec;

use pem_rfc7468::Decoder;

use crate::error::{fail, ErrorCode, Result, Severity};

const CERTIFICATE_LABEL: &str = "CERTIFICATE";
const PRE_ENCAPSULATION_BOUNDARY: &str = "-----BEGIN ";
const POST_ENCAPSULATION_BOUNDARY: &str = "-----END ";
const BOUNDARY_END: &str = "-----";

/// Decode one PEM `CERTIFICATE` block into DER.
pub fn decode_certificate(pem: &str) -> Result<Vec<u8>> {
    let mut decoder = Decoder::new(pem.trim().as_bytes())?;
    if decoder.type_label() != CERTIFICATE_LABEL {
        log::debug!("unexpected PEM label {:?}", decoder.type_label());
        return Err(fail(Severity::Recoverable, ErrorCode::BadDer));
    }

    let mut der = vec![0u8; decoder.remaining_len()];
    let len = decoder.decode(&mut der)?.len();
    der.truncate(len);
    Ok(der)
}

/// Decode every PEM block in `bundle`, in order.
///
/// Text outside the blocks is ignored, so CA bundles with comments load as
/// is. Any block that is not a certificate fails the whole bundle.
pub fn decode_certificates(bundle: &str) -> Result<Vec<Vec<u8>>> {
    let mut certificates = Vec::new();
    let mut rest = bundle;
    while let Some(start) = rest.find(PRE_ENCAPSULATION_BOUNDARY) {
        let block = &rest[start..];
        let end = block
            .find(POST_ENCAPSULATION_BOUNDARY)
            .and_then(|post| {
                let after = post + POST_ENCAPSULATION_BOUNDARY.len();
                block[after..]
                    .find(BOUNDARY_END)
                    .map(|e| after + e + BOUNDARY_END.len())
            })
            .ok_or_else(|| {
                log::debug!("unterminated PEM block");
                fail(Severity::Recoverable, ErrorCode::BadDer)
            })?;
        certificates.push(decode_certificate(&block[..end])?);
        rest = &block[end..];
    }
    Ok(certificates)
}
