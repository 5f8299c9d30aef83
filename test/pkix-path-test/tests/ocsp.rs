// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use pkix_path::crypto_backend::RingBackend;
use pkix_path::prelude::*;
use pkix_path::time::ONE_DAY;
use pkix_path::IncludeCn;
use pkix_path_test::common::ocsp::{self, OcspResponseBuilder, ResponderId, Status};
use pkix_path_test::common::pki::{self, TestCert, ThreeTier};
use pkix_path_test::common::{
    init_logger, verify_time, InMemoryTrustDomain, RevocationPolicy, OCSP_MAX_LIFETIME_DAYS,
};

fn trust_domain(pki: &ThreeTier) -> InMemoryTrustDomain {
    InMemoryTrustDomain::new()
        .with_anchor(&pki.root.der)
        .with_intermediate(&pki.intermediate.der)
}

fn with_ee_cert_id<R>(pki: &ThreeTier, f: impl FnOnce(&CertId<'_>) -> R) -> R {
    let ee = BackCert::new(&pki.ee.der, None, IncludeCn::No).unwrap();
    let issuer = BackCert::new(&pki.intermediate.der, None, IncludeCn::No).unwrap();
    f(&CertId::new(&ee, &issuer))
}

fn response(pki: &ThreeTier, signer: &TestCert, status: Status) -> Vec<u8> {
    let now = verify_time().unix_secs();
    with_ee_cert_id(pki, |cert_id| {
        OcspResponseBuilder::new(signer, now)
            .single(cert_id, status, now - 3600, Some(now + 7 * ONE_DAY))
            .build()
    })
}

fn verify(td: &InMemoryTrustDomain, pki: &ThreeTier, encoded: &[u8]) -> Result<OcspResponseValidity> {
    with_ee_cert_id(pki, |cert_id| {
        verify_encoded_ocsp_response(
            td,
            &RingBackend,
            cert_id,
            verify_time(),
            OCSP_MAX_LIFETIME_DAYS,
            encoded,
        )
    })
}

#[test]
fn test_stapled_good_response() {
    init_logger();
    let pki = ThreeTier::new();
    let td = trust_domain(&pki);
    let stapled = response(&pki, &pki.intermediate, Status::Good);

    let chain = build_cert_chain(
        &td,
        &pki.ee.der,
        verify_time(),
        &BuildOptions::new(),
        Some(&stapled),
    )
    .unwrap();
    assert_eq!(chain.len(), 3);
}

#[test]
fn test_stapled_revoked_response() {
    init_logger();
    let pki = ThreeTier::new();
    let td = trust_domain(&pki);
    let revoked_at = verify_time().unix_secs() - ONE_DAY;
    let stapled = response(&pki, &pki.intermediate, Status::Revoked(revoked_at));

    let err = build_cert_chain(
        &td,
        &pki.ee.der,
        verify_time(),
        &BuildOptions::new(),
        Some(&stapled),
    )
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::RevokedCertificate);
    assert!(!err.is_fatal());
}

#[test]
fn test_hard_fail_without_response() {
    init_logger();
    let pki = ThreeTier::new();
    let td = trust_domain(&pki).with_revocation_policy(RevocationPolicy::HardFail);
    let err = build_cert_chain(&td, &pki.ee.der, verify_time(), &BuildOptions::new(), None)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::OcspUnknownCert);
}

#[test]
fn test_validity_window() {
    init_logger();
    let pki = ThreeTier::new();
    let td = trust_domain(&pki);
    let now = verify_time().unix_secs();
    let validity = verify(&td, &pki, &response(&pki, &pki.intermediate, Status::Good)).unwrap();
    assert_eq!(validity.this_update.unix_secs(), now - 3600);
    assert_eq!(validity.valid_through.unix_secs(), now + 7 * ONE_DAY);
}

#[test]
fn test_unknown_status() {
    init_logger();
    let pki = ThreeTier::new();
    let td = trust_domain(&pki);
    let err = verify(&td, &pki, &response(&pki, &pki.intermediate, Status::Unknown)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OcspUnknownCert);
}

#[test]
fn test_old_response() {
    init_logger();
    let pki = ThreeTier::new();
    let td = trust_domain(&pki);
    let now = verify_time().unix_secs();
    let encoded = with_ee_cert_id(&pki, |cert_id| {
        OcspResponseBuilder::new(&pki.intermediate, now)
            .single(cert_id, Status::Good, now - 9 * ONE_DAY, Some(now - 2 * ONE_DAY))
            .build()
    });
    let err = verify(&td, &pki, &encoded).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OcspOldResponse);
}

#[test]
fn test_responder_by_key() {
    init_logger();
    let pki = ThreeTier::new();
    let td = trust_domain(&pki);
    let now = verify_time().unix_secs();
    let encoded = with_ee_cert_id(&pki, |cert_id| {
        OcspResponseBuilder::new(&pki.intermediate, now)
            .responder_id(ResponderId::ByKey)
            .single(cert_id, Status::Good, now, None)
            .build()
    });
    assert!(verify(&td, &pki, &encoded).is_ok());
}

#[test]
fn test_delegated_responder() {
    init_logger();
    let pki = ThreeTier::new();
    let td = trust_domain(&pki);
    let now = verify_time().unix_secs();
    let responder = pki::issued_by(pki::ocsp_responder_params("Test OCSP", 20), &pki.intermediate);

    let encoded = with_ee_cert_id(&pki, |cert_id| {
        OcspResponseBuilder::new(&responder, now)
            .with_cert(&responder.der)
            .single(cert_id, Status::Good, now, None)
            .build()
    });
    assert!(verify(&td, &pki, &encoded).is_ok());

    // not embedded: nothing to check the signer against
    let encoded = with_ee_cert_id(&pki, |cert_id| {
        OcspResponseBuilder::new(&responder, now)
            .single(cert_id, Status::Good, now, None)
            .build()
    });
    let err = verify(&td, &pki, &encoded).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OcspInvalidSigningCert);
}

#[test]
fn test_responder_without_ocsp_signing() {
    init_logger();
    let pki = ThreeTier::new();
    let td = trust_domain(&pki);
    let now = verify_time().unix_secs();
    // a sibling TLS certificate may not sign OCSP responses
    let sibling = pki::issued_by(
        pki::ee_params("sibling.example.com", 21, "sibling.example.com"),
        &pki.intermediate,
    );
    let encoded = with_ee_cert_id(&pki, |cert_id| {
        OcspResponseBuilder::new(&sibling, now)
            .with_cert(&sibling.der)
            .single(cert_id, Status::Good, now, None)
            .build()
    });
    let err = verify(&td, &pki, &encoded).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OcspInvalidSigningCert);
}

#[test]
fn test_response_from_root() {
    init_logger();
    let pki = ThreeTier::new();
    let td = trust_domain(&pki);
    let err = verify(&td, &pki, &response(&pki, &pki.root, Status::Good)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OcspInvalidSigningCert);
}

#[test]
fn test_tampered_response() {
    init_logger();
    let pki = ThreeTier::new();
    let td = trust_domain(&pki);
    let mut encoded = response(&pki, &pki.intermediate, Status::Good);
    // flip a bit of the last signature octet
    let last = encoded.len() - 1;
    encoded[last] ^= 0x01;
    let err = verify(&td, &pki, &encoded).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OcspBadSignature);
}

#[test]
fn test_error_status() {
    init_logger();
    let pki = ThreeTier::new();
    let td = trust_domain(&pki);
    let err = verify(&td, &pki, &ocsp::error_response(3)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OcspTryServerLater);
}

#[test]
fn test_request_hashes() {
    init_logger();
    let pki = ThreeTier::new();
    with_ee_cert_id(&pki, |cert_id| {
        let request = create_encoded_ocsp_request(&RingBackend, cert_id).unwrap();
        assert_eq!(request.len(), 67 + cert_id.serial_number.len());
        assert_eq!(request[23..43], ocsp::sha1(cert_id.issuer));
        assert_eq!(
            request[45..65],
            ocsp::key_hash(cert_id.issuer_subject_public_key_info)
        );
        assert_eq!(request[65], 0x02);
        assert_eq!(&request[67..], cert_id.serial_number);
    });
}
