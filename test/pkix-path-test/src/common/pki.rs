// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Test PKI generated with rcgen, all ECDSA P-256.

use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType,
    ExtendedKeyUsagePurpose, IsCa, KeyUsagePurpose, SerialNumber, PKCS_ECDSA_P256_SHA256,
};

/// A generated certificate with its key.
pub struct TestCert {
    pub cert: Certificate,
    pub der: Vec<u8>,
}

impl TestCert {
    pub fn pem(&self) -> String {
        pem_encode(&self.der)
    }

    /// PKCS#8 encoding of the private key, for signing outside rcgen.
    pub fn pkcs8(&self) -> Vec<u8> {
        self.cert.get_key_pair().serialize_der()
    }
}

pub fn pem_encode(der: &[u8]) -> String {
    pem_rfc7468::encode_string("CERTIFICATE", pem_rfc7468::LineEnding::LF, der).unwrap()
}

fn base_params(common_name: &str, serial: u8) -> CertificateParams {
    let mut params = CertificateParams::new(Vec::<String>::new());
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, common_name);
    params.distinguished_name = dn;
    params.alg = &PKCS_ECDSA_P256_SHA256;
    params.serial_number = Some(SerialNumber::from_slice(&[serial]));
    params.not_before = rcgen::date_time_ymd(2025, 1, 1);
    params.not_after = rcgen::date_time_ymd(2030, 1, 1);
    params
}

/// CA parameters: keyCertSign, optional pathLenConstraint.
pub fn ca_params(common_name: &str, serial: u8, path_len: Option<u8>) -> CertificateParams {
    let mut params = base_params(common_name, serial);
    params.is_ca = IsCa::Ca(match path_len {
        Some(n) => BasicConstraints::Constrained(n),
        None => BasicConstraints::Unconstrained,
    });
    params.key_usages = vec![
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::CrlSign,
    ];
    params
}

/// TLS server end-entity parameters for `dns_name`.
pub fn ee_params(common_name: &str, serial: u8, dns_name: &str) -> CertificateParams {
    let mut params = base_params(common_name, serial);
    params.subject_alt_names = vec![rcgen::SanType::DnsName(dns_name.to_string())];
    params.is_ca = IsCa::ExplicitNoCa;
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
    params
}

/// Delegated OCSP responder parameters.
pub fn ocsp_responder_params(common_name: &str, serial: u8) -> CertificateParams {
    let mut params = base_params(common_name, serial);
    params.is_ca = IsCa::ExplicitNoCa;
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::OcspSigning];
    params
}

pub fn self_signed(params: CertificateParams) -> TestCert {
    let cert = Certificate::from_params(params).unwrap();
    let der = cert.serialize_der().unwrap();
    TestCert { cert, der }
}

pub fn issued_by(params: CertificateParams, issuer: &TestCert) -> TestCert {
    let cert = Certificate::from_params(params).unwrap();
    let der = cert.serialize_der_with_signer(&issuer.cert).unwrap();
    TestCert { cert, der }
}

/// Root, intermediate and end-entity for `www.example.com`.
pub struct ThreeTier {
    pub root: TestCert,
    pub intermediate: TestCert,
    pub ee: TestCert,
}

impl ThreeTier {
    pub fn new() -> Self {
        let root = self_signed(ca_params("Test Root", 1, None));
        let intermediate = issued_by(ca_params("Test Intermediate", 2, None), &root);
        let ee = issued_by(ee_params("www.example.com", 3, "www.example.com"), &intermediate);
        Self {
            root,
            intermediate,
            ee,
        }
    }
}

impl Default for ThreeTier {
    fn default() -> Self {
        Self::new()
    }
}
