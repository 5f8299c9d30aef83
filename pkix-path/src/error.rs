// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Error model for path building and verification.
//!
//! Every fallible operation returns [`Result`]. A failure is an [`Error`]
//! carrying two things:
//!
//! - a [`Severity`]: `Fatal` aborts the entire path search immediately,
//!   `Recoverable` only abandons the current candidate so the builder can
//!   backtrack and try the next one;
//! - an [`ErrorCode`]: the diagnostic explaining the failure.
//!
//! The diagnostic travels with the value. There is no process-wide or
//! thread-local "last error" slot, so independent verifications running on
//! different threads never observe each other's diagnostics.

use core::fmt;

/// Result type alias for path building operations
pub type Result<T> = core::result::Result<T, Error>;

/// How far a failure propagates through the path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Stop the whole search. Example: out of memory.
    Fatal,
    /// Abandon this candidate and keep searching. Example: expired certificate.
    Recoverable,
}

/// Ternary view of a [`Result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    FatalError,
    RecoverableError,
}

impl Outcome {
    /// Project any result onto the three outcomes.
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Outcome::Success,
            Err(e) => e.outcome(),
        }
    }
}

/// Diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    // ------------------------------------------------------------------
    // Library state
    // ------------------------------------------------------------------
    /// Internal invariant violated
    InvalidState,
    /// Failure inside the crypto or support library
    LibraryFailure,
    /// Allocation failure
    NoMemory,
    /// Caller supplied arguments the operation cannot work with
    InvalidArgs,
    /// Requested extension not present
    ExtensionNotFound,

    // ------------------------------------------------------------------
    // Encoding
    // ------------------------------------------------------------------
    /// Malformed DER
    BadDer,
    /// Input well-formed but not usable (e.g. oversized serial number)
    BadData,
    /// A recognized extension is empty, duplicated or malformed
    ExtensionValueInvalid,
    /// An extension marked critical is not understood
    UnknownCriticalExtension,
    /// Inner and outer signature algorithm identifiers differ
    SignatureAlgorithmMismatch,

    // ------------------------------------------------------------------
    // Signatures
    // ------------------------------------------------------------------
    /// Signature did not verify
    BadSignature,
    /// Signature or key algorithm not supported by the backend
    UnsupportedSignatureAlgorithm,
    /// Public key could not be parsed
    BadKey,

    // ------------------------------------------------------------------
    // Path building
    // ------------------------------------------------------------------
    /// No acceptable issuer was found
    UnknownIssuer,
    /// The trust domain actively distrusts the certificate
    UntrustedCert,
    /// Path exceeds the sub-CA depth limit
    ChainTooLong,
    /// Certificate is past its notAfter
    ExpiredCertificate,
    /// Certificate is before its notBefore
    CertNotYetValid,
    /// Certificate acting as a CA is not a CA
    CaCertInvalid,
    /// CA certificate presented as an end-entity
    CaCertUsedAsEndEntity,
    /// pathLenConstraint exceeded
    PathLenConstraintInvalid,
    /// keyUsage does not permit the required usage
    InadequateKeyUsage,
    /// extKeyUsage does not permit the required purpose
    InadequateCertType,
    /// Required policy not asserted
    PolicyValidationFailed,
    /// A name violates an issuer's name constraints
    CertNotInNameSpace,

    // ------------------------------------------------------------------
    // Revocation / OCSP
    // ------------------------------------------------------------------
    /// Certificate is revoked
    RevokedCertificate,
    /// OCSP responder reported malformedRequest
    OcspMalformedRequest,
    /// OCSP responder reported internalError
    OcspServerError,
    /// OCSP responder reported tryLater
    OcspTryServerLater,
    /// OCSP responder reported sigRequired
    OcspRequestNeedsSig,
    /// OCSP responder reported unauthorized
    OcspUnauthorizedRequest,
    /// OCSP responseStatus value not defined by RFC 6960
    OcspUnknownResponseStatus,
    /// OCSP response could not be parsed
    OcspMalformedResponse,
    /// OCSP response signature did not verify
    OcspBadSignature,
    /// No acceptable OCSP signer found
    OcspInvalidSigningCert,
    /// Delegated OCSP signer not issued by the certificate's issuer
    OcspResponderCertInvalid,
    /// OCSP response has no usable status for the certificate
    OcspUnknownCert,
    /// OCSP response is too old
    OcspOldResponse,
    /// OCSP response thisUpdate is in the future
    OcspFutureResponse,
}

impl ErrorCode {
    /// Severity assigned to a bare library status code.
    ///
    /// Only allocation failure, library failure and invalid internal state
    /// are fatal. Everything else, including codes that have not been
    /// classified explicitly, is recoverable.
    pub const fn default_severity(self) -> Severity {
        match self {
            ErrorCode::ExtensionNotFound => Severity::Recoverable,
            ErrorCode::InvalidState | ErrorCode::LibraryFailure | ErrorCode::NoMemory => {
                Severity::Fatal
            }
            _ => Severity::Recoverable,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ErrorCode::InvalidState => "invalid internal state",
            ErrorCode::LibraryFailure => "library failure",
            ErrorCode::NoMemory => "out of memory",
            ErrorCode::InvalidArgs => "invalid arguments",
            ErrorCode::ExtensionNotFound => "extension not found",
            ErrorCode::BadDer => "malformed DER",
            ErrorCode::BadData => "bad data",
            ErrorCode::ExtensionValueInvalid => "invalid extension value",
            ErrorCode::UnknownCriticalExtension => "unknown critical extension",
            ErrorCode::SignatureAlgorithmMismatch => "signature algorithm mismatch",
            ErrorCode::BadSignature => "bad signature",
            ErrorCode::UnsupportedSignatureAlgorithm => "unsupported signature algorithm",
            ErrorCode::BadKey => "bad public key",
            ErrorCode::UnknownIssuer => "unknown issuer",
            ErrorCode::UntrustedCert => "certificate is actively distrusted",
            ErrorCode::ChainTooLong => "certificate chain too long",
            ErrorCode::ExpiredCertificate => "certificate has expired",
            ErrorCode::CertNotYetValid => "certificate is not yet valid",
            ErrorCode::CaCertInvalid => "issuer certificate is not a CA",
            ErrorCode::CaCertUsedAsEndEntity => "CA certificate used as end-entity",
            ErrorCode::PathLenConstraintInvalid => "path length constraint exceeded",
            ErrorCode::InadequateKeyUsage => "inadequate key usage",
            ErrorCode::InadequateCertType => "inadequate extended key usage",
            ErrorCode::PolicyValidationFailed => "policy validation failed",
            ErrorCode::CertNotInNameSpace => "name not permitted by name constraints",
            ErrorCode::RevokedCertificate => "certificate has been revoked",
            ErrorCode::OcspMalformedRequest => "OCSP responder: malformed request",
            ErrorCode::OcspServerError => "OCSP responder: internal error",
            ErrorCode::OcspTryServerLater => "OCSP responder: try later",
            ErrorCode::OcspRequestNeedsSig => "OCSP responder: signature required",
            ErrorCode::OcspUnauthorizedRequest => "OCSP responder: unauthorized",
            ErrorCode::OcspUnknownResponseStatus => "OCSP responder: unknown response status",
            ErrorCode::OcspMalformedResponse => "malformed OCSP response",
            ErrorCode::OcspBadSignature => "bad OCSP response signature",
            ErrorCode::OcspInvalidSigningCert => "no valid OCSP signing certificate",
            ErrorCode::OcspResponderCertInvalid => "OCSP responder certificate invalid",
            ErrorCode::OcspUnknownCert => "OCSP responder does not know the certificate",
            ErrorCode::OcspOldResponse => "OCSP response is too old",
            ErrorCode::OcspFutureResponse => "OCSP response is from the future",
        };
        f.write_str(msg)
    }
}

/// A classified failure: severity plus diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Error {
    severity: Severity,
    code: ErrorCode,
}

impl Error {
    /// Create an error with an explicit severity.
    pub const fn new(severity: Severity, code: ErrorCode) -> Self {
        Self { severity, code }
    }

    /// Recoverable error with the given diagnostic
    pub const fn recoverable(code: ErrorCode) -> Self {
        Self::new(Severity::Recoverable, code)
    }

    /// Fatal error with the given diagnostic
    pub const fn fatal(code: ErrorCode) -> Self {
        Self::new(Severity::Fatal, code)
    }

    pub const fn severity(&self) -> Severity {
        self.severity
    }

    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    pub const fn is_fatal(&self) -> bool {
        matches!(self.severity, Severity::Fatal)
    }

    pub const fn outcome(&self) -> Outcome {
        match self.severity {
            Severity::Fatal => Outcome::FatalError,
            Severity::Recoverable => Outcome::RecoverableError,
        }
    }

    /// Same severity, different diagnostic.
    pub(crate) const fn with_code(self, code: ErrorCode) -> Self {
        Self::new(self.severity, code)
    }
}

/// Record a failure.
///
/// All failures produced inside the crate go through here, which makes this
/// the one place to break on (or enable `debug` logging for) when chasing a
/// verification failure.
pub fn fail(severity: Severity, code: ErrorCode) -> Error {
    log::debug!("pkix failure: {:?} {:?} ({})", severity, code, code);
    Error::new(severity, code)
}

/// Translate a bare library status into the ternary model.
///
/// | status | result |
/// |---|---|
/// | `Ok(())` | Success |
/// | `ExtensionNotFound` | Recoverable |
/// | `InvalidState`, `LibraryFailure`, `NoMemory` | Fatal |
/// | anything else | Recoverable |
pub fn map_status(status: core::result::Result<(), ErrorCode>) -> Result<()> {
    match status {
        Ok(()) => Ok(()),
        Err(code) => Err(fail(code.default_severity(), code)),
    }
}

// ============================================================================
// Error Display Implementation (works in both std and no_std)
// ============================================================================

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "fatal"),
            Severity::Recoverable => write!(f, "recoverable"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.severity, self.code)
    }
}

// ============================================================================
// std::error::Error implementation (when std feature is enabled)
// ============================================================================

#[cfg(feature = "std")]
impl std::error::Error for Error {}

// ============================================================================
// Conversions
// ============================================================================

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        fail(code.default_severity(), code)
    }
}

/// Convert from der crate errors
impl From<der::Error> for Error {
    fn from(err: der::Error) -> Self {
        log::trace!("der: {}", err);
        fail(Severity::Recoverable, ErrorCode::BadDer)
    }
}

/// Convert from PEM decoding errors
impl From<pem_rfc7468::Error> for Error {
    fn from(err: pem_rfc7468::Error) -> Self {
        log::trace!("pem: {}", err);
        fail(Severity::Recoverable, ErrorCode::BadDer)
    }
}

/// Convert from ring's Unspecified error
#[cfg(feature = "ring-backend")]
impl From<ring::error::Unspecified> for Error {
    fn from(_: ring::error::Unspecified) -> Self {
        fail(Severity::Recoverable, ErrorCode::BadSignature)
    }
}

// ============================================================================
// Tests
// ============================================================================
