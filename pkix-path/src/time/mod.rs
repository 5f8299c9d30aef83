// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Time handling for certificate validity and OCSP freshness.
//!
//! Certificates encode instants as UTCTime or GeneralizedTime (RFC 5280
//! Section 4.1.2.5). Both decode to a [`Time`], which is whole seconds since
//! the Unix epoch, so comparisons never depend on the encoding.
//!
//! # UTCTime Y2K Conversion
//!
//! UTCTime values are interpreted according to RFC 5280:
//! - Years 50-99 are interpreted as 1950-1999
//! - Years 00-49 are interpreted as 2000-2049
//!
//! A [`Time`] cannot precede 1970-01-01T00:00:00Z. UTCTime values in
//! 1950-1969 therefore do not decode and are rejected as `BadDer`, as is any
//! GeneralizedTime before 1970.

use core::fmt;
use core::time::Duration;

use der::asn1::{GeneralizedTime, UtcTime};
use der::{Decode, Reader, SliceReader, Tag};

use crate::certificate::{ensure_finished, tlv_contents};
use crate::error::{fail, ErrorCode, Result, Severity};

/// Seconds in one day.
pub const ONE_DAY: u64 = 24 * 60 * 60;

/// 9999-12-31T23:59:59Z, the last instant GeneralizedTime can express.
const MAX_UNIX_SECS: u64 = 253_402_300_799;

/// An instant, in whole seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(u64);

impl Time {
    /// Build a time from seconds since the Unix epoch.
    ///
    /// Instants past year 9999 are rejected since no certificate can name
    /// them.
    pub fn from_unix_secs(secs: u64) -> Result<Self> {
        if secs > MAX_UNIX_SECS {
            return Err(fail(Severity::Fatal, ErrorCode::InvalidArgs));
        }
        Ok(Time(secs))
    }

    /// Whole seconds since the Unix epoch.
    pub const fn unix_secs(&self) -> u64 {
        self.0
    }

    pub fn is_before(&self, other: &Time) -> bool {
        self.0 < other.0
    }

    pub fn is_after(&self, other: &Time) -> bool {
        self.0 > other.0
    }

    /// Read a UTCTime or GeneralizedTime TLV.
    pub(crate) fn read(reader: &mut SliceReader<'_>) -> Result<Self> {
        let duration = match reader.peek_tag()? {
            Tag::UtcTime => UtcTime::decode(reader)?.to_unix_duration(),
            Tag::GeneralizedTime => GeneralizedTime::decode(reader)?.to_unix_duration(),
            tag => {
                log::debug!("unexpected time tag {}", tag);
                return Err(fail(Severity::Recoverable, ErrorCode::BadDer));
            }
        };
        Ok(Time(duration.as_secs()))
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match der::DateTime::from_unix_duration(Duration::from_secs(self.0)) {
            Ok(dt) => write!(f, "{}", dt),
            Err(_) => write!(f, "@{}", self.0),
        }
    }
}

/// Certificate validity period.
///
/// ```asn1
/// Validity ::= SEQUENCE {
///     notBefore      Time,
///     notAfter       Time
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validity {
    pub not_before: Time,
    pub not_after: Time,
}

impl Validity {
    /// Parse a Validity TLV.
    pub fn parse(tlv: &[u8]) -> Result<Self> {
        let mut reader = SliceReader::new(tlv_contents(tlv, Tag::Sequence)?)?;
        let not_before = Time::read(&mut reader)?;
        let not_after = Time::read(&mut reader)?;
        ensure_finished(&reader)?;
        Ok(Validity {
            not_before,
            not_after,
        })
    }

    /// Both bounds are inclusive.
    pub fn check(&self, time: &Time) -> Result<()> {
        if time.is_before(&self.not_before) {
            return Err(fail(Severity::Recoverable, ErrorCode::CertNotYetValid));
        }
        if time.is_after(&self.not_after) {
            return Err(fail(Severity::Recoverable, ErrorCode::ExpiredCertificate));
        }
        Ok(())
    }
}

/// Current system time.
#[cfg(feature = "std")]
pub fn current_time() -> Result<Time> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|_| fail(Severity::Fatal, ErrorCode::LibraryFailure))?;
    Time::from_unix_secs(now.as_secs())
}
