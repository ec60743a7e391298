// Call outcome types shared by the engine ABI and the call sites

use std::borrow::Cow;
use std::ffi::CStr;
use std::fmt;

use bytes::Bytes;

/// Status codes carried in trailing status
/// (<https://grpc.github.io/grpc/core/md_doc_statuscodes.html>).
///
/// The numeric values are the engine's wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum StatusCode {
    #[default]
    Ok = 0,
    Cancelled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl StatusCode {
    /// Map a raw engine code onto a status code. Out-of-range values become `Unknown`.
    pub fn from_i32(v: i32) -> Self {
        match v {
            0 => Self::Ok,
            1 => Self::Cancelled,
            2 => Self::Unknown,
            3 => Self::InvalidArgument,
            4 => Self::DeadlineExceeded,
            5 => Self::NotFound,
            6 => Self::AlreadyExists,
            7 => Self::PermissionDenied,
            8 => Self::ResourceExhausted,
            9 => Self::FailedPrecondition,
            10 => Self::Aborted,
            11 => Self::OutOfRange,
            12 => Self::Unimplemented,
            13 => Self::Internal,
            14 => Self::Unavailable,
            15 => Self::DataLoss,
            16 => Self::Unauthenticated,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Self::FailedPrecondition => "FAILED_PRECONDITION",
            Self::Aborted => "ABORTED",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::Unimplemented => "UNIMPLEMENTED",
            Self::Internal => "INTERNAL",
            Self::Unavailable => "UNAVAILABLE",
            Self::DataLoss => "DATA_LOSS",
            Self::Unauthenticated => "UNAUTHENTICATED",
        };
        f.write_str(name)
    }
}

/// Final outcome of a call: a code plus details.
///
/// Details are kept as the exact bytes the engine reported; they are usually
/// but not necessarily UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    code: StatusCode,
    details: Bytes,
}

impl Status {
    pub fn new(code: StatusCode, details: impl Into<Bytes>) -> Self {
        Self {
            code,
            details: details.into(),
        }
    }

    /// `OK` with empty details.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Rebuild a status from the raw pieces an engine reports on the receive side.
    ///
    /// A missing details pointer yields empty details, never an absent value.
    pub fn from_raw(code: StatusCode, details: Option<&CStr>) -> Self {
        let details = details.map_or_else(Bytes::new, |d| Bytes::copy_from_slice(d.to_bytes()));
        Self { code, details }
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn details(&self) -> &[u8] {
        &self.details
    }

    /// Details as text, with invalid UTF-8 replaced.
    pub fn details_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.details)
    }

    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.details.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}: {}", self.code, self.details_str())
        }
    }
}
