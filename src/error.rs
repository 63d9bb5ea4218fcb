//! Error types for zlibwapi-test
//!
//! Every failure a check can observe is described here. The runner only keeps a
//! pass/fail bit per check; these values exist so the failure can be logged.

use thiserror::Error;

/// Return codes of the zlib entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZStatus {
    Ok,
    StreamEnd,
    NeedDict,
    Errno,
    StreamError,
    DataError,
    MemError,
    BufError,
    VersionError,
    Unknown(i32),
}

impl ZStatus {
    pub fn from_c_code(code: i32) -> Self {
        match code {
            0 => ZStatus::Ok,
            1 => ZStatus::StreamEnd,
            2 => ZStatus::NeedDict,
            -1 => ZStatus::Errno,
            -2 => ZStatus::StreamError,
            -3 => ZStatus::DataError,
            -4 => ZStatus::MemError,
            -5 => ZStatus::BufError,
            -6 => ZStatus::VersionError,
            other => ZStatus::Unknown(other),
        }
    }

    pub fn to_c_code(self) -> i32 {
        match self {
            ZStatus::Ok => 0,
            ZStatus::StreamEnd => 1,
            ZStatus::NeedDict => 2,
            ZStatus::Errno => -1,
            ZStatus::StreamError => -2,
            ZStatus::DataError => -3,
            ZStatus::MemError => -4,
            ZStatus::BufError => -5,
            ZStatus::VersionError => -6,
            ZStatus::Unknown(code) => code,
        }
    }

    pub fn is_ok(self) -> bool {
        self == ZStatus::Ok
    }
}

/// Main error type for zlibwapi-test
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The shared library could not be located or opened
    #[error("cannot load library '{library}': {source}")]
    LibraryNotFound {
        library: String,
        #[source]
        source: libloading::Error,
    },

    /// Linked configuration, but the module is not mapped into the process
    #[error("library '{library}' is not resident in the process")]
    ModuleNotResident { library: String },

    /// Export lookup failed
    #[error("symbol '{symbol}' not found: {source}")]
    SymbolNotFound {
        symbol: String,
        #[source]
        source: libloading::Error,
    },

    /// Export lookup returned a null address
    #[error("symbol '{symbol}' resolved to a null address")]
    NullSymbol { symbol: String },

    /// Export lookup failed against the link-time export table
    #[error("symbol '{symbol}' is not bound at link time")]
    UnlinkedSymbol { symbol: String },

    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u64, actual: u64 },

    /// An entry point returned something other than Z_OK
    #[error("{entry} returned {status:?}")]
    Status { entry: &'static str, status: ZStatus },

    #[error("compressed size {compressed} is not smaller than input size {original}")]
    NotSmaller { compressed: u64, original: u64 },

    #[error("round trip mismatch: {reason}")]
    RoundTrip { reason: String },

    #[error("output bound {bound} does not exceed input size {input}")]
    BoundTooSmall { bound: u64, input: u64 },
}

impl HarnessError {
    /// Create a round trip error
    pub fn round_trip(reason: impl Into<String>) -> Self {
        HarnessError::RoundTrip {
            reason: reason.into(),
        }
    }

    /// Map a zlib return code to `Ok(())` or a status error
    pub fn check_status(entry: &'static str, code: i32) -> Result<()> {
        let status = ZStatus::from_c_code(code);
        if status.is_ok() {
            Ok(())
        } else {
            Err(HarnessError::Status { entry, status })
        }
    }

    /// True for failures to locate the library or one of its exports
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            HarnessError::LibraryNotFound { .. }
                | HarnessError::ModuleNotResident { .. }
                | HarnessError::SymbolNotFound { .. }
                | HarnessError::NullSymbol { .. }
                | HarnessError::UnlinkedSymbol { .. }
        )
    }
}

/// Result type for zlibwapi-test operations
pub type Result<T> = std::result::Result<T, HarnessError>;
