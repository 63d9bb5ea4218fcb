//! zlibwapi-test - conformance harness for a dynamically loaded zlib
//!
//! Loads the zlib shared library, resolves its exported entry points by name
//! and checks them against known-good results.
//!
//! ## Checks
//!
//! - streaming Adler-32 through `adler32` and `adler32_z`
//! - `adler32_combine` over independently computed pieces
//! - `compress` / `compress2` followed by `uncompress`
//! - `compressBound`
//!
//! ## Example
//!
//! ```no_run
//! use zlibwapi_test::{HarnessConfig, Outcome};
//!
//! let outcome = zlibwapi_test::run(&HarnessConfig::from_build());
//! assert_eq!(outcome, Outcome::Success);
//! ```

pub mod checks;
pub mod error;
pub mod exports;
#[cfg(any(feature = "lib-mt", feature = "lib-md", feature = "dll-static"))]
mod linked;
pub mod library;
pub mod logging;
pub mod naming;
pub mod platform;
pub mod runner;
pub mod vectors;

pub use error::{HarnessError, Result, ZStatus};
pub use exports::{CompressionLevel, Export};
pub use library::{Entry, ReleasePolicy, SymbolSource, ZlibLibrary};
pub use naming::NamingScheme;
pub use platform::{AddressWidth, CallingConvention, HarnessConfig, Linkage, Optimization};
pub use runner::{RunPolicy, Suite, SuiteReport};

/// Process-level result of a harness run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The library could not be acquired; no check ran
    LibraryUnavailable,
    TestsFailed,
}

impl Outcome {
    /// Line printed for this outcome
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Success => "Success.",
            Outcome::LibraryUnavailable => "Could not load zlib.",
            Outcome::TestsFailed => "Tests failed.",
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

/// Acquire the library, run the standard suite and release the library
pub fn run(config: &HarnessConfig) -> Outcome {
    run_with(config, RunPolicy::default())
}

pub fn run_with(config: &HarnessConfig, policy: RunPolicy) -> Outcome {
    let library = match ZlibLibrary::acquire(config) {
        Ok(library) => library,
        Err(err) => {
            tracing::error!(error = %err, "library unavailable");
            return Outcome::LibraryUnavailable;
        }
    };

    let report = Suite::standard().policy(policy).run(&library);
    if report.passed() {
        Outcome::Success
    } else {
        Outcome::TestsFailed
    }
}
