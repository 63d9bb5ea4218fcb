//! zlibwapitest - zlib conformance harness
//!
//! Takes no arguments. Set `ZLIBWAPITEST_LIBRARY` to test a specific library
//! file and `RUST_LOG` for diagnostics.

use std::process::ExitCode;
use zlibwapi_test::HarnessConfig;

fn main() -> ExitCode {
    zlibwapi_test::logging::init();

    let outcome = zlibwapi_test::run(&HarnessConfig::from_build());
    println!("{}", outcome.message());

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
