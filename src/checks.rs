//! The conformance checks
//!
//! Every check resolves the entry points it needs from a [`SymbolSource`],
//! calls them with the fixed vectors from [`crate::vectors`] and compares the
//! outcome against the known-good value. A resolution failure is returned as
//! an error before anything is called.

use crate::error::{HarnessError, Result};
use crate::exports::{
    CompressionLevel, ADLER32, ADLER32_COMBINE, ADLER32_Z, COMPRESS, COMPRESS2, COMPRESS_BOUND,
    UNCOMPRESS,
};
use crate::library::SymbolSource;
use crate::vectors::{BOUND_INPUT_LEN, GREETING, GREETING_ADLER32, REPETITIVE, SCRATCH_LEN};
use libc::{c_long, c_uint, c_ulong, size_t};
use std::ptr;

/// Streaming Adler-32 over the three greeting pieces
pub fn adler32_streaming<L: SymbolSource>(library: &L) -> Result<()> {
    let adler32 = library.resolve(&ADLER32)?;

    let mut checksum = unsafe { (*adler32)(0, ptr::null(), 0) };
    for chunk in GREETING {
        checksum = unsafe { (*adler32)(checksum, chunk.as_ptr(), chunk.len() as c_uint) };
    }
    expect_checksum(checksum)
}

/// Same as [`adler32_streaming`] through the `size_t` length entry point
pub fn adler32_z_streaming<L: SymbolSource>(library: &L) -> Result<()> {
    let adler32_z = library.resolve(&ADLER32_Z)?;

    let mut checksum = unsafe { (*adler32_z)(0, ptr::null(), 0) };
    for chunk in GREETING {
        checksum = unsafe { (*adler32_z)(checksum, chunk.as_ptr(), chunk.len() as size_t) };
    }
    expect_checksum(checksum)
}

/// Checksums of the pieces, combined, equal the checksum of the whole
pub fn adler32_combine<L: SymbolSource>(library: &L) -> Result<()> {
    let adler32 = library.resolve(&ADLER32)?;
    let combine = library.resolve(&ADLER32_COMBINE)?;

    let seed = unsafe { (*adler32)(0, ptr::null(), 0) };
    let [first, rest @ ..] = GREETING;
    let mut combined = unsafe { (*adler32)(seed, first.as_ptr(), first.len() as c_uint) };
    for chunk in rest {
        let partial = unsafe { (*adler32)(seed, chunk.as_ptr(), chunk.len() as c_uint) };
        combined = unsafe { (*combine)(combined, partial, chunk.len() as c_long) };
    }
    expect_checksum(combined)
}

/// `compress` shrinks the repetitive input and `uncompress` restores it
pub fn compress_round_trip<L: SymbolSource>(library: &L) -> Result<()> {
    let compress = library.resolve(&COMPRESS)?;

    let mut compressed = [0u8; SCRATCH_LEN];
    let mut compressed_len = SCRATCH_LEN as c_ulong;
    let code = unsafe {
        (*compress)(
            compressed.as_mut_ptr(),
            &mut compressed_len,
            REPETITIVE.as_ptr(),
            REPETITIVE.len() as c_ulong,
        )
    };
    HarnessError::check_status("compress", code)?;
    let compressed = shrunk(&compressed, compressed_len)?;

    expect_round_trip(library, compressed)
}

/// `compress2` at the best level shrinks the input and round-trips
pub fn compress2_round_trip<L: SymbolSource>(library: &L) -> Result<()> {
    let compress2 = library.resolve(&COMPRESS2)?;

    let mut compressed = [0u8; SCRATCH_LEN];
    let mut compressed_len = SCRATCH_LEN as c_ulong;
    let code = unsafe {
        (*compress2)(
            compressed.as_mut_ptr(),
            &mut compressed_len,
            REPETITIVE.as_ptr(),
            REPETITIVE.len() as c_ulong,
            CompressionLevel::BEST.as_c_int(),
        )
    };
    HarnessError::check_status("compress2", code)?;
    let compressed = shrunk(&compressed, compressed_len)?;

    expect_round_trip(library, compressed)
}

/// The worst-case bound exceeds the input size
pub fn compress_bound<L: SymbolSource>(library: &L) -> Result<()> {
    let compress_bound = library.resolve(&COMPRESS_BOUND)?;

    let bound = unsafe { (*compress_bound)(BOUND_INPUT_LEN as c_ulong) };
    if u64::from(bound) <= BOUND_INPUT_LEN as u64 {
        return Err(HarnessError::BoundTooSmall {
            bound: bound.into(),
            input: BOUND_INPUT_LEN as u64,
        });
    }
    Ok(())
}

fn expect_checksum(actual: c_ulong) -> Result<()> {
    if actual != c_ulong::from(GREETING_ADLER32) {
        return Err(HarnessError::ChecksumMismatch {
            expected: GREETING_ADLER32.into(),
            actual: actual.into(),
        });
    }
    Ok(())
}

/// The compressed prefix of `buffer`, provided it is smaller than the input
fn shrunk(buffer: &[u8], len: c_ulong) -> Result<&[u8]> {
    let original = REPETITIVE.len() as u64;
    let compressed = u64::from(len);
    if compressed >= original {
        return Err(HarnessError::NotSmaller {
            compressed,
            original,
        });
    }
    Ok(&buffer[..compressed as usize])
}

fn expect_round_trip<L: SymbolSource>(library: &L, compressed: &[u8]) -> Result<()> {
    let uncompress = library.resolve(&UNCOMPRESS)?;

    let mut restored = [0u8; SCRATCH_LEN];
    let mut restored_len = SCRATCH_LEN as c_ulong;
    let code = unsafe {
        (*uncompress)(
            restored.as_mut_ptr(),
            &mut restored_len,
            compressed.as_ptr(),
            compressed.len() as c_ulong,
        )
    };
    HarnessError::check_status("uncompress", code)?;

    let restored_len = u64::from(restored_len);
    if restored_len != REPETITIVE.len() as u64 {
        return Err(HarnessError::round_trip(format!(
            "restored {} bytes, expected {}",
            restored_len,
            REPETITIVE.len()
        )));
    }
    if &restored[..REPETITIVE.len()] != REPETITIVE {
        return Err(HarnessError::round_trip("restored bytes differ from input"));
    }
    Ok(())
}
