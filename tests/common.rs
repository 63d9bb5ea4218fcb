// Shared test helpers: an in-process fake of the zlib exports and a loader
// for the system zlib.

#![allow(dead_code)]

use std::collections::HashMap;
use std::ffi::c_void;
use std::ptr::{self, NonNull};

use libc::{c_int, c_long, c_uint, c_ulong, size_t};
use zlibwapi_test::exports::{
    Adler32CombineFn, Adler32Fn, Adler32ZFn, Compress2Fn, CompressBoundFn, CompressFn,
    UncompressFn, ADLER32, ADLER32_COMBINE, ADLER32_Z, COMPRESS, COMPRESS2, COMPRESS_BOUND,
    UNCOMPRESS,
};
use zlibwapi_test::{
    AddressWidth, Export, HarnessConfig, HarnessError, NamingScheme, Result, ZStatus,
};
use zlibwapi_test::{SymbolSource, ZlibLibrary};

const ADLER_MOD: u64 = 65521;

/// Reference Adler-32, processed in blocks so the sums never overflow
pub fn reference_adler32(adler: u32, data: &[u8]) -> u32 {
    let mut s1 = adler & 0xFFFF;
    let mut s2 = (adler >> 16) & 0xFFFF;

    for block in data.chunks(5552) {
        for byte in block {
            s1 += *byte as u32;
            s2 += s1;
        }
        s1 %= ADLER_MOD as u32;
        s2 %= ADLER_MOD as u32;
    }

    (s2 << 16) | s1
}

/// Adler-32 of the concatenation, from the checksums of the two halves
pub fn reference_adler32_combine(adler1: u64, adler2: u64, len2: u64) -> u64 {
    let rem = len2 % ADLER_MOD;
    let mut sum1 = adler1 & 0xFFFF;
    let mut sum2 = (rem * sum1) % ADLER_MOD;
    sum1 += (adler2 & 0xFFFF) + ADLER_MOD - 1;
    sum2 += ((adler1 >> 16) & 0xFFFF) + ((adler2 >> 16) & 0xFFFF) + ADLER_MOD - rem;
    if sum1 >= ADLER_MOD {
        sum1 -= ADLER_MOD;
    }
    if sum1 >= ADLER_MOD {
        sum1 -= ADLER_MOD;
    }
    if sum2 >= ADLER_MOD << 1 {
        sum2 -= ADLER_MOD << 1;
    }
    if sum2 >= ADLER_MOD {
        sum2 -= ADLER_MOD;
    }
    sum1 | (sum2 << 16)
}

unsafe fn bytes<'a>(buf: *const u8, len: usize) -> Option<&'a [u8]> {
    if buf.is_null() {
        None
    } else {
        Some(std::slice::from_raw_parts(buf, len))
    }
}

pub unsafe extern "system" fn fake_adler32(adler: c_ulong, buf: *const u8, len: c_uint) -> c_ulong {
    match bytes(buf, len as usize) {
        Some(data) => reference_adler32(adler as u32, data).into(),
        None => 1,
    }
}

pub unsafe extern "system" fn fake_adler32_z(adler: c_ulong, buf: *const u8, len: size_t) -> c_ulong {
    match bytes(buf, len) {
        Some(data) => reference_adler32(adler as u32, data).into(),
        None => 1,
    }
}

pub unsafe extern "system" fn fake_adler32_combine(
    adler1: c_ulong,
    adler2: c_ulong,
    len2: c_long,
) -> c_ulong {
    reference_adler32_combine(adler1.into(), adler2.into(), len2 as u64) as c_ulong
}

pub unsafe extern "system" fn fake_compress_bound(source_len: c_ulong) -> c_ulong {
    source_len + (source_len >> 12) + (source_len >> 14) + (source_len >> 25) + 13
}

/// Runs of equal bytes as `(count, byte)` pairs
pub fn run_length_encode(data: &[u8]) -> Vec<u8> {
    let mut encoded: Vec<u8> = Vec::new();
    for &byte in data {
        let len = encoded.len();
        if len >= 2 && encoded[len - 1] == byte && encoded[len - 2] < u8::MAX {
            encoded[len - 2] += 1;
        } else {
            encoded.extend_from_slice(&[1, byte]);
        }
    }
    encoded
}

/// `None` for an odd length or a zero count
pub fn run_length_decode(encoded: &[u8]) -> Option<Vec<u8>> {
    if encoded.len() % 2 != 0 {
        return None;
    }
    let mut decoded = Vec::new();
    for pair in encoded.chunks_exact(2) {
        let (count, byte) = (pair[0], pair[1]);
        if count == 0 {
            return None;
        }
        decoded.extend(std::iter::repeat(byte).take(count as usize));
    }
    Some(decoded)
}

unsafe fn write_output(dest: *mut u8, dest_len: *mut c_ulong, data: &[u8]) -> c_int {
    if dest.is_null() || dest_len.is_null() {
        return ZStatus::StreamError.to_c_code();
    }
    if data.len() as u64 > u64::from(*dest_len) {
        return ZStatus::BufError.to_c_code();
    }
    ptr::copy_nonoverlapping(data.as_ptr(), dest, data.len());
    *dest_len = data.len() as c_ulong;
    ZStatus::Ok.to_c_code()
}

pub unsafe extern "system" fn fake_compress(
    dest: *mut u8,
    dest_len: *mut c_ulong,
    source: *const u8,
    source_len: c_ulong,
) -> c_int {
    match bytes(source, source_len as usize) {
        Some(data) => write_output(dest, dest_len, &run_length_encode(data)),
        None => ZStatus::StreamError.to_c_code(),
    }
}

pub unsafe extern "system" fn fake_compress2(
    dest: *mut u8,
    dest_len: *mut c_ulong,
    source: *const u8,
    source_len: c_ulong,
    level: c_int,
) -> c_int {
    if !(-1..=9).contains(&level) {
        return ZStatus::StreamError.to_c_code();
    }
    fake_compress(dest, dest_len, source, source_len)
}

pub unsafe extern "system" fn fake_uncompress(
    dest: *mut u8,
    dest_len: *mut c_ulong,
    source: *const u8,
    source_len: c_ulong,
) -> c_int {
    match bytes(source, source_len as usize).and_then(run_length_decode) {
        Some(data) => write_output(dest, dest_len, &data),
        None => ZStatus::DataError.to_c_code(),
    }
}

/// Always off by one
pub unsafe extern "system" fn broken_adler32(adler: c_ulong, buf: *const u8, len: c_uint) -> c_ulong {
    fake_adler32(adler, buf, len) + 1
}

/// Claims no overhead at all
pub unsafe extern "system" fn broken_compress_bound(source_len: c_ulong) -> c_ulong {
    source_len
}

/// Reports a full output buffer
pub unsafe extern "system" fn failing_compress(
    _dest: *mut u8,
    _dest_len: *mut c_ulong,
    _source: *const u8,
    _source_len: c_ulong,
) -> c_int {
    ZStatus::BufError.to_c_code()
}

/// Stores the input verbatim, so nothing shrinks
pub unsafe extern "system" fn stored_compress(
    dest: *mut u8,
    dest_len: *mut c_ulong,
    source: *const u8,
    source_len: c_ulong,
) -> c_int {
    match bytes(source, source_len as usize) {
        Some(data) => write_output(dest, dest_len, data),
        None => ZStatus::StreamError.to_c_code(),
    }
}

/// Rejects every stream
pub unsafe extern "system" fn failing_uncompress(
    _dest: *mut u8,
    _dest_len: *mut c_ulong,
    _source: *const u8,
    _source_len: c_ulong,
) -> c_int {
    ZStatus::DataError.to_c_code()
}

/// Drops the last restored byte
pub unsafe extern "system" fn truncating_uncompress(
    dest: *mut u8,
    dest_len: *mut c_ulong,
    source: *const u8,
    source_len: c_ulong,
) -> c_int {
    let code = fake_uncompress(dest, dest_len, source, source_len);
    if code == ZStatus::Ok.to_c_code() && *dest_len > 0 {
        *dest_len -= 1;
    }
    code
}

/// Flips the first restored byte
pub unsafe extern "system" fn corrupting_uncompress(
    dest: *mut u8,
    dest_len: *mut c_ulong,
    source: *const u8,
    source_len: c_ulong,
) -> c_int {
    let code = fake_uncompress(dest, dest_len, source, source_len);
    if code == ZStatus::Ok.to_c_code() && *dest_len > 0 {
        *dest ^= 0xFF;
    }
    code
}

/// In-process stand-in for the zlib library
///
/// [`FakeZlib::new`] provides the checksum and bound exports only;
/// [`FakeZlib::full`] adds run-length coded compression entry points.
pub struct FakeZlib {
    naming: NamingScheme,
    exports: HashMap<String, usize>,
}

impl FakeZlib {
    /// Exports registered under their plain names
    pub fn new() -> Self {
        FakeZlib::with_naming(NamingScheme::Identity)
    }

    /// All seven exports under their plain names
    pub fn full() -> Self {
        let mut fake = FakeZlib::new();
        fake.register(&COMPRESS, fake_compress as CompressFn as usize);
        fake.register(&COMPRESS2, fake_compress2 as Compress2Fn as usize);
        fake.register(&UNCOMPRESS, fake_uncompress as UncompressFn as usize);
        fake
    }

    /// Exports registered under the names `naming` produces
    pub fn with_naming(naming: NamingScheme) -> Self {
        let mut fake = FakeZlib {
            naming,
            exports: HashMap::new(),
        };
        fake.register(&ADLER32, fake_adler32 as Adler32Fn as usize);
        fake.register(&ADLER32_Z, fake_adler32_z as Adler32ZFn as usize);
        fake.register(&ADLER32_COMBINE, fake_adler32_combine as Adler32CombineFn as usize);
        fake.register(&COMPRESS_BOUND, fake_compress_bound as CompressBoundFn as usize);
        fake
    }

    /// Exports registered under the 32-bit stdcall decorated names
    pub fn decorated() -> Self {
        FakeZlib::with_naming(NamingScheme::Decorated(AddressWidth::Narrow))
    }

    pub fn register<F>(&mut self, export: &Export<F>, address: usize) -> &mut Self {
        let name = self.naming.symbol_name(export).into_owned();
        self.exports.insert(name, address);
        self
    }

    pub fn remove<F>(&mut self, export: &Export<F>) -> &mut Self {
        let name = self.naming.symbol_name(export).into_owned();
        self.exports.remove(&name);
        self
    }

    /// Look names up with a different scheme than the one used to register them
    pub fn looked_up_as(mut self, naming: NamingScheme) -> Self {
        self.naming = naming;
        self
    }
}

impl SymbolSource for FakeZlib {
    fn naming(&self) -> NamingScheme {
        self.naming
    }

    fn address(&self, symbol: &str) -> Result<NonNull<c_void>> {
        self.exports
            .get(symbol)
            .and_then(|address| NonNull::new(*address as *mut c_void))
            .ok_or_else(|| HarnessError::UnlinkedSymbol {
                symbol: symbol.to_string(),
            })
    }
}

/// Load the system zlib, or `None` (with a note) when it is not installed
pub fn system_zlib() -> Option<ZlibLibrary> {
    let config = HarnessConfig::from_build();
    match ZlibLibrary::acquire(&config) {
        Ok(library) => Some(library),
        Err(e) => {
            eprintln!("skipping test: {}", e);
            None
        }
    }
}
