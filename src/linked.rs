//! Exports bound at link time
//!
//! Only compiled for the static linkage modes. The link directives come from
//! `build.rs`; here the entry points are declared and handed out by name.

use crate::exports::{
    Adler32CombineFn, Adler32Fn, Adler32ZFn, Compress2Fn, CompressBoundFn, CompressFn,
    UncompressFn,
};
use libc::{c_int, c_long, c_uint, c_ulong, size_t};
use std::ffi::c_void;
use std::ptr::NonNull;

extern "system" {
    fn adler32(adler: c_ulong, buf: *const u8, len: c_uint) -> c_ulong;
    fn adler32_z(adler: c_ulong, buf: *const u8, len: size_t) -> c_ulong;
    fn adler32_combine(adler1: c_ulong, adler2: c_ulong, len2: c_long) -> c_ulong;
    fn compress(dest: *mut u8, dest_len: *mut c_ulong, source: *const u8, source_len: c_ulong)
        -> c_int;
    fn compress2(
        dest: *mut u8,
        dest_len: *mut c_ulong,
        source: *const u8,
        source_len: c_ulong,
        level: c_int,
    ) -> c_int;
    fn uncompress(
        dest: *mut u8,
        dest_len: *mut c_ulong,
        source: *const u8,
        source_len: c_ulong,
    ) -> c_int;
    #[link_name = "compressBound"]
    fn compress_bound(source_len: c_ulong) -> c_ulong;
}

/// Address of a link-time bound export, by undecorated name
pub fn address(symbol: &str) -> Option<NonNull<c_void>> {
    let address = match symbol {
        "adler32" => adler32 as Adler32Fn as *mut c_void,
        "adler32_z" => adler32_z as Adler32ZFn as *mut c_void,
        "adler32_combine" => adler32_combine as Adler32CombineFn as *mut c_void,
        "compress" => compress as CompressFn as *mut c_void,
        "compress2" => compress2 as Compress2Fn as *mut c_void,
        "uncompress" => uncompress as UncompressFn as *mut c_void,
        "compressBound" => compress_bound as CompressBoundFn as *mut c_void,
        _ => return None,
    };
    NonNull::new(address)
}
