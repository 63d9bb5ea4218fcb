//! Entry points exported by the zlib library
//!
//! Each export is described by an [`Export`] value that carries its undecorated
//! name, its parameter list (for calling-convention decoration) and its Rust
//! function pointer type. `extern "system"` is stdcall on 32-bit Windows, which
//! is what the WINAPI build of zlib uses, and the C convention everywhere else.

use crate::platform::AddressWidth;
use libc::{c_int, c_long, c_uint, c_ulong, size_t};
use std::marker::PhantomData;

/// `uLong adler32(uLong adler, const Bytef *buf, uInt len)`
pub type Adler32Fn = unsafe extern "system" fn(c_ulong, *const u8, c_uint) -> c_ulong;

/// `uLong adler32_z(uLong adler, const Bytef *buf, z_size_t len)`
pub type Adler32ZFn = unsafe extern "system" fn(c_ulong, *const u8, size_t) -> c_ulong;

/// `uLong adler32_combine(uLong adler1, uLong adler2, z_off_t len2)`
pub type Adler32CombineFn = unsafe extern "system" fn(c_ulong, c_ulong, c_long) -> c_ulong;

/// `int compress(Bytef *dest, uLongf *destLen, const Bytef *source, uLong sourceLen)`
pub type CompressFn = unsafe extern "system" fn(*mut u8, *mut c_ulong, *const u8, c_ulong) -> c_int;

/// `int compress2(Bytef *dest, uLongf *destLen, const Bytef *source, uLong sourceLen, int level)`
pub type Compress2Fn =
    unsafe extern "system" fn(*mut u8, *mut c_ulong, *const u8, c_ulong, c_int) -> c_int;

/// `int uncompress(Bytef *dest, uLongf *destLen, const Bytef *source, uLong sourceLen)`
pub type UncompressFn =
    unsafe extern "system" fn(*mut u8, *mut c_ulong, *const u8, c_ulong) -> c_int;

/// `uLong compressBound(uLong sourceLen)`
pub type CompressBoundFn = unsafe extern "system" fn(c_ulong) -> c_ulong;

/// C parameter kinds that appear in the exported signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Int,
    UInt,
    /// `long` / `unsigned long`, 32 bits on Windows for both widths
    Long,
    Size,
    Ptr,
}

impl Param {
    /// Size in bytes of the parameter for the given address width
    pub fn size(self, width: AddressWidth) -> usize {
        match self {
            Param::Int | Param::UInt | Param::Long => 4,
            Param::Size | Param::Ptr => match width {
                AddressWidth::Narrow => 4,
                AddressWidth::Wide => 8,
            },
        }
    }
}

/// Descriptor of one exported entry point with function pointer type `F`
pub struct Export<F> {
    name: &'static str,
    params: &'static [Param],
    signature: PhantomData<F>,
}

impl<F> Export<F> {
    const fn new(name: &'static str, params: &'static [Param]) -> Self {
        Export {
            name,
            params,
            signature: PhantomData,
        }
    }

    /// Undecorated export name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Bytes the arguments occupy on the call stack
    ///
    /// Every argument takes a whole number of stack slots.
    pub fn stack_bytes(&self, width: AddressWidth) -> usize {
        let slot = width.stack_slot();
        self.params
            .iter()
            .map(|param| param.size(width).div_ceil(slot) * slot)
            .sum()
    }
}

impl<F> std::fmt::Debug for Export<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Export")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

pub const ADLER32: Export<Adler32Fn> =
    Export::new("adler32", &[Param::Long, Param::Ptr, Param::UInt]);

pub const ADLER32_Z: Export<Adler32ZFn> =
    Export::new("adler32_z", &[Param::Long, Param::Ptr, Param::Size]);

pub const ADLER32_COMBINE: Export<Adler32CombineFn> =
    Export::new("adler32_combine", &[Param::Long, Param::Long, Param::Long]);

pub const COMPRESS: Export<CompressFn> = Export::new(
    "compress",
    &[Param::Ptr, Param::Ptr, Param::Ptr, Param::Long],
);

pub const COMPRESS2: Export<Compress2Fn> = Export::new(
    "compress2",
    &[Param::Ptr, Param::Ptr, Param::Ptr, Param::Long, Param::Int],
);

pub const UNCOMPRESS: Export<UncompressFn> = Export::new(
    "uncompress",
    &[Param::Ptr, Param::Ptr, Param::Ptr, Param::Long],
);

pub const COMPRESS_BOUND: Export<CompressBoundFn> =
    Export::new("compressBound", &[Param::Long]);

/// Compression level passed to `compress2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum CompressionLevel {
    /// `Z_DEFAULT_COMPRESSION`, currently level 6
    #[default]
    Default = -1,
    NoCompression = 0,
    Level1 = 1,
    Level2 = 2,
    Level3 = 3,
    Level4 = 4,
    Level5 = 5,
    Level6 = 6,
    Level7 = 7,
    Level8 = 8,
    Level9 = 9,
}

impl CompressionLevel {
    /// `Z_BEST_COMPRESSION`
    pub const BEST: CompressionLevel = CompressionLevel::Level9;

    pub fn as_c_int(self) -> c_int {
        self as i32 as c_int
    }
}
