//! Test vectors shared by all checks

/// "Hello world!", fed to the checksum in three pieces
pub const GREETING: [&[u8]; 3] = [b"Hello", b" ", b"world!"];

/// Adler-32 of "Hello world!"
pub const GREETING_ADLER32: u32 = 0x1d09045e;

/// Highly repetitive input that any deflate implementation shrinks
pub const REPETITIVE: &[u8] = b"aaaaaaaaaa--aaaaaaaaaa--aaaaaaaaaa--aaaaaaaaaa--aaaaaaaaaa";

/// Size of the output buffers handed to compress / uncompress
pub const SCRATCH_LEN: usize = 1024;

/// Input size for the bound query
pub const BOUND_INPUT_LEN: usize = 32768;
