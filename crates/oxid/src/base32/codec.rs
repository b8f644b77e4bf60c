use crate::{
    base32::Base32Error,
    id::{ENCODED_LEN, RAW_LEN},
};

/// Base32hex alphabet in lower case. Symbols are in ascending ASCII order, so
/// comparing encoded strings compares the underlying bytes.
pub const ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";
const NO_VALUE: u8 = 255;
const BITS_PER_CHAR: u32 = 5;
const MASK: u16 = 0x1F;

/// Number of zero bits appended after the last input bit to fill the final
/// symbol.
pub const PAD_BITS: u32 = (ENCODED_LEN as u32) * BITS_PER_CHAR - (RAW_LEN as u32) * 8;

/// Lookup table for decoding. Only the exact alphabet is accepted; there are
/// no case-folded aliases, so every identifier has exactly one text form.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    while i < 32 {
        lut[ALPHABET[i as usize] as usize] = i;
        i += 1;
    }
    lut
};

/// Encodes `input` into `buf`, five bits per symbol, most significant bit
/// first.
///
/// When the input bit count is not a multiple of five, the final symbol is
/// completed with trailing zero bits. Padding at the end (rather than the
/// front) keeps the output byte-compatible with xid strings and preserves
/// ordering: for equal-length inputs `a < b` implies `encode(a) < encode(b)`.
///
/// `buf.len()` must be `ceil(input.len() * 8 / 5)`; fixed-size callers get
/// this from [`ENCODED_LEN`].
#[inline]
pub fn encode_base32(input: &[u8], buf: &mut [u8]) {
    debug_assert_eq!(buf.len(), (input.len() * 8).div_ceil(BITS_PER_CHAR as usize));

    let mut acc = 0_u16;
    let mut bits = 0_u32;
    let mut out = 0;

    for &b in input {
        acc = (acc << 8) | u16::from(b);
        bits += 8;
        while bits >= BITS_PER_CHAR {
            bits -= BITS_PER_CHAR;
            buf[out] = ALPHABET[((acc >> bits) & MASK) as usize];
            out += 1;
        }
    }

    if bits > 0 {
        buf[out] = ALPHABET[((acc << (BITS_PER_CHAR - bits)) & MASK) as usize];
    }
}

/// Decodes a 20-character string into the 12 raw identifier bytes.
///
/// # Errors
///
/// - [`Base32Error::InvalidLength`] if `encoded` is not exactly
///   [`ENCODED_LEN`] bytes.
/// - [`Base32Error::InvalidCharacter`] if a byte is outside [`ALPHABET`], or
///   if the final symbol has any padding bit set.
#[inline]
pub fn decode_base32(encoded: &str) -> Result<[u8; RAW_LEN], Base32Error> {
    decode_base32_bytes(encoded.as_bytes())
}

/// Byte-slice variant of [`decode_base32`], for callers holding raw input
/// such as a C string from a database type input function.
///
/// # Errors
///
/// Same as [`decode_base32`].
pub fn decode_base32_bytes(encoded: &[u8]) -> Result<[u8; RAW_LEN], Base32Error> {
    if encoded.len() != ENCODED_LEN {
        return Err(Base32Error::InvalidLength { len: encoded.len() });
    }

    let mut raw = [0_u8; RAW_LEN];
    let mut acc = 0_u16;
    let mut bits = 0_u32;
    let mut out = 0;

    for (index, &byte) in encoded.iter().enumerate() {
        let val = LOOKUP[byte as usize];
        if val == NO_VALUE {
            return Err(Base32Error::InvalidCharacter { byte, index });
        }
        acc = (acc << BITS_PER_CHAR) | u16::from(val);
        bits += BITS_PER_CHAR;
        if bits >= 8 {
            bits -= 8;
            raw[out] = (acc >> bits) as u8;
            out += 1;
        }
    }

    // Whatever is left over is padding and must be zero.
    debug_assert_eq!(bits, PAD_BITS);
    if acc & ((1 << bits) - 1) != 0 {
        return Err(Base32Error::InvalidCharacter {
            byte: encoded[ENCODED_LEN - 1],
            index: ENCODED_LEN - 1,
        });
    }

    Ok(raw)
}
