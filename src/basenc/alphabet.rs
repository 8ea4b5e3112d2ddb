/// Sentinel in the reverse table for bytes outside the alphabet.
const INVALID: u8 = 0xFF;

/// Ordered symbol set mapping digits `0..radix` to bytes and back.
///
/// Built at compile time; a duplicate symbol aborts const evaluation, so the
/// reverse table is always the exact inverse of the forward one.
pub struct Alphabet {
    symbols: &'static [u8],
    decode: [u8; 256],
}

impl Alphabet {
    pub const fn new(symbols: &'static [u8]) -> Self {
        assert!(
            !symbols.is_empty() && symbols.len() < INVALID as usize,
            "alphabet size out of range"
        );
        let mut decode = [INVALID; 256];
        let mut i = 0;
        while i < symbols.len() {
            let s = symbols[i] as usize;
            if decode[s] != INVALID {
                panic!("duplicate symbol in alphabet");
            }
            decode[s] = i as u8;
            i += 1;
        }
        Self { symbols, decode }
    }

    #[inline]
    pub const fn radix(&self) -> usize {
        self.symbols.len()
    }

    /// Symbol for `digit`. Panics if `digit >= radix`.
    #[inline]
    pub fn symbol(&self, digit: usize) -> u8 {
        self.symbols[digit]
    }

    #[inline]
    pub fn digit(&self, symbol: u8) -> Option<u8> {
        match self.decode[symbol as usize] {
            INVALID => None,
            d => Some(d),
        }
    }

    #[inline]
    pub fn contains(&self, symbol: u8) -> bool {
        self.decode[symbol as usize] != INVALID
    }

    pub fn symbols(&self) -> &'static [u8] {
        self.symbols
    }
}

/// RFC 4648 base64 alphabet.
pub static BASE64: Alphabet =
    Alphabet::new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/");

/// Padding symbol closing a short base64 group.
pub const BASE64_PAD: u8 = b'=';

pub static BASE85: Alphabet = Alphabet::new(
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-;<=>?@^_`{|}~",
);

/// Stands in for a whole group of four zero bytes.
pub const BASE85_ZERO_RUN: u8 = b'z';

/// Written instead of `z` when a group's leading digit is 61, so the group is
/// not mistaken for the zero-run shorthand. Digit 83 can never lead a group.
pub const BASE85_LEADING_Z: u8 = b'}';

pub static BASE91: Alphabet = Alphabet::new(
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!#$%&()*+,./:;<=>?@[]^_`{|}~\"",
);

/// The first 98 symbols are printable ASCII plus the six C whitespace bytes;
/// the remaining 24 are `"`, `'`, 0x01-0x08 and 0x0E-0x1B.
pub static BASE122: Alphabet = Alphabet::new(
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz\
      !#$%&()*+,-./:;<=>?@[\\]^_`{|}~ \t\n\r\x0b\x0c\
      \"'\x01\x02\x03\x04\x05\x06\x07\x08\
      \x0e\x0f\x10\x11\x12\x13\x14\x15\x16\x17\x18\x19\x1a\x1b",
);

/// Bytes C's `isspace` accepts in the "C" locale.
#[inline]
pub fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Line breaks an encoder may have inserted.
#[inline]
pub fn is_line_break(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}
