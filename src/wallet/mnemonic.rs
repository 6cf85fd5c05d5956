//! 25-word backup phrases.
//!
//! The 32-byte key seed is split into 24 little-endian 11-bit groups, each
//! mapped onto the BIP-39 English word list. The 25th word is a checksum: the
//! first 11 bits of the seed's SHA-512/256 digest.

use bip39::Language;

use crate::encoding::sha512_256;
use crate::wallet::types::{WalletError, WalletResult};

/// Number of words in a backup phrase.
pub const MNEMONIC_LEN: usize = 25;

const BITS_PER_WORD: u32 = 11;
const WORD_MASK: u32 = (1 << BITS_PER_WORD) - 1;

/// Encode a 32-byte seed as a backup phrase.
pub fn from_key(key: &[u8; 32]) -> String {
    let words = Language::English.word_list();
    let mut phrase: Vec<&str> = to_u11(key).into_iter().map(|i| words[i as usize]).collect();
    phrase.push(words[checksum_index(key) as usize]);
    phrase.join(" ")
}

/// Decode a backup phrase into its 32-byte seed.
pub fn to_key(phrase: &str) -> WalletResult<[u8; 32]> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.len() != MNEMONIC_LEN {
        return Err(WalletError::InvalidMnemonic(format!(
            "expected {} words, got {}",
            MNEMONIC_LEN,
            words.len()
        )));
    }

    let indexes = words[..MNEMONIC_LEN - 1]
        .iter()
        .map(|word| word_index(word))
        .collect::<WalletResult<Vec<u32>>>()?;

    let mut bytes = from_u11(&indexes);
    // 24 * 11 bits leave one trailing byte that must be empty.
    if bytes.len() != 33 || bytes[32] != 0 {
        return Err(WalletError::InvalidMnemonic("failed to decode key".to_string()));
    }
    bytes.truncate(32);

    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes);

    let expected = Language::English.word_list()[checksum_index(&key) as usize];
    if words[MNEMONIC_LEN - 1] != expected {
        return Err(WalletError::InvalidMnemonic("checksum word mismatch".to_string()));
    }
    Ok(key)
}

fn word_index(word: &str) -> WalletResult<u32> {
    Language::English
        .word_list()
        .iter()
        .position(|candidate| *candidate == word)
        .map(|i| i as u32)
        .ok_or_else(|| WalletError::InvalidMnemonic(format!("unknown word '{}'", word)))
}

fn checksum_index(key: &[u8; 32]) -> u32 {
    let digest = sha512_256(&[key]);
    to_u11(&digest[..2])[0]
}

fn to_u11(bytes: &[u8]) -> Vec<u32> {
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity(bytes.len() * 8 / BITS_PER_WORD as usize + 1);
    for byte in bytes {
        buffer |= (*byte as u32) << bits;
        bits += 8;
        if bits >= BITS_PER_WORD {
            out.push(buffer & WORD_MASK);
            buffer >>= BITS_PER_WORD;
            bits -= BITS_PER_WORD;
        }
    }
    if bits != 0 {
        out.push(buffer & WORD_MASK);
    }
    out
}

fn from_u11(values: &[u32]) -> Vec<u8> {
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity(values.len() * BITS_PER_WORD as usize / 8 + 1);
    for value in values {
        buffer |= value << bits;
        bits += BITS_PER_WORD;
        while bits >= 8 {
            out.push((buffer & 0xff) as u8);
            buffer >>= 8;
            bits -= 8;
        }
    }
    if bits != 0 {
        out.push((buffer & 0xff) as u8);
    }
    out
}
