//! Account key material and raw signing.
//!
//! # Security
//! - Secrets are loaded ONLY from backup phrases or environment variables
//! - Keys are never logged; `Debug` prints the address only

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use crate::wallet::address::Address;
use crate::wallet::mnemonic;
use crate::wallet::types::{WalletError, WalletResult};

/// An ed25519 account: address plus private key.
#[derive(Clone)]
pub struct Account {
    signing_key: SigningKey,
    address: Address,
}

impl Account {
    /// Generate a fresh account from the OS random source.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Build an account from its 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(seed))
    }

    /// Recover an account from its 25-word backup phrase.
    pub fn from_mnemonic(phrase: &str) -> WalletResult<Self> {
        let seed = mnemonic::to_key(phrase)?;
        Ok(Self::from_seed(&seed))
    }

    /// Load an account whose backup phrase is stored in `var`.
    pub fn from_env(var: &str) -> WalletResult<Self> {
        let phrase =
            std::env::var(var).map_err(|_| WalletError::MissingEnv(var.to_string()))?;
        let account = Self::from_mnemonic(&phrase)?;

        tracing::info!(address = %account.address(), env = var, "Account loaded");
        Ok(account)
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = Address::new(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// The backup phrase for this account's seed.
    pub fn mnemonic(&self) -> String {
        mnemonic::from_key(&self.signing_key.to_bytes())
    }

    /// Sign arbitrary bytes (callers add their own domain prefix).
    pub fn sign_bytes(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Sign a program for delegated logic-signature use.
    pub fn sign_program(&self, program: &[u8]) -> [u8; 64] {
        let mut message = Vec::with_capacity(7 + program.len());
        message.extend_from_slice(b"Program");
        message.extend_from_slice(program);
        self.sign_bytes(&message)
    }
}

/// Check an ed25519 signature made by `address` over `message`.
pub fn verify_bytes(address: &Address, message: &[u8], signature: &[u8; 64]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(address.as_bytes()) else {
        return false;
    };
    key.verify(message, &Signature::from_bytes(signature)).is_ok()
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_recover_same_address() {
        let account = Account::generate();
        let recovered = Account::from_mnemonic(&account.mnemonic()).unwrap();
        assert_eq!(recovered.address(), account.address());
    }

    #[test]
    fn test_seed_determines_address() {
        let a = Account::from_seed(&[3u8; 32]);
        let b = Account::from_seed(&[3u8; 32]);
        assert_eq!(a.address(), b.address());
        assert_ne!(a.address(), Account::from_seed(&[4u8; 32]).address());
    }

    #[test]
    fn test_sign_and_verify() {
        let account = Account::from_seed(&[9u8; 32]);
        let signature = account.sign_bytes(b"TXpayload");
        assert!(verify_bytes(&account.address(), b"TXpayload", &signature));
        assert!(!verify_bytes(&account.address(), b"TXother", &signature));
    }

    #[test]
    fn test_program_signature_uses_prefix() {
        let account = Account::from_seed(&[9u8; 32]);
        let program = [0x06, 0x81, 0x01];
        let signature = account.sign_program(&program);
        assert!(verify_bytes(&account.address(), b"Program\x06\x81\x01", &signature));
    }

    #[test]
    fn test_debug_hides_key() {
        let account = Account::from_seed(&[9u8; 32]);
        let debug = format!("{:?}", account);
        assert!(debug.contains("address"));
        assert!(!debug.contains("signing_key"));
    }

    #[test]
    fn test_from_env_missing() {
        let err = Account::from_env("ALGO_WORKFLOWS_TEST_UNSET_VAR").unwrap_err();
        assert!(matches!(err, WalletError::MissingEnv(_)));
    }
}
