use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{self, Argon2, Params};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
/// Magic bytes prepended to every sealed value.
/// A wrong passphrase or a foreign file fails this check on open.
const MAGIC: &[u8] = b"LUNARA_KV1";

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key derivation failed")]
    KeyDerivation,
    #[error("encryption failed")]
    Encryption,
    #[error("decryption failed: wrong passphrase or corrupted data")]
    Decryption,
    #[error("invalid data format")]
    InvalidFormat,
}

/// Fresh random salt for a new store.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Holds the derived store key for as long as the store is unlocked.
///
/// The key is derived once with Argon2id so every read and write only pays
/// for AES-256-GCM.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Sealer {
    key: [u8; KEY_LEN],
}

impl Sealer {
    pub fn new(passphrase: &str, salt: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self {
            key: derive_key(passphrase, salt)?,
        })
    }

    /// Returns: nonce (12) || ciphertext
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let cipher = Aes256Gcm::new_from_slice(&self.key).map_err(|_| CryptoError::Encryption)?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let mut payload = Vec::with_capacity(MAGIC.len() + plaintext.len());
        payload.extend_from_slice(MAGIC);
        payload.extend_from_slice(plaintext);

        let ciphertext = cipher
            .encrypt(nonce, payload.as_slice())
            .map_err(|_| CryptoError::Encryption)?;
        payload.zeroize();

        let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        output.extend_from_slice(&nonce_bytes);
        output.extend_from_slice(&ciphertext);
        Ok(output)
    }

    /// Reverses [`Sealer::seal`].
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if sealed.len() < NONCE_LEN + MAGIC.len() {
            return Err(CryptoError::InvalidFormat);
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let cipher = Aes256Gcm::new_from_slice(&self.key).map_err(|_| CryptoError::Decryption)?;
        let mut decrypted = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CryptoError::Decryption)?;

        if decrypted.len() < MAGIC.len() || &decrypted[..MAGIC.len()] != MAGIC {
            decrypted.zeroize();
            return Err(CryptoError::Decryption);
        }

        let plaintext = decrypted[MAGIC.len()..].to_vec();
        decrypted.zeroize();
        Ok(plaintext)
    }
}

/// Derive a 256-bit key from a passphrase and salt using Argon2id.
fn derive_key(passphrase: &str, salt: &[u8]) -> Result<[u8; KEY_LEN], CryptoError> {
    let params = Params::new(65536, 3, 1, Some(KEY_LEN)).map_err(|_| CryptoError::KeyDerivation)?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|_| CryptoError::KeyDerivation)?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sealed_value_opens_with_same_key() {
        let salt = generate_salt();
        let sealer = Sealer::new("test-passphrase-123", &salt).unwrap();

        let sealed = sealer.seal(br#"{"cycleLength":28}"#).unwrap();
        let opened = sealer.open(&sealed).unwrap();

        assert_eq!(opened, br#"{"cycleLength":28}"#);
    }

    #[test]
    fn wrong_passphrase_fails() {
        let salt = generate_salt();
        let sealed = Sealer::new("correct", &salt).unwrap().seal(b"secret").unwrap();

        let result = Sealer::new("wrong", &salt).unwrap().open(&sealed);
        assert!(matches!(result, Err(CryptoError::Decryption)));
    }

    #[test]
    fn truncated_data_fails() {
        let sealer = Sealer::new("any", &generate_salt()).unwrap();
        assert!(matches!(sealer.open(&[0u8; 10]), Err(CryptoError::InvalidFormat)));
    }
}
