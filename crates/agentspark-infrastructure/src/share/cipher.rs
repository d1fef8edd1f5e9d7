//! Password protection for share links.
//!
//! Current links use AES-256-GCM with a PBKDF2-SHA256 derived key, packed as
//! `salt[16] ‖ iv[12] ‖ ciphertext`. The XOR scheme only exists to read
//! links created by older releases.

use super::ShareError;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

pub const PBKDF2_ITERATIONS: u32 = 200_000;
const SALT_LEN: usize = 16;
const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;

fn derive_key(password: &str, salt: &[u8]) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    key
}

/// Encrypts `plaintext` with a fresh salt and IV.
pub(crate) fn seal(plaintext: &[u8], password: &str) -> Result<Vec<u8>, ShareError> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    let mut rng = rand::thread_rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut iv);

    let key = derive_key(password, &salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|_| ShareError::Encode("encryption failed".to_string()))?;

    let mut packed = Vec::with_capacity(SALT_LEN + IV_LEN + ciphertext.len());
    packed.extend_from_slice(&salt);
    packed.extend_from_slice(&iv);
    packed.extend_from_slice(&ciphertext);
    Ok(packed)
}

/// Decrypts a packed blob. Authentication failure means a wrong password.
pub(crate) fn open(packed: &[u8], password: &str) -> Result<Vec<u8>, ShareError> {
    if packed.len() < SALT_LEN + IV_LEN + TAG_LEN {
        return Err(ShareError::Malformed(
            "encrypted payload is too short".to_string(),
        ));
    }
    let (salt, rest) = packed.split_at(SALT_LEN);
    let (iv, ciphertext) = rest.split_at(IV_LEN);

    let key = derive_key(password, salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| ShareError::WrongPassword)
}

/// XORs each UTF-16 code unit of `text` with the password's, cycling the
/// password. Applying it twice with the same password is the identity.
pub(crate) fn xor_obfuscate(text: &str, password: &str) -> Option<String> {
    let key: Vec<u16> = password.encode_utf16().collect();
    if key.is_empty() {
        return Some(text.to_string());
    }
    let units: Vec<u16> = text
        .encode_utf16()
        .enumerate()
        .map(|(i, unit)| unit ^ key[i % key.len()])
        .collect();
    String::from_utf16(&units).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_layout_and_open() {
        let packed = seal(b"{\"agents\":[]}", "hunter2").unwrap();
        assert_eq!(packed.len(), SALT_LEN + IV_LEN + 13 + TAG_LEN);
        assert_eq!(open(&packed, "hunter2").unwrap(), b"{\"agents\":[]}");
    }

    #[test]
    fn test_open_with_wrong_password() {
        let packed = seal(b"secret team", "right").unwrap();
        assert_eq!(open(&packed, "wrong").unwrap_err(), ShareError::WrongPassword);
    }

    #[test]
    fn test_open_rejects_truncated_blob() {
        assert!(matches!(
            open(&[0u8; 20], "pw").unwrap_err(),
            ShareError::Malformed(_)
        ));
    }

    #[test]
    fn test_xor_is_involution() {
        let text = r#"{"topic":"Café ☕","agents":[]}"#;
        let hidden = xor_obfuscate(text, "key").unwrap();
        assert_ne!(hidden, text);
        assert_eq!(xor_obfuscate(&hidden, "key").unwrap(), text);
        assert_eq!(xor_obfuscate(text, "").unwrap(), text);
    }
}
