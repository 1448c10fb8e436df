//! Tamper-evident cookie values: `"<value>|<hex hmac-sha256(secret, value)>"`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SEPARATOR: char = '|';

/// Hex length of an HMAC-SHA256 tag.
const SIGNATURE_HEX_LEN: usize = 64;

/// Signs and verifies cookie payloads with a secret fixed at construction.
#[derive(Clone)]
pub struct CookieSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for CookieSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieSigner").field("secret", &"<redacted>").finish()
    }
}

impl CookieSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self { secret: secret.as_ref().to_vec() }
    }

    fn mac(&self, value: &str) -> Option<HmacSha256> {
        // HMAC accepts keys of any length, including empty
        let mut mac = HmacSha256::new_from_slice(&self.secret).ok()?;
        mac.update(value.as_bytes());
        Some(mac)
    }

    pub fn encode(&self, value: &str) -> String {
        let sig = self.mac(value).map(|m| hex::encode(m.finalize().into_bytes())).unwrap_or_default();
        format!("{}{}{}", value, SEPARATOR, sig)
    }

    /// Return the payload only when it is non-empty and its signature matches exactly.
    ///
    /// The split happens at the last separator: a hex signature never contains `|`,
    /// so this is the first separator for every payload without one and still
    /// round-trips payloads that do contain it. Only the lowercase hex that `encode`
    /// emits is accepted; the MAC itself is checked in constant time by `verify_slice`.
    pub fn decode(&self, cookie: &str) -> Option<String> {
        let (value, sig) = cookie.rsplit_once(SEPARATOR)?;
        if value.is_empty() || sig.len() != SIGNATURE_HEX_LEN {
            return None;
        }
        if !sig.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return None;
        }
        let Ok(expected) = hex::decode(sig) else { return None; };
        self.mac(value)?.verify_slice(&expected).ok()?;
        Some(value.to_string())
    }
}

/// The text before the first separator, with no signature check at all.
pub fn unverified_payload(cookie: &str) -> Option<String> {
    let value = cookie.split(SEPARATOR).next().unwrap_or("");
    if value.is_empty() { None } else { Some(value.to_string()) }
}
