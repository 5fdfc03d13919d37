/// Session tokens and cookie signing
///
/// A session starts with a random token handed to the browser. The cookie
/// carries `{token}.{signature}` where the signature is HMAC-SHA256 of the
/// token under the session secret; a cookie with a bad signature is
/// ignored without touching the session store. The store itself is keyed
/// by the SHA-256 of the token, so a leaked store dump cannot be replayed
/// as cookies.
///
/// # Example
///
/// ```
/// use choreboard_shared::auth::token::{generate_session_token, session_id, CookieSigner};
///
/// let signer = CookieSigner::new("a-session-secret-of-at-least-32-bytes!");
/// let token = generate_session_token();
///
/// let cookie_value = signer.sign(&token);
/// assert_eq!(signer.verify(&cookie_value).as_deref(), Some(token.as_str()));
/// assert_eq!(session_id(&token).len(), 64);
/// ```

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Length of the random session token (characters)
pub const SESSION_TOKEN_LENGTH: usize = 43;

const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a random base62 session token (~256 bits)
pub fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();

    (0..SESSION_TOKEN_LENGTH)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

/// Store key for a token: hex SHA-256
pub fn session_id(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Signs and verifies session cookie values
#[derive(Clone)]
pub struct CookieSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for CookieSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CookieSigner { secret: *** }")
    }
}

impl CookieSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size")
    }

    /// Returns the cookie value `{token}.{hex signature}`
    pub fn sign(&self, token: &str) -> String {
        let mut mac = self.mac();
        mac.update(token.as_bytes());
        format!("{}.{}", token, hex::encode(mac.finalize().into_bytes()))
    }

    /// Returns the token if the cookie value carries a valid signature.
    ///
    /// The comparison is constant-time.
    pub fn verify(&self, cookie_value: &str) -> Option<String> {
        let (token, signature) = cookie_value.rsplit_once('.')?;
        if token.len() != SESSION_TOKEN_LENGTH || !token.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }

        let signature = hex::decode(signature).ok()?;
        let mut mac = self.mac();
        mac.update(token.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(token.to_string())
    }
}
