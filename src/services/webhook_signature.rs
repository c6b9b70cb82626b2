use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Sign a callback payload using HMAC-SHA256
///
/// # Arguments
/// * `payload` - The JSON payload string to sign
/// * `secret` - The signing key
///
/// # Returns
/// Signature string in format "sha256=<hex>"
///
/// # Example
/// ```
/// use waggle::services::webhook_signature::sign_payload;
/// let payload = r#"{"name":"slack.invite","data":{"email":"ada@example.com"}}"#;
/// let secret = "my_signing_key";
/// let signature = sign_payload(payload, secret);
/// assert!(signature.starts_with("sha256="));
/// ```
pub fn sign_payload(payload: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");

    mac.update(payload.as_bytes());

    let result = mac.finalize();
    let code_bytes = result.into_bytes();

    format!("sha256={}", hex::encode(code_bytes))
}

/// Verify a callback signature
///
/// # Arguments
/// * `payload` - The JSON payload string that was signed
/// * `signature` - The signature to verify (format: "sha256=<hex>")
/// * `secret` - The signing key
///
/// # Returns
/// `true` if signature is valid, `false` otherwise
///
/// # Example
/// ```
/// use waggle::services::webhook_signature::{sign_payload, verify_signature};
/// let payload = r#"{"name":"slack.invite","data":{}}"#;
/// let secret = "my_secret";
/// let signature = sign_payload(payload, secret);
/// assert!(verify_signature(payload, &signature, secret));
/// ```
pub fn verify_signature(payload: &str, signature: &str, secret: &str) -> bool {
    let expected_signature = sign_payload(payload, secret);

    // Constant-time comparison to prevent timing attacks
    use_constant_time_eq(&expected_signature, signature)
}

/// Constant-time string comparison to prevent timing attacks
fn use_constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut result = 0u8;
    for i in 0..a_bytes.len() {
        result |= a_bytes[i] ^ b_bytes[i];
    }

    result == 0
}

/// Broker signing key pair. The broker rotates keys by signing with `next`
/// before it becomes `current`, so verification accepts either.
#[derive(Clone)]
pub struct SigningKeys {
    pub current: String,
    pub next: Option<String>,
}

impl SigningKeys {
    pub fn new(current: String, next: Option<String>) -> Self {
        Self { current, next }
    }

    pub fn sign(&self, payload: &str) -> String {
        sign_payload(payload, &self.current)
    }

    pub fn verify(&self, payload: &str, signature: &str) -> bool {
        if verify_signature(payload, signature, &self.current) {
            return true;
        }

        match self.next.as_deref() {
            Some(next) => verify_signature(payload, signature, next),
            None => false,
        }
    }
}
