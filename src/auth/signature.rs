//! HMAC-SHA512 signature generation for YoBit trade API authentication.
//!
//! Trade requests carry a signature computed as:
//! ```text
//! hex(HMAC-SHA512(urlencoded_post_body, private_key))
//! ```
//!
//! The signature is sent in the `Sign` header alongside the public key in the
//! `Key` header.

use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::error::YobitError;
use crate::types::RequestParams;

type HmacSha512 = Hmac<Sha512>;

/// Sign an already-encoded POST body.
///
/// The body must be the exact byte string that will be transmitted.
pub fn sign_payload(payload: &str, private_key: &str) -> Result<String, YobitError> {
    let mut hmac = HmacSha512::new_from_slice(private_key.as_bytes())
        .map_err(|e| YobitError::Auth(format!("Invalid HMAC key: {e}")))?;
    hmac.update(payload.as_bytes());
    Ok(hex::encode(hmac.finalize().into_bytes()))
}

/// Encode `params` and sign the result.
///
/// Returns the encoded body together with its signature so the caller sends
/// exactly what was signed.
///
/// # Example
///
/// ```rust
/// use yobit_api_client::auth::sign_params;
/// use yobit_api_client::types::RequestParams;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let params = RequestParams::new().with("method", "getInfo").with("nonce", 1);
/// let (body, signature) = sign_params(&params, "private_key")?;
/// assert_eq!(body, "method=getInfo&nonce=1");
/// assert_eq!(signature.len(), 128);
/// # Ok(())
/// # }
/// ```
pub fn sign_params(
    params: &RequestParams,
    private_key: &str,
) -> Result<(String, String), YobitError> {
    let body = params.to_query_string()?;
    let signature = sign_payload(&body, private_key)?;
    Ok((body, signature))
}
