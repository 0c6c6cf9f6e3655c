use crate::auth::claims::ClaimSet;
use crate::auth::errors::TokenError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS512;

/// HS512 compact-JWS codec bound to one shared secret.
///
/// `decode` verifies integrity only. Expiration is left to
/// [`TokenManager`](crate::auth::lifecycle::TokenManager).
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn encode(&self, claims: &ClaimSet) -> Result<String, TokenError> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<ClaimSet, TokenError> {
        check_structure(token)?;

        decode::<ClaimSet>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            })
    }
}

/// Rejects anything that is not three base64url segments carrying a JSON
/// header and a readable claim set, before any signature work happens.
fn check_structure(token: &str) -> Result<(), TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = segments.as_slice() else {
        return Err(TokenError::Malformed);
    };

    let header = URL_SAFE_NO_PAD.decode(header).map_err(|_| TokenError::Malformed)?;
    let payload = URL_SAFE_NO_PAD.decode(payload).map_err(|_| TokenError::Malformed)?;
    URL_SAFE_NO_PAD.decode(signature).map_err(|_| TokenError::Malformed)?;

    serde_json::from_slice::<Header>(&header).map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice::<ClaimSet>(&payload).map_err(|_| TokenError::Malformed)?;

    Ok(())
}
