use thiserror::Error;

/// Reasons a public key argument cannot be turned into RSA parts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Invalid base64: {0}")]
    InvalidBase64(String),

    #[error("Malformed key: {0}")]
    MalformedKey(String),

    #[error("Unsupported algorithm: {0}, only RSA public key is supported")]
    UnsupportedAlgorithm(String),

    #[error("Unexpected encoding: {0}")]
    UnexpectedEncoding(String),

    #[error("Write output failed: {0}")]
    Output(String),
}

pub type KeyResult<T> = Result<T, KeyError>;

impl From<base64::DecodeError> for KeyError {
    fn from(e: base64::DecodeError) -> Self {
        KeyError::InvalidBase64(e.to_string())
    }
}

impl From<pem::PemError> for KeyError {
    fn from(e: pem::PemError) -> Self {
        match e {
            pem::PemError::InvalidData(e) => KeyError::InvalidBase64(e.to_string()),
            e => KeyError::MalformedKey(format!("parse PEM failed: {}", e)),
        }
    }
}

impl From<openssl::error::ErrorStack> for KeyError {
    fn from(e: openssl::error::ErrorStack) -> Self {
        KeyError::MalformedKey(format!("big number failed: {}", e))
    }
}

#[test]
fn test_key_error_display() {
    assert_eq!(
        "Unsupported algorithm: 1.2.840.10045.2.1, only RSA public key is supported",
        KeyError::UnsupportedAlgorithm("1.2.840.10045.2.1".to_string()).to_string()
    );
    assert_eq!("Invalid base64: bad", KeyError::InvalidBase64("bad".to_string()).to_string());
}
