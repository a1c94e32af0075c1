use base64::{DecodeError, Engine};
use base64::engine::general_purpose::{STANDARD, URL_SAFE};

use crate::error::{KeyError, KeyResult};

const PEM_BEGIN: &str = "-----BEGIN";
const PEM_PUBLIC_KEY_TAG: &str = "PUBLIC KEY";

pub fn base64_encode_url_safe<T: AsRef<[u8]>>(input: T) -> String {
    URL_SAFE.encode(input)
}

pub fn base64_decode<T: AsRef<[u8]>>(input: T) -> Result<Vec<u8>, DecodeError> {
    STANDARD.decode(input)
}

/// Decode public key argument to DER bytes, accepts base64(DER) or PEM `PUBLIC KEY`
pub fn decode_public_key(public_key: &str) -> KeyResult<Vec<u8>> {
    if public_key.contains(PEM_BEGIN) {
        let public_key_pem = pem::parse(public_key.trim())?;
        if public_key_pem.tag() != PEM_PUBLIC_KEY_TAG {
            return Err(KeyError::MalformedKey(format!(
                "PEM tag must be {}, but is: {}", PEM_PUBLIC_KEY_TAG, public_key_pem.tag()
            )));
        }
        debugging!("Public key in PEM format, tag: {}", public_key_pem.tag());
        return Ok(public_key_pem.into_contents());
    }
    Ok(base64_decode(public_key)?)
}

#[test]
fn test_base64_decode_strict() {
    assert_eq!(vec![1_u8, 0, 1], base64_decode("AQAB").unwrap());
    assert!(base64_decode("AQAB!").is_err());
    assert!(base64_decode("AQA").is_err());
    assert!(base64_decode("AQ-_").is_err());
}

#[test]
fn test_base64_encode_url_safe() {
    assert_eq!("AQAB", base64_encode_url_safe([1_u8, 0, 1]));
    assert_eq!("-_8=", base64_encode_url_safe([0xfb_u8, 0xff]));
}

#[test]
fn test_decode_public_key_whitespace() {
    assert!(matches!(decode_public_key(" AQAB\n"), Err(KeyError::InvalidBase64(_))));
    assert!(matches!(decode_public_key("AQAB\n"), Err(KeyError::InvalidBase64(_))));
    assert!(matches!(decode_public_key("AQ AB"), Err(KeyError::InvalidBase64(_))));
}

#[test]
fn test_decode_public_key_pem() {
    let pem = "-----BEGIN PUBLIC KEY-----\nAQAB\n-----END PUBLIC KEY-----\n";
    assert_eq!(vec![1_u8, 0, 1], decode_public_key(pem).unwrap());
    assert_eq!(vec![1_u8, 0, 1], decode_public_key(&format!("\n{}\n", pem)).unwrap());

    let cert_pem = "-----BEGIN CERTIFICATE-----\nAQAB\n-----END CERTIFICATE-----\n";
    assert!(matches!(decode_public_key(cert_pem), Err(KeyError::MalformedKey(_))));

    let bad_pem = "-----BEGIN PUBLIC KEY-----\nAQ!B\n-----END PUBLIC KEY-----\n";
    assert!(decode_public_key(bad_pem).is_err());
}
