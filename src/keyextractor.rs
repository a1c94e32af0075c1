use std::ffi::OsStr;
use std::io::{self, Write};

use crate::digestutil::sha256_bytes;
use crate::error::{KeyError, KeyResult};
use crate::pkiutil::parse_subject_public_key_info;
use crate::rsautil::RsaPublicKeyParts;
use crate::util::{base64_encode_url_safe, decode_public_key};

#[cfg(test)]
use base64::Engine;
#[cfg(test)]
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
#[cfg(test)]
use openssl::bn::BigNum;
#[cfg(test)]
use openssl::ec::{EcGroup, EcKey};
#[cfg(test)]
use openssl::nid::Nid;
#[cfg(test)]
use openssl::rsa::Rsa;

/// Rendered output of one extraction, all four lines are known before any is printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKeyOutput {
    pub modulus_dec: String,
    pub public_exponent_dec: String,
    pub modulus_base64_url: String,
    pub public_exponent_base64_url: String,
}

impl RsaPublicKeyOutput {
    pub fn from(parts: &RsaPublicKeyParts) -> KeyResult<Self> {
        Ok(Self {
            modulus_dec: parts.modulus_dec()?,
            public_exponent_dec: parts.public_exponent_dec()?,
            modulus_base64_url: base64_encode_url_safe(parts.modulus_bytes()),
            public_exponent_base64_url: base64_encode_url_safe(parts.public_exponent_bytes()),
        })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "pkModulus: {}", self.modulus_dec)?;
        writeln!(w, "pkExponent: {}", self.public_exponent_dec)?;
        writeln!(w, "n Modulus for RSA Algorithm: {}", self.modulus_base64_url)?;
        writeln!(w, "e Exponent for RSA Algorithm: {}", self.public_exponent_base64_url)?;
        Ok(())
    }
}

pub fn extract(public_key: &str) -> KeyResult<RsaPublicKeyParts> {
    let public_key_der = decode_public_key(public_key)?;
    debugging!("Public key DER length: {}", public_key_der.len());
    let spki = parse_subject_public_key_info(&public_key_der)?;
    let parts = RsaPublicKeyParts::from_subject_public_key_info(&spki)?;
    debugging!("RSA public key bits: {}", parts.modulus_bits());
    debugging!("Public key fingerprint: {}", hex::encode(sha256_bytes(&public_key_der)));
    Ok(parts)
}

pub fn extract_os(public_key: &OsStr) -> KeyResult<RsaPublicKeyParts> {
    match public_key.to_str() {
        Some(public_key) => extract(public_key),
        None => Err(KeyError::UnexpectedEncoding(format!(
            "public key argument is not UTF-8: {:?}", public_key
        ))),
    }
}

/// Extract and print, nothing is written to `w` when extraction fails
pub fn extract_and_print<W: Write>(public_key: &OsStr, w: &mut W) -> KeyResult<()> {
    let parts = extract_os(public_key)?;
    let output = RsaPublicKeyOutput::from(&parts)?;
    output.write_to(w).map_err(|e| KeyError::Output(e.to_string()))
}

// openssl genrsa 512 && openssl rsa -pubout -outform DER
#[cfg(test)]
const TEST_RSA_512_PUBLIC_KEY: &str = "MFwwDQYJKoZIhvcNAQEBBQADSwAwSAJBANSdmVz5hFf/H0X5PiHqWzXGOa6B7mp42tBoj4+LGOYUq0ty1yH7+Dd1RpyFknGYTVMOLCrtzSpJGiECWNC7HJsCAwEAAQ==";
#[cfg(test)]
const TEST_RSA_512_MODULUS: &str = "11135583650214471834565148794425869780604646309811578034710119031148205764472592693369164393387180438887965216257391433924312667057902459283109185857461403";
#[cfg(test)]
const TEST_RSA_512_MODULUS_BASE64_URL: &str = "ANSdmVz5hFf_H0X5PiHqWzXGOa6B7mp42tBoj4-LGOYUq0ty1yH7-Dd1RpyFknGYTVMOLCrtzSpJGiECWNC7HJs=";
#[cfg(test)]
const TEST_EC_P256_PUBLIC_KEY: &str = "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEOh149f3iPrqua2+XjntGqcFtgF1fSIx4wtrjLWXzVaOkjAIfoWz81AMzrvT6wUS7+b6Fzn67VdIJSMsH0mlqow==";

#[cfg(test)]
fn run(public_key: &str) -> (KeyResult<()>, String) {
    let mut out = Vec::new();
    let result = extract_and_print(OsStr::new(public_key), &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[cfg(test)]
fn base64_url_to_dec(s: &str) -> String {
    let bytes = URL_SAFE.decode(s).unwrap();
    BigNum::from_slice(&bytes).unwrap().to_dec_str().unwrap().to_string()
}

#[test]
fn test_extract_known_rsa_512() {
    let parts = extract(TEST_RSA_512_PUBLIC_KEY).unwrap();
    assert_eq!(512, parts.modulus_bits());
    let output = RsaPublicKeyOutput::from(&parts).unwrap();
    assert_eq!(TEST_RSA_512_MODULUS, output.modulus_dec);
    assert_eq!("65537", output.public_exponent_dec);
    assert_eq!(TEST_RSA_512_MODULUS_BASE64_URL, output.modulus_base64_url);
    assert_eq!("AQAB", output.public_exponent_base64_url);
}

#[test]
fn test_extract_and_print_lines() {
    let (result, out) = run(TEST_RSA_512_PUBLIC_KEY);
    assert!(result.is_ok());
    let expected = format!(
        "pkModulus: {}\npkExponent: 65537\nn Modulus for RSA Algorithm: {}\ne Exponent for RSA Algorithm: AQAB\n",
        TEST_RSA_512_MODULUS, TEST_RSA_512_MODULUS_BASE64_URL
    );
    assert_eq!(expected, out);
}

#[test]
fn test_extract_generated_rsa_2048_round_trip() {
    let rsa = Rsa::generate(2048).unwrap();
    let public_key = STANDARD.encode(rsa.public_key_to_der().unwrap());
    let output = RsaPublicKeyOutput::from(&extract(&public_key).unwrap()).unwrap();

    assert_eq!(rsa.n().to_dec_str().unwrap().to_string(), output.modulus_dec);
    assert_eq!(rsa.e().to_dec_str().unwrap().to_string(), output.public_exponent_dec);
    assert_eq!(output.modulus_dec, base64_url_to_dec(&output.modulus_base64_url));
    assert_eq!(output.public_exponent_dec, base64_url_to_dec(&output.public_exponent_base64_url));
    // 2048 bit modulus always has its top bit set
    assert_eq!(257, URL_SAFE.decode(&output.modulus_base64_url).unwrap().len());
}

#[test]
fn test_extract_pem() {
    let rsa = Rsa::generate(1024).unwrap();
    let public_key_pem = String::from_utf8(rsa.public_key_to_pem().unwrap()).unwrap();
    let parts = extract(&public_key_pem).unwrap();
    assert_eq!(rsa.n().to_dec_str().unwrap().to_string(), parts.modulus_dec().unwrap());
}

#[test]
fn test_extract_invalid_base64() {
    let (result, out) = run("MFwwDQYJ!KoZIhvcNAQEBBQAD");
    assert!(matches!(result, Err(KeyError::InvalidBase64(_))));
    assert!(out.is_empty());
}

#[test]
fn test_extract_surrounding_whitespace_is_invalid_base64() {
    let (result, out) = run(&format!(" {}\n", TEST_RSA_512_PUBLIC_KEY));
    assert!(matches!(result, Err(KeyError::InvalidBase64(_))));
    assert!(out.is_empty());
}

#[test]
fn test_extract_malformed_key() {
    let (result, out) = run("q83vASNFZ4mrze8BI0VniavN7wEjRWeJq83vASNFZ4k=");
    assert!(matches!(result, Err(KeyError::MalformedKey(_))));
    assert!(out.is_empty());
}

#[test]
fn test_extract_pkcs1_is_malformed() {
    let rsa = Rsa::generate(1024).unwrap();
    let public_key = STANDARD.encode(rsa.public_key_to_der_pkcs1().unwrap());
    assert!(matches!(extract(&public_key), Err(KeyError::MalformedKey(_))));
}

#[test]
fn test_extract_unsupported_algorithm() {
    let (result, out) = run(TEST_EC_P256_PUBLIC_KEY);
    match result {
        Err(KeyError::UnsupportedAlgorithm(message)) => assert!(message.contains("1.2.840.10045.2.1")),
        other => panic!("Unexpected result: {:?}", other),
    }
    assert!(out.is_empty());

    let group = EcGroup::from_curve_name(Nid::SECP384R1).unwrap();
    let ec_key = EcKey::generate(&group).unwrap();
    let public_key = STANDARD.encode(ec_key.public_key_to_der().unwrap());
    assert!(matches!(extract(&public_key), Err(KeyError::UnsupportedAlgorithm(_))));
}

#[cfg(unix)]
#[test]
fn test_extract_unexpected_encoding() {
    use std::os::unix::ffi::OsStrExt;

    let mut out = Vec::new();
    let result = extract_and_print(OsStr::from_bytes(&[0x41, 0xff, 0x41, 0x41]), &mut out);
    assert!(matches!(result, Err(KeyError::UnexpectedEncoding(_))));
    assert!(out.is_empty());
}
