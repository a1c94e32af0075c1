use std::fmt;

use x509_parser::prelude::FromDer;
use x509_parser::x509::{AlgorithmIdentifier, SubjectPublicKeyInfo};

use crate::error::{KeyError, KeyResult};

pub const OID_RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
pub const OID_EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PkiAlgorithm {
    Rsa,
    P256,
    P384,
    P521,
    UnknownEc(String),
    Unknown(String),
}

impl fmt::Display for PkiAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PkiAlgorithm::Rsa => write!(f, "RSA"),
            PkiAlgorithm::P256 => write!(f, "EC P-256"),
            PkiAlgorithm::P384 => write!(f, "EC P-384"),
            PkiAlgorithm::P521 => write!(f, "EC P-521"),
            PkiAlgorithm::UnknownEc(curve) => write!(f, "EC {}", curve),
            PkiAlgorithm::Unknown(oid) => write!(f, "unknown {}", oid),
        }
    }
}

pub fn get_pki_algorithm(algorithm_identifier: &AlgorithmIdentifier) -> PkiAlgorithm {
    let algorithm_id_string = algorithm_identifier.algorithm.to_id_string();
    if OID_RSA_ENCRYPTION == algorithm_id_string {
        return PkiAlgorithm::Rsa;
    }
    if OID_EC_PUBLIC_KEY == algorithm_id_string {
        if let Some(parameters) = &algorithm_identifier.parameters {
            if let Ok(parameter_oid) = parameters.as_oid() {
                let parameter_oid_id_string = parameter_oid.to_id_string();
                return match parameter_oid_id_string.as_str() {
                    "1.2.840.10045.3.1.7" => PkiAlgorithm::P256,
                    "1.3.132.0.34" => PkiAlgorithm::P384,
                    "1.3.132.0.35" => PkiAlgorithm::P521,
                    _ => PkiAlgorithm::UnknownEc(parameter_oid_id_string),
                };
            }
        }
        return PkiAlgorithm::UnknownEc(algorithm_id_string);
    }
    PkiAlgorithm::Unknown(algorithm_id_string)
}

/// Parse DER bytes as a whole `SubjectPublicKeyInfo`, trailing bytes are rejected
pub fn parse_subject_public_key_info(public_key_der: &[u8]) -> KeyResult<SubjectPublicKeyInfo<'_>> {
    let (left, spki) = SubjectPublicKeyInfo::from_der(public_key_der)
        .map_err(|e| KeyError::MalformedKey(format!("parse SubjectPublicKeyInfo failed: {}", e)))?;
    if !left.is_empty() {
        return Err(KeyError::MalformedKey(format!(
            "{} trailing byte(s) after SubjectPublicKeyInfo", left.len()
        )));
    }
    Ok(spki)
}

#[cfg(test)]
const TEST_EC_P256_PUBLIC_KEY: &str = "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEOh149f3iPrqua2+XjntGqcFtgF1fSIx4wtrjLWXzVaOkjAIfoWz81AMzrvT6wUS7+b6Fzn67VdIJSMsH0mlqow==";

#[test]
fn test_get_pki_algorithm_ec_p256() {
    let der = crate::util::base64_decode(TEST_EC_P256_PUBLIC_KEY).unwrap();
    let spki = parse_subject_public_key_info(&der).unwrap();
    assert_eq!(PkiAlgorithm::P256, get_pki_algorithm(&spki.algorithm));
}

#[test]
fn test_parse_subject_public_key_info_trailing_bytes() {
    let mut der = crate::util::base64_decode(TEST_EC_P256_PUBLIC_KEY).unwrap();
    der.push(0x00);
    match parse_subject_public_key_info(&der) {
        Err(KeyError::MalformedKey(message)) => assert!(message.contains("trailing")),
        other => panic!("Unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_parse_subject_public_key_info_not_der() {
    assert!(matches!(
        parse_subject_public_key_info(&[0x01, 0x02, 0x03, 0x04, 0x05]),
        Err(KeyError::MalformedKey(_))
    ));
    assert!(matches!(parse_subject_public_key_info(&[]), Err(KeyError::MalformedKey(_))));
}
