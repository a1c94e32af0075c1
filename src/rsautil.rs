use openssl::bn::BigNum;
use x509_parser::public_key::PublicKey;
use x509_parser::x509::SubjectPublicKeyInfo;

use crate::error::{KeyError, KeyResult};
use crate::pkiutil::{get_pki_algorithm, PkiAlgorithm};

#[derive(Debug)]
pub struct RsaPublicKeyParts {
    // n
    pub modulus: BigNum,
    // e
    pub public_exponent: BigNum,
}

impl RsaPublicKeyParts {
    pub fn from_subject_public_key_info(spki: &SubjectPublicKeyInfo) -> KeyResult<Self> {
        let pki_algorithm = get_pki_algorithm(&spki.algorithm);
        debugging!("Public key algorithm: {:?}, OID: {}", pki_algorithm, spki.algorithm.algorithm.to_id_string());
        if pki_algorithm != PkiAlgorithm::Rsa {
            return Err(KeyError::UnsupportedAlgorithm(format!(
                "{}, OID: {}", pki_algorithm, spki.algorithm.algorithm.to_id_string()
            )));
        }
        match spki.parsed() {
            Ok(PublicKey::RSA(rsa_public_key)) => Ok(Self {
                modulus: unsigned_big_num("modulus", rsa_public_key.modulus)?,
                public_exponent: unsigned_big_num("exponent", rsa_public_key.exponent)?,
            }),
            Ok(_) => Err(KeyError::MalformedKey("RSA algorithm without RSA public key".to_string())),
            Err(e) => Err(KeyError::MalformedKey(format!("parse RSA public key failed: {}", e))),
        }
    }

    pub fn modulus_bits(&self) -> i32 {
        self.modulus.num_bits()
    }

    pub fn modulus_dec(&self) -> KeyResult<String> {
        Ok(self.modulus.to_dec_str()?.to_string())
    }

    pub fn public_exponent_dec(&self) -> KeyResult<String> {
        Ok(self.public_exponent.to_dec_str()?.to_string())
    }

    pub fn modulus_bytes(&self) -> Vec<u8> {
        to_signed_bytes_be(&self.modulus)
    }

    pub fn public_exponent_bytes(&self) -> Vec<u8> {
        to_signed_bytes_be(&self.public_exponent)
    }
}

// DER INTEGER content, read as unsigned magnitude
fn unsigned_big_num(name: &str, der_integer: &[u8]) -> KeyResult<BigNum> {
    if der_integer.is_empty() {
        return Err(KeyError::MalformedKey(format!("RSA {} is empty", name)));
    }
    Ok(BigNum::from_slice(der_integer)?)
}

/// Minimal big-endian two's-complement bytes of a non-negative number,
/// a leading `0x00` is kept when the highest bit is set, zero is `[0x00]`
pub fn to_signed_bytes_be(n: &BigNum) -> Vec<u8> {
    let unsigned_bytes = n.to_vec();
    match unsigned_bytes.first() {
        Some(b) if b & 0x80 == 0 => unsigned_bytes,
        _ => {
            let mut signed_bytes = Vec::with_capacity(unsigned_bytes.len() + 1);
            signed_bytes.push(0x00);
            signed_bytes.extend_from_slice(&unsigned_bytes);
            signed_bytes
        }
    }
}

#[test]
fn test_to_signed_bytes_be() {
    assert_eq!(vec![0x01, 0x00, 0x01], to_signed_bytes_be(&BigNum::from_u32(65537).unwrap()));
    assert_eq!(vec![0x7f], to_signed_bytes_be(&BigNum::from_u32(0x7f).unwrap()));
    assert_eq!(vec![0x00, 0x80], to_signed_bytes_be(&BigNum::from_u32(0x80).unwrap()));
    assert_eq!(vec![0x00, 0xff, 0xff], to_signed_bytes_be(&BigNum::from_u32(0xffff).unwrap()));
    assert_eq!(vec![0x00], to_signed_bytes_be(&BigNum::new().unwrap()));
}

#[test]
fn test_unsigned_big_num() {
    assert_eq!("65537", unsigned_big_num("exponent", &[0x01, 0x00, 0x01]).unwrap().to_dec_str().unwrap().to_string());
    assert_eq!("255", unsigned_big_num("exponent", &[0x00, 0xff]).unwrap().to_dec_str().unwrap().to_string());
    assert_eq!("32769", unsigned_big_num("modulus", &[0x80, 0x01]).unwrap().to_dec_str().unwrap().to_string());
    assert!(matches!(unsigned_big_num("modulus", &[]), Err(KeyError::MalformedKey(_))));
}
