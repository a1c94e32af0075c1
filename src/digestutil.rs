use sha2::{Digest, Sha256};

pub fn sha256_bytes(input: &[u8]) -> Vec<u8> {
    digest_bytes::<Sha256>(input)
}

pub fn digest_bytes<D>(input: &[u8]) -> Vec<u8> where D: Digest + Default {
    let mut digest: D = Default::default();
    Digest::update(&mut digest, input);
    digest.finalize().to_vec()
}

#[test]
fn test_sha256_bytes() {
    assert_eq!(
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        hex::encode(sha256_bytes(b""))
    );
}
