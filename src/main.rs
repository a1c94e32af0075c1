#[macro_use]
extern crate rust_util;

use clap::{App, AppSettings, Arg};
use rust_util::util_clap::CommandError;

mod digestutil;
mod error;
mod keyextractor;
mod pkiutil;
mod rsautil;
mod util;

fn main() {
    // Run with: RUST_LOG=debug, for more: https://docs.rs/env_logger/0.10.0/env_logger/
    #[cfg(debug_assertions)]
    env_logger::init();

    match inner_main() {
        Err(e) => failure_and_exit!("Extract RSA public key failed: {}", e),
        Ok(Some(code)) => std::process::exit(code),
        Ok(None) => (),
    }
}

fn app() -> App<'static, 'static> {
    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(AppSettings::ColoredHelp)
        .arg(
            Arg::with_name("public-key")
                .index(1)
                .required(true)
                .takes_value(true)
                // PEM starts with -----BEGIN
                .allow_hyphen_values(true)
                .help("RSA public key, base64(DER X.509 SubjectPublicKeyInfo) or PEM"),
        )
}

fn inner_main() -> CommandError {
    let matches = app().get_matches();

    let public_key = opt_value_result!(matches.value_of_os("public-key"), "Public key is required");
    let stdout = std::io::stdout();
    keyextractor::extract_and_print(public_key, &mut stdout.lock())?;
    Ok(None)
}

#[cfg(test)]
const TEST_RSA_512_PUBLIC_KEY: &str = "MFwwDQYJKoZIhvcNAQEBBQADSwAwSAJBANSdmVz5hFf/H0X5PiHqWzXGOa6B7mp42tBoj4+LGOYUq0ty1yH7+Dd1RpyFknGYTVMOLCrtzSpJGiECWNC7HJsCAwEAAQ==";

#[cfg(test)]
fn run_app(args: Vec<&str>) -> (error::KeyResult<()>, String) {
    let matches = app().get_matches_from_safe(args).unwrap();
    let mut out = Vec::new();
    let result = keyextractor::extract_and_print(matches.value_of_os("public-key").unwrap(), &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_app_base64_public_key() {
    let (result, out) = run_app(vec!["rsa-pub-parts", TEST_RSA_512_PUBLIC_KEY]);
    assert!(result.is_ok());
    assert_eq!(4, out.lines().count());
    assert!(out.starts_with("pkModulus: 1113558365"));
    assert!(out.ends_with("e Exponent for RSA Algorithm: AQAB\n"));
}

#[test]
fn test_app_pem_public_key() {
    let pem = format!(
        "-----BEGIN PUBLIC KEY-----\n{}\n{}\n-----END PUBLIC KEY-----\n",
        &TEST_RSA_512_PUBLIC_KEY[..64], &TEST_RSA_512_PUBLIC_KEY[64..]
    );
    let (result, pem_out) = run_app(vec!["rsa-pub-parts", &pem]);
    assert!(result.is_ok());
    let (_, base64_out) = run_app(vec!["rsa-pub-parts", TEST_RSA_512_PUBLIC_KEY]);
    assert_eq!(base64_out, pem_out);
}

#[test]
fn test_app_invalid_base64_writes_nothing() {
    let (result, out) = run_app(vec!["rsa-pub-parts", "MFwwDQYJ!KoZIhvcNAQEBBQAD"]);
    assert!(matches!(result, Err(error::KeyError::InvalidBase64(_))));
    assert!(out.is_empty());
}

#[test]
fn test_app_single_positional() {
    assert!(app().get_matches_from_safe(vec!["rsa-pub-parts"]).is_err());
    assert!(app().get_matches_from_safe(vec!["rsa-pub-parts", "AQAB", "AQAB"]).is_err());
}
