//! Challenge-response computation for the FRITZ!Box login.
//!
//! Two schemes exist. Current firmware hands out PBKDF2 challenges of the
//! form `2$<iter1>$<salt1>$<iter2>$<salt2>`; older firmware sends a bare
//! challenge string answered with an MD5 digest.

use md5::{Digest, Md5};
use sha2::Sha256;

use crate::backend::AuthError;

const PBKDF2_PREFIX: &str = "2$";

/// Compute the login response for `challenge`.
pub fn respond(challenge: &str, password: &str) -> Result<String, AuthError> {
    if challenge.starts_with(PBKDF2_PREFIX) {
        pbkdf2_response(challenge, password)
    } else {
        Ok(md5_response(challenge, password))
    }
}

fn pbkdf2_response(challenge: &str, password: &str) -> Result<String, AuthError> {
    let parts: Vec<&str> = challenge.split('$').collect();
    let [_, iter1, salt1, iter2, salt2] = parts.as_slice() else {
        return Err(AuthError::Protocol(format!(
            "challenge has {} fields, expected 5",
            parts.len()
        )));
    };

    let rounds = |raw: &str| {
        raw.parse::<u32>()
            .map_err(|_| AuthError::Protocol(format!("bad iteration count {raw:?}")))
    };
    let salt = |raw: &str| {
        hex::decode(raw).map_err(|_| AuthError::Protocol(format!("bad salt {raw:?}")))
    };

    let mut hash1 = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt(*salt1)?, rounds(*iter1)?, &mut hash1);

    let mut hash2 = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(&hash1, &salt(*salt2)?, rounds(*iter2)?, &mut hash2);

    Ok(format!("{salt2}${}", hex::encode(hash2)))
}

fn md5_response(challenge: &str, password: &str) -> String {
    // The box hashes UTF-16LE; code points above U+00FF become '.'.
    let material: Vec<u8> = format!("{challenge}-{password}")
        .chars()
        .map(|c| if u32::from(c) > 0xFF { '.' } else { c })
        .flat_map(|c| (u32::from(c) as u16).to_le_bytes())
        .collect();

    format!("{challenge}-{}", hex::encode(Md5::digest(&material)))
}
