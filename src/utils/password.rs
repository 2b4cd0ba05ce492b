//! Hash y verificación de contraseñas
//!
//! Las cuentas nuevas se guardan con bcrypt. Las filas antiguas de `usuarios`
//! tienen hashes de werkzeug (`método$sal$hash`), p. ej.
//! `pbkdf2:sha256:600000$sal$hex` o `scrypt:32768:8:1$sal$hex`; se siguen
//! aceptando al hacer login.

use sha2::{Sha256, Sha512};

use crate::utils::errors::{AppError, AppResult};

const DEFAULT_PBKDF2_ITERATIONS: u32 = 600_000;

pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    bcrypt::hash(password, cost).map_err(|e| AppError::Hash(e.to_string()))
}

/// Compara la contraseña con el hash guardado, sea bcrypt o werkzeug
pub fn verify_password(password: &str, stored: &str) -> AppResult<bool> {
    let stored = stored.trim();
    match stored.split_once('$') {
        Some((method, rest)) if method.starts_with("pbkdf2:") || method.starts_with("scrypt") => {
            let (salt, expected) = rest
                .split_once('$')
                .ok_or_else(|| AppError::Hash("werkzeug hash without salt".to_string()))?;
            let computed = werkzeug_digest(method, password.as_bytes(), salt.as_bytes())?;
            Ok(computed.eq_ignore_ascii_case(expected))
        }
        _ => bcrypt::verify(password, stored).map_err(|e| AppError::Hash(e.to_string())),
    }
}

fn werkzeug_digest(method: &str, password: &[u8], salt: &[u8]) -> AppResult<String> {
    let mut parts = method.split(':');
    match parts.next() {
        Some("pbkdf2") => {
            let algorithm = parts.next().unwrap_or("sha256");
            let iterations = match parts.next() {
                Some(raw) => parse_param(raw)?,
                None => DEFAULT_PBKDF2_ITERATIONS,
            };
            match algorithm {
                "sha256" => {
                    let mut out = [0u8; 32];
                    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut out);
                    Ok(hex::encode(out))
                }
                "sha512" => {
                    let mut out = [0u8; 64];
                    pbkdf2::pbkdf2_hmac::<Sha512>(password, salt, iterations, &mut out);
                    Ok(hex::encode(out))
                }
                other => Err(AppError::Hash(format!("unsupported pbkdf2 digest '{}'", other))),
            }
        }
        Some("scrypt") => {
            let n: u64 = match parts.next() {
                Some(raw) => parse_param(raw)?,
                None => 1 << 15,
            };
            let r: u32 = match parts.next() {
                Some(raw) => parse_param(raw)?,
                None => 8,
            };
            let p: u32 = match parts.next() {
                Some(raw) => parse_param(raw)?,
                None => 1,
            };
            if !n.is_power_of_two() || n < 2 {
                return Err(AppError::Hash(format!("scrypt n must be a power of two, got {}", n)));
            }
            let log_n = n.trailing_zeros() as u8;

            let params = scrypt::Params::new(log_n, r, p, 64)
                .map_err(|e| AppError::Hash(e.to_string()))?;
            let mut out = [0u8; 64];
            scrypt::scrypt(password, salt, &params, &mut out)
                .map_err(|e| AppError::Hash(e.to_string()))?;
            Ok(hex::encode(out))
        }
        _ => Err(AppError::Hash(format!("unsupported hash method '{}'", method))),
    }
}

fn parse_param<T: std::str::FromStr>(raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Hash(format!("invalid hash parameter '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PBKDF2_SHA256: &str = "pbkdf2:sha256:1000$Xy12ab$6b0706b178b208e8fa54045f227f424b274c529b5a42068cdbb4f128137604ab";
    const PBKDF2_SHA512: &str = "pbkdf2:sha512:1000$Xy12ab$9d769c9b89666f0a05fc1bc7bd185ec3c71db879ad9eebc4b91e376785e32c522403aadb30d5340a3659bfd401830be088e3175ed2c57c4f79a65c2b97eb0dd8";
    const SCRYPT: &str = "scrypt:1024:8:1$Qw34cd$1b09b105bd2d9175962c64452bf0f0fb32c025ed5704f78fd14feb23c7bf9c45981c0f3807c8c7fddd37f2ebe63e5d8eda1e71b85141841b7e611d2c5c9a2887";

    #[test]
    fn test_werkzeug_pbkdf2() {
        assert!(verify_password("segredo123", PBKDF2_SHA256).unwrap());
        assert!(!verify_password("segredo124", PBKDF2_SHA256).unwrap());
        assert!(verify_password("segredo123", PBKDF2_SHA512).unwrap());
    }

    #[test]
    fn test_werkzeug_scrypt() {
        assert!(verify_password("segredo123", SCRYPT).unwrap());
        assert!(!verify_password("outra", SCRYPT).unwrap());
    }

    #[test]
    fn test_bcrypt_round_trip() {
        let hash = hash_password("segredo123", 4).unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("segredo123", &hash).unwrap());
        assert!(!verify_password("segredo", &hash).unwrap());
    }

    #[test]
    fn test_unreadable_hash() {
        assert!(verify_password("x", "").is_err());
        assert!(verify_password("x", "pbkdf2:md4:10$s$00").is_err());
        assert!(verify_password("x", "scrypt:1000:8:1$s$00").is_err());
    }
}
