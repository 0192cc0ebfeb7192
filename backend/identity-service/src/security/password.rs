/// Password hashing and verification using Argon2id
use crate::config::PasswordSettings;
use crate::error::{IdentityError, Result};
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// One-way salted password hashing
///
/// ## Security
///
/// - Algorithm: Argon2id, v19
/// - Salt: fresh random 16-byte salt per call
/// - Output: PHC string with salt and cost parameters embedded, so stored
///   hashes keep verifying after the configured cost changes
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// ## Errors
    ///
    /// Returns `HashingFailure` if the cost parameters are out of range
    pub fn new(settings: &PasswordSettings) -> Result<Self> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| IdentityError::hashing_failure("Invalid Argon2 parameters", e))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password
    ///
    /// ## Returns
    ///
    /// PHC-formatted hash string safe for database storage
    ///
    /// ## Errors
    ///
    /// `HashingFailure` only when Argon2 itself fails (e.g. memory cannot be
    /// allocated). Not retryable.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| IdentityError::hashing_failure("Password hashing failed", e))?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against its stored hash
    ///
    /// ## Security
    ///
    /// - Recomputes with the salt and parameters embedded in `password_hash`
    /// - Uses constant-time comparison to prevent timing attacks
    ///
    /// ## Returns
    ///
    /// `Ok(false)` for a wrong password. `HashingFailure` means the stored
    /// hash is corrupt, which is an internal error, not a bad password.
    pub fn verify(&self, password_hash: &str, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| IdentityError::hashing_failure("Invalid password hash format", e))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(IdentityError::hashing_failure(
                "Password verification failed",
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(&PasswordSettings {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("valid test parameters")
    }

    #[test]
    fn test_hash_and_verify_valid_password() {
        let hasher = fast_hasher();
        let hash = hasher.hash("correcthorse").expect("should hash password successfully");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&hash, "correcthorse").expect("should verify successfully"));
    }

    #[test]
    fn test_verify_wrong_password() {
        let hasher = fast_hasher();
        let hash = hasher.hash("correcthorse").expect("should hash password successfully");
        assert!(!hasher.verify(&hash, "wrong").expect("verification should succeed"));
        assert!(!hasher.verify(&hash, "").expect("verification should succeed"));
        assert!(!hasher.verify(&hash, "correcthorse ").expect("verification should succeed"));
    }

    #[test]
    fn test_no_false_positives_across_trials() {
        let hasher = fast_hasher();
        for i in 0..5 {
            let password = format!("password-{i}");
            let hash = hasher.hash(&password).unwrap();
            assert!(hasher.verify(&hash, &password).unwrap());
            assert!(!hasher.verify(&hash, &format!("password-{}", i + 1)).unwrap());
        }
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hasher = fast_hasher();
        let hash1 = hasher.hash("correcthorse").expect("should hash successfully");
        let hash2 = hasher.hash("correcthorse").expect("should hash successfully");
        // Different salts should produce different hashes
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_uses_embedded_parameters() {
        let stored = fast_hasher().hash("correcthorse").unwrap();
        let stronger = PasswordHasher::new(&PasswordSettings {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(stronger.verify(&stored, "correcthorse").unwrap());
    }

    #[test]
    fn test_corrupt_hash_is_hashing_failure() {
        let hasher = fast_hasher();
        let result = hasher.verify("not-a-phc-string", "correcthorse");
        assert!(matches!(result, Err(IdentityError::HashingFailure(_))));
    }

    /// Collects formatted log output for assertions
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_corrupt_hash_failure_is_logged() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, || {
            fast_hasher().verify("not-a-phc-string", "correcthorse")
        });

        assert!(matches!(result, Err(IdentityError::HashingFailure(_))));
        let output = logs.contents();
        assert!(output.contains("ERROR"));
        assert!(output.contains("Invalid password hash format"));
        assert!(!output.contains("correcthorse"));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let result = PasswordHasher::new(&PasswordSettings {
            memory_kib: 1024,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(IdentityError::HashingFailure(_))));
    }
}
