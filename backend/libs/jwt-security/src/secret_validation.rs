//! Secret strength validation module
//!
//! Classifies HS256 signing secrets so weak keys are caught at startup
//! instead of at the first signing call.

use thiserror::Error;
use tracing::warn;

const MIN_SECRET_LENGTH: usize = 32; // 256 bits minimum
const RECOMMENDED_SECRET_LENGTH: usize = 64; // 512 bits recommended

/// Secret strength classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStrength {
    /// Weak secret - REJECT in production
    Weak,
    /// Acceptable secret - WARN
    Acceptable,
    /// Strong secret - OK
    Strong,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("signing secret is empty")]
    Empty,

    #[error("signing secret is too weak (min 32 bytes, no obvious patterns)")]
    TooWeak,
}

/// Validate secret strength for HS256/HS512
///
/// **Criteria**:
/// - Minimum 32 bytes (256 bits)
/// - Recommended 64 bytes (512 bits)
/// - Shannon entropy > 4.0 bits/byte
/// - No obvious patterns (repeating characters, sequential)
pub fn validate_secret_strength(secret: &str) -> SecretStrength {
    let bytes = secret.as_bytes();

    if bytes.len() < MIN_SECRET_LENGTH {
        return SecretStrength::Weak;
    }

    let entropy = calculate_shannon_entropy(bytes);
    if entropy < 4.0 {
        return SecretStrength::Weak;
    }

    if has_obvious_patterns(bytes) {
        return SecretStrength::Weak;
    }

    if bytes.len() >= RECOMMENDED_SECRET_LENGTH && entropy >= 5.0 {
        SecretStrength::Strong
    } else {
        SecretStrength::Acceptable
    }
}

/// Startup gate for a signing secret.
///
/// An empty secret is always rejected. A weak secret is rejected when
/// `enforce` is set (production/staging) and only logged otherwise.
pub fn ensure_signing_secret(secret: &str, enforce: bool) -> Result<SecretStrength, SecretError> {
    if secret.is_empty() {
        return Err(SecretError::Empty);
    }

    let strength = validate_secret_strength(secret);
    match strength {
        SecretStrength::Weak if enforce => return Err(SecretError::TooWeak),
        SecretStrength::Weak => {
            warn!("Signing secret is weak - acceptable for development only");
        }
        SecretStrength::Acceptable => {
            warn!(
                recommended_bytes = RECOMMENDED_SECRET_LENGTH,
                "Signing secret is shorter than recommended"
            );
        }
        SecretStrength::Strong => {}
    }

    Ok(strength)
}

/// Calculate Shannon entropy of byte sequence
///
/// Returns bits per byte (0-8 scale)
fn calculate_shannon_entropy(data: &[u8]) -> f64 {
    let mut freq = [0u32; 256];
    let len = data.len() as f64;

    for &byte in data {
        freq[byte as usize] += 1;
    }

    freq.iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Detect runs like "aaaa" or "1234"
fn has_obvious_patterns(data: &[u8]) -> bool {
    let mut same_run = 1;
    let mut seq_run = 1;

    for window in data.windows(2) {
        same_run = if window[0] == window[1] { same_run + 1 } else { 1 };
        seq_run = if i16::from(window[1]) - i16::from(window[0]) == 1 {
            seq_run + 1
        } else {
            1
        };

        if same_run >= 4 || seq_run >= 4 {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRONG: &str =
        "q8Zr!vT2#mLx9@Wp4$kNs7&Gd1^Hb6*Yc3(Ej5)Uf0-Ra8+Ow2=Ql7~Ii4?Jz9<Ke1";

    #[test]
    fn test_weak_secret_too_short() {
        assert_eq!(validate_secret_strength("short"), SecretStrength::Weak);
    }

    #[test]
    fn test_weak_secret_low_entropy() {
        let weak = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        assert_eq!(validate_secret_strength(weak), SecretStrength::Weak);
    }

    #[test]
    fn test_weak_secret_sequential_run() {
        let weak = "x9Qm2Lr7Vt4Kp8Zn1Wb6Hj3abcdYs5Fg";
        assert_eq!(validate_secret_strength(weak), SecretStrength::Weak);
    }

    #[test]
    fn test_acceptable_secret() {
        let secret = "x9Qm2Lr7Vt4Kp8Zn1Wb6Hj3Ys5Fg0Dc!";
        assert_eq!(validate_secret_strength(secret), SecretStrength::Acceptable);
    }

    #[test]
    fn test_strong_secret() {
        assert_eq!(validate_secret_strength(STRONG), SecretStrength::Strong);
    }

    #[test]
    fn test_empty_secret_always_rejected() {
        assert_eq!(ensure_signing_secret("", false), Err(SecretError::Empty));
        assert_eq!(ensure_signing_secret("", true), Err(SecretError::Empty));
    }

    #[test]
    fn test_weak_secret_only_rejected_when_enforced() {
        assert_eq!(
            ensure_signing_secret("dev-secret", false),
            Ok(SecretStrength::Weak)
        );
        assert_eq!(
            ensure_signing_secret("dev-secret", true),
            Err(SecretError::TooWeak)
        );
    }
}
