//! Handling of TLS certificate validation errors.
//!
//! The default rejects invalid certificates. Proceeding anyway must be
//! requested explicitly, through `[tls] ignore_certificate_errors` or the
//! `--ignore-certificate-errors` flag. Servo exposes the behavior as an
//! engine option, applied by [`CertificatePolicy::apply`].

use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CertificatePolicy {
    #[default]
    Reject,
    /// Every certificate error proceeds; no load is ever cancelled for one.
    Proceed,
}

impl CertificatePolicy {
    pub fn from_flag(ignore_certificate_errors: bool) -> Self {
        if ignore_certificate_errors {
            Self::Proceed
        } else {
            Self::Reject
        }
    }

    /// Writes the policy into the engine options.
    pub fn apply(self, opts: &mut servo::Opts) {
        opts.ignore_certificate_errors = self == Self::Proceed;
        if opts.ignore_certificate_errors {
            warn!("⚠️  TLS certificate validation is DISABLED for all pages");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keeps_validation_on() {
        let mut opts = servo::Opts::default();
        CertificatePolicy::default().apply(&mut opts);
        assert!(!opts.ignore_certificate_errors);
    }

    #[test]
    fn test_flag_maps_to_policy() {
        assert_eq!(CertificatePolicy::from_flag(true), CertificatePolicy::Proceed);
        assert_eq!(CertificatePolicy::from_flag(false), CertificatePolicy::Reject);
    }

    #[test]
    fn test_apply_sets_engine_option() {
        let mut opts = servo::Opts::default();
        CertificatePolicy::Proceed.apply(&mut opts);
        assert!(opts.ignore_certificate_errors);

        CertificatePolicy::Reject.apply(&mut opts);
        assert!(!opts.ignore_certificate_errors);
    }
}
