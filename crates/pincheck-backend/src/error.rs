//! Backend error taxonomy.

use thiserror::Error;

/// Errors surfaced by a capability backend.
///
/// Every backend call is fallible; probe routines translate these into
/// pass/fail outcomes, so the variants stay close to the observable
/// hardware conditions rather than harness concepts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("pin index {0} out of range")]
    UnknownPin(u32),

    #[error("line {0} already claimed")]
    LineClaimed(u32),

    #[error("line {0} is not claimed")]
    LineNotClaimed(u32),

    #[error("interrupt {0} already bound")]
    InterruptClaimed(u32),

    #[error("interrupt {0} out of range")]
    UnknownInterrupt(u32),

    #[error("device `{0}` not present in boot configuration")]
    UnknownDevice(String),

    #[error("no such boot configuration key `{main}.{sub}`")]
    UnknownKey { main: String, sub: String },

    #[error("handle #{0} is stale or unknown")]
    StaleHandle(u64),

    #[error("state `{0}` not defined for this handle")]
    UnknownState(String),

    #[error("invalid {kind} value {value}")]
    InvalidValue { kind: &'static str, value: u32 },
}

pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_resource() {
        assert_eq!(
            BackendError::LineClaimed(161).to_string(),
            "line 161 already claimed"
        );
        let err = BackendError::UnknownKey {
            main: "card0_boot_para".into(),
            sub: "missing".into(),
        };
        assert!(err.to_string().contains("card0_boot_para.missing"));
    }
}
