use std::fmt::Display;

/// What happens to a failed database round trip.
///
/// `Lenient` logs the failure and hands back the operation's default
/// value, so callers only see it in the logs. `Strict` hands the error
/// back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Policy {
    #[default]
    Lenient,
    Strict,
}

impl Policy {
    /// Routes an outcome through the policy, using `fallback` when a
    /// lenient failure is swallowed.
    pub fn settle<T, E: Display>(self, result: Result<T, E>, fallback: T) -> Result<T, E> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                log::error!("{}", e);
                match self {
                    Self::Lenient => Ok(fallback),
                    Self::Strict => Err(e),
                }
            }
        }
    }
    pub fn is_strict(self) -> bool {
        self == Self::Strict
    }
}

impl From<bool> for Policy {
    fn from(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Lenient }
    }
}
