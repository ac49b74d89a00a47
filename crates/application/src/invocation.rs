use serde::Serialize;
use veritrail_core::{AppError, AppResult};

/// Logical request: a function name and its ordered string arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    function: String,
    args: Vec<String>,
}

impl Invocation {
    /// Creates an invocation.
    #[must_use]
    pub fn new(function: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            function: function.into(),
            args,
        }
    }

    /// Returns the function name.
    #[must_use]
    pub fn function(&self) -> &str {
        self.function.as_str()
    }

    /// Returns the ordered arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        self.args.as_slice()
    }
}

/// Success payload of an invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload(Vec<u8>);

impl Payload {
    /// Returns the empty payload.
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Wraps raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Wraps a UTF-8 text payload.
    #[must_use]
    pub fn text(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }

    /// Encodes a value as a JSON payload.
    pub fn json<T: Serialize>(value: &T) -> AppResult<Self> {
        serde_json::to_vec(value)
            .map(Self)
            .map_err(|error| AppError::Internal(format!("failed to encode payload: {error}")))
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Returns the payload as text, replacing invalid UTF-8.
    #[must_use]
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(self.0.as_slice()).into_owned()
    }

    /// Returns whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Closed set of functions a service dispatches on.
pub trait ServiceFunction: Copy + Sized + 'static {
    /// Service name used in error messages.
    const SERVICE: &'static str;

    /// Static table mapping wire names to functions.
    const TABLE: &'static [(&'static str, Self)];

    /// Resolves a wire name, rejecting unknown names.
    fn from_name(name: &str) -> AppResult<Self> {
        Self::TABLE
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, function)| *function)
            .ok_or_else(|| {
                AppError::InvalidFunction(format!(
                    "'{name}' is not a function of the {} service",
                    Self::SERVICE
                ))
            })
    }
}

/// Checks the argument count and borrows the arguments as a fixed array.
///
/// `expecting` names the arguments for the error message.
pub fn expect_arity<'a, const N: usize>(
    args: &'a [String],
    expecting: &str,
) -> AppResult<[&'a str; N]> {
    if args.len() != N {
        return Err(AppError::Argument(format!(
            "incorrect number of arguments: got {}, expecting {expecting}",
            args.len()
        )));
    }

    Ok(std::array::from_fn(|index| args[index].as_str()))
}
