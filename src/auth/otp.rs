//! Sources of the one-time code for passwordless login.

use std::io::{self, BufRead, Write};

/// Supplies the one-time code emailed during passwordless login.
///
/// Implemented for any `Fn(&str) -> Option<String>`; returning `None` means
/// no code could be obtained.
pub trait OtpProvider: Send + Sync {
    /// Obtain the code sent to `email`.
    fn one_time_code(&self, email: &str) -> Option<String>;
}

impl<F> OtpProvider for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn one_time_code(&self, email: &str) -> Option<String> {
        self(email)
    }
}

/// Asks for the code on stdin.
///
/// The read blocks; login calls providers on Tokio's blocking pool, so this
/// does not stall the runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePrompt;

impl OtpProvider for ConsolePrompt {
    fn one_time_code(&self, email: &str) -> Option<String> {
        print!("Enter the code sent to {email}: ");
        io::stdout().flush().ok()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok()?;
        let code = line.trim();
        (!code.is_empty()).then(|| code.to_string())
    }
}

/// Where the one-time code comes from.
///
/// # Example
///
/// ```
/// use fennel_invest::auth::OtpSource;
///
/// // Resume a login whose code already arrived by email.
/// let source = OtpSource::code("123456");
/// assert!(source.has_code());
///
/// // Ask via a closure.
/// let source = OtpSource::provider(|_email: &str| Some("123456".to_string()));
/// assert!(!source.has_code());
/// ```
pub enum OtpSource {
    /// A code the caller already has; the start request is not re-sent
    Code(String),
    /// Ask a provider after the start request has been sent
    Provider(Box<dyn OtpProvider>),
    /// The caller cannot supply a code now; send the code and fail fast
    Unavailable,
}

impl OtpSource {
    /// A code the caller already has.
    pub fn code(code: impl Into<String>) -> Self {
        OtpSource::Code(code.into())
    }

    /// Obtain the code from `provider`.
    pub fn provider(provider: impl OtpProvider + 'static) -> Self {
        OtpSource::Provider(Box::new(provider))
    }

    /// Prompt on the console.
    pub fn console() -> Self {
        Self::provider(ConsolePrompt)
    }

    /// Returns `true` if a code is already in hand.
    pub fn has_code(&self) -> bool {
        matches!(self, OtpSource::Code(_))
    }
}

impl std::fmt::Debug for OtpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OtpSource::Code(_) => f.write_str("Code([REDACTED])"),
            OtpSource::Provider(_) => f.write_str("Provider"),
            OtpSource::Unavailable => f.write_str("Unavailable"),
        }
    }
}
