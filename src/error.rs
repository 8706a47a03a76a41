/// Broad category of an [`AppError`].
///
/// `DataLoad` and `Resolution` are the two domain failures; the other kinds
/// cover the binary's own surface (arguments, terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A fetch or parse failed while loading summary, product, index or series data.
    DataLoad,
    /// A requested product or its series could not be found.
    Resolution,
    /// Bad arguments or paths supplied by the user.
    Usage,
    /// Raw mode, alternate screen or drawing failed.
    Terminal,
}

impl ErrorKind {
    fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Usage => 2,
            ErrorKind::Resolution => 3,
            ErrorKind::DataLoad | ErrorKind::Terminal => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            exit_code: kind.exit_code(),
            message: message.into(),
        }
    }

    pub fn data_load(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DataLoad, message)
    }

    pub fn resolution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Resolution, message)
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Usage, message)
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Terminal, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::usage("x").exit_code(), 2);
        assert_eq!(AppError::resolution("x").exit_code(), 3);
        assert_eq!(AppError::data_load("x").exit_code(), 4);
        assert_eq!(AppError::terminal("x").exit_code(), 4);
    }

    #[test]
    fn display_is_message_only() {
        let err = AppError::data_load("productos.json: unexpected EOF");
        assert_eq!(err.to_string(), "productos.json: unexpected EOF");
        assert_eq!(err.kind(), ErrorKind::DataLoad);
    }
}
