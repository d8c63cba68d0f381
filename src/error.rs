use std::{error, fmt};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Filter rule text is not a well-formed selector list.
    MalformedRule,
    /// Topic template text cannot be compiled.
    TemplateCompile,
    /// A template looked up a label the series doesn't carry.
    MissingLabel,
    /// Any other template evaluation failure (bad substring bounds, empty topic).
    TemplateEval,
    /// The serialization schema is missing or malformed.
    SchemaLoad,
    /// A sample couldn't be encoded.
    Encode,
    Other,
}

pub struct Error {
    kind: ErrorKind,
    message: String,
    source: Option<Box<dyn error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(message: &str) -> Self {
        Self::with_kind(ErrorKind::Other, message)
    }

    pub fn with_kind(kind: ErrorKind, message: &str) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unexpected error ({:?}): {}", self.kind, self)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(err) => write!(f, "{}. Source error: {}", self.message, err),
            None => write!(f, "{}", self.message),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.source {
            Some(ref err) => Some(&**err),
            None => None,
        }
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Self {
            kind: ErrorKind::Other,
            message,
            source: None,
        }
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl<E: error::Error + Send + Sync + 'static> From<(String, E)> for Error {
    fn from((message, err): (String, E)) -> Self {
        Self {
            kind: ErrorKind::Other,
            message,
            source: Some(Box::new(err)),
        }
    }
}

impl<E: error::Error + Send + Sync + 'static> From<(&str, E)> for Error {
    fn from((message, err): (&str, E)) -> Self {
        Self {
            kind: ErrorKind::Other,
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }
}

impl<E: error::Error + Send + Sync + 'static> From<(ErrorKind, &str, E)> for Error {
    fn from((kind, message, err): (ErrorKind, &str, E)) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        format!("{}", err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
