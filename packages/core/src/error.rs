//! Building JSON:API error documents.
//!
//! Application failures reach this module as [`ApiError`] tuples — code,
//! title, detail, source, status — and leave as the `errors` array of a
//! [`Document`]. [`ErrorKind`] catalogues the recognised application-error
//! kinds with their HTTP status and default title/detail pair; every field
//! can be overridden per error.
//!
//! The resolution/assembly core never produces these itself: translating
//! domain failures into error tuples is the caller's job. This module only
//! renders them.

use serde_json::json;

use crate::types::{Document, ErrorObject, Object};

/// Well-known application error codes.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";
}

/// The recognised application-error kinds, one per HTTP status the error
/// path produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    PaymentRequired,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    ContentTooLarge,
    UnsupportedMediaType,
    UnprocessableContent,
    Locked,
    InternalServerError,
}

impl ErrorKind {
    /// The HTTP status code for this kind.
    pub fn status(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::PaymentRequired => 402,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::MethodNotAllowed => 405,
            ErrorKind::NotAcceptable => 406,
            ErrorKind::ContentTooLarge => 413,
            ErrorKind::UnsupportedMediaType => 415,
            ErrorKind::UnprocessableContent => 422,
            ErrorKind::Locked => 423,
            ErrorKind::InternalServerError => 500,
        }
    }

    /// The default error title.
    pub fn title(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::PaymentRequired => "Payment Required",
            ErrorKind::Forbidden => "Access Denied",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::MethodNotAllowed => "Method Not Allowed",
            ErrorKind::NotAcceptable => "Not Acceptable",
            ErrorKind::ContentTooLarge => "Content Too Large",
            ErrorKind::UnsupportedMediaType => "Unsupported Media Type",
            ErrorKind::UnprocessableContent => "Unprocessable Content",
            ErrorKind::Locked => "Locked",
            ErrorKind::InternalServerError => "Internal Server Error",
        }
    }

    /// The default error detail, when this kind has one.
    pub fn detail(&self) -> Option<&'static str> {
        match self {
            ErrorKind::BadRequest => None,
            ErrorKind::Unauthorized => Some("The request requires authentication."),
            ErrorKind::PaymentRequired => {
                Some("A payment is required to access the resource.")
            }
            ErrorKind::Forbidden => Some("No access to the requested resource."),
            ErrorKind::NotFound => Some("The requested resource could not be found."),
            ErrorKind::MethodNotAllowed => {
                Some("The method is not supported for this route.")
            }
            ErrorKind::NotAcceptable => {
                Some("Cannot produce a response matching the acceptable values.")
            }
            ErrorKind::ContentTooLarge => Some("The request entity is too large."),
            ErrorKind::UnsupportedMediaType => Some("The media type is not supported."),
            ErrorKind::UnprocessableContent => Some("The request can't be processed."),
            ErrorKind::Locked => Some("The requested resource is locked."),
            ErrorKind::InternalServerError => None,
        }
    }
}

/// One application error on its way to an `errors` array.
///
/// Every field is optional; unset (or empty-string) fields are omitted from
/// the rendered error object. `status` is handled as an integer here and
/// coerced to a string on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiError {
    pub code: Option<String>,
    pub status: Option<u16>,
    pub title: Option<String>,
    pub detail: Option<String>,
    pub source: Option<Object>,
    pub meta: Option<Object>,
}

impl ApiError {
    /// An error pre-filled with a kind's status and default title/detail.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            status: Some(kind.status()),
            title: Some(kind.title().to_string()),
            detail: kind.detail().map(str::to_string),
            ..Self::default()
        }
    }

    /// A fully blank error; set only the fields you want rendered.
    pub fn bare() -> Self {
        Self::default()
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Point at the field that caused this error: `source: {"pointer": ...}`.
    pub fn pointer(mut self, field: impl Into<String>) -> Self {
        let mut source = Object::new();
        source.insert("pointer".into(), json!(field.into()));
        self.source = Some(source);
        self
    }

    pub fn source(mut self, source: Object) -> Self {
        self.source = Some(source);
        self
    }

    pub fn meta(mut self, meta: Object) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Render to the wire shape, dropping unset and empty fields.
    pub fn to_object(&self) -> ErrorObject {
        ErrorObject {
            code: self.code.clone().filter(|c| !c.is_empty()),
            status: self.status.map(|s| s.to_string()),
            source: self.source.clone().filter(|s| !s.is_empty()),
            title: self.title.clone().filter(|t| !t.is_empty()),
            detail: self.detail.clone().filter(|d| !d.is_empty()),
            meta: self.meta.clone().filter(|m| !m.is_empty()),
        }
    }

    /// Render a single-error document.
    pub fn into_document(self) -> Document {
        error_document([self])
    }
}

impl From<ErrorKind> for ApiError {
    fn from(kind: ErrorKind) -> Self {
        ApiError::new(kind)
    }
}

/// Build an errors document from one or more errors.
///
/// The `errors` array is the document's only payload — `data` is never set
/// alongside it. Callers must supply at least one error; an empty iterator
/// produces a document that [`validate_document`](crate::validate_document)
/// rejects.
pub fn error_document<I>(errors: I) -> Document
where
    I: IntoIterator<Item = ApiError>,
{
    Document {
        errors: Some(errors.into_iter().map(|e| e.to_object()).collect()),
        ..Document::default()
    }
}

/// Convert field-keyed validation failures (field name → first message)
/// into one 422 error per field, each carrying `source: {"pointer": field}`.
pub fn validation_errors<I, K, V>(failures: I) -> Vec<ApiError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    failures
        .into_iter()
        .map(|(field, message)| {
            ApiError::bare()
                .code(codes::VALIDATION_ERROR)
                .status(ErrorKind::UnprocessableContent.status())
                .title("Validation error")
                .detail(message)
                .pointer(field)
        })
        .collect()
}

/// Map an unexpected failure to a generic 500.
///
/// Without debug mode the message is suppressed entirely; with it, the
/// message is attached as `detail` and under `meta` for diagnostics.
pub fn internal_error(message: impl Into<String>, debug: bool) -> ApiError {
    let error = ApiError::new(ErrorKind::InternalServerError).code(codes::UNKNOWN_ERROR);
    if !debug {
        return error;
    }
    let message = message.into();
    let mut meta = Object::new();
    meta.insert("message".into(), json!(message));
    error.detail(message).meta(meta)
}

// --- tests -------------------------------------------------------------------
