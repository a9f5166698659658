use super::{Error, ErrorKind};
use crate::region::Region;
use std::{fmt::Display, path::Path};

pub const DUPLICATE_ENTRY: &str = "duplicate entry";
pub const MISSING_ENTRY: &str = "entry not found";
pub const MALFORMED_DATA: &str = "malformed data";
pub const EMPTY_FIELD: &str = "empty field";
pub const IO_FAILURE: &str = "io failure";
pub const TOO_DEEP: &str = "nesting too deep";

/// Return an [`Error`] explaining that the identifier is already declared in the
/// target scope.
pub fn error_duplicate(identifier: &str) -> Error {
    Error::build(ErrorKind::Duplicate, DUPLICATE_ENTRY).with_help(format!(
        "`{identifier}` is already declared in this scope, \
        delete it first to replace it"
    ))
}

/// Return an [`Error`] explaining that the identifier is not visible from the scope,
/// neither locally nor through any enclosing scope.
pub fn error_not_found(identifier: &str) -> Error {
    Error::build(ErrorKind::NotFound, MISSING_ENTRY).with_help(format!(
        "`{identifier}` is not declared in this scope or any enclosing scope"
    ))
}

/// Return an [`Error`] explaining that the identifier is not declared in the scope
/// itself, which is what a delete requires.
pub fn error_not_local(identifier: &str) -> Error {
    Error::build(ErrorKind::NotFound, MISSING_ENTRY).with_help(format!(
        "`{identifier}` is not declared in this scope, \
        entries in enclosing scopes can only be deleted from those scopes"
    ))
}

/// Return an [`Error`] describing persisted data with the wrong shape.
pub fn error_malformed<T>(detail: T) -> Error
where
    T: Display,
{
    Error::build(ErrorKind::MalformedData, MALFORMED_DATA).with_help(detail.to_string())
}

/// Return an [`Error`] describing a `serde_json` failure, pointing into the source
/// text when the failure has a position.
pub fn error_json(source: &str, err: &serde_json::Error) -> Error {
    let error = error_malformed(strip_position(err));
    if err.line() == 0 {
        return error;
    }

    error.with_pointer(source, Region::at_position(source, err.line(), err.column()))
}

/// Return an [`Error`] explaining that the tree nests more scopes than JSON text
/// can hold.
pub fn error_too_deep(depth: usize, limit: usize) -> Error {
    Error::build(ErrorKind::TooDeep, TOO_DEEP).with_help(format!(
        "scopes nest {depth} levels deep, JSON supports at most {limit}"
    ))
}

/// Return an [`Error`] explaining that a required input field is empty.
pub fn error_empty_field(field: &str) -> Error {
    Error::build(ErrorKind::EmptyField, EMPTY_FIELD)
        .with_help(format!("`{field}` is required and must not be blank"))
}

/// Return an [`Error`] explaining that reading or writing the file failed.
pub fn error_io(path: &Path, err: &std::io::Error) -> Error {
    Error::build(ErrorKind::Io, IO_FAILURE)
        .with_name(path.display().to_string())
        .with_help(err.to_string())
}

/// Return the message of a `serde_json` error without the trailing
/// "at line X column Y", which the pointer already shows.
fn strip_position(err: &serde_json::Error) -> String {
    let message = err.to_string();
    match message.rfind(" at line ") {
        Some(index) if err.line() != 0 => message[..index].to_string(),
        _ => message,
    }
}
