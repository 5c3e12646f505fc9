use instance_core::error::ProtocolError;
use instance_core::protocol::ActivationMessage;

use std::io::{Error as IoError, ErrorKind};

/// **VALUE**: Verifies malformed-line errors point at the call site and quote the payload.
///
/// **WHY THIS MATTERS**: The server only logs these, so the log line is all there is.
///
/// **BUG THIS CATCHES**: Would catch removing `#[track_caller]` from `from_line` (the
/// location would then point into the library instead of this file).
#[test]
fn given_unknown_line_when_parsed_then_error_names_payload_and_caller() {
    let err = ActivationMessage::from_line("Shutdown\n").expect_err("unknown message");

    let error_string = err.to_string();

    assert!(error_string.starts_with("Malformed Message Error:"));
    assert!(error_string.contains("'Shutdown'"));
    assert!(error_string.contains("integration_tests"));
}

/// **VALUE**: Verifies I/O errors convert with a location.
#[test]
fn given_io_error_when_converted_then_io_variant_with_location() {
    let err = ProtocolError::from(IoError::new(ErrorKind::UnexpectedEof, "eof"));

    assert!(matches!(err, ProtocolError::Io { .. }));
    assert!(err.to_string().contains("eof"));
    assert!(err.to_string().contains("integration_tests"));
}
