//! Integration tests for error handling in jal-runtime

use jal_runtime::RuntimeError;

#[test]
fn test_invalid_value_error_message() {
    let error = RuntimeError::invalid_value("uint16", "70000 overflows 16 bits");

    let error_msg = error.to_string();
    assert!(error_msg.contains("Invalid uint16 value"));
    assert!(error_msg.contains("70000 overflows 16 bits"));
}

#[test]
fn test_unsupported_conversion_error_message() {
    let error = RuntimeError::unsupported_conversion("mina:signature", "mina:field");

    let error_msg = error.to_string();
    assert!(error_msg.contains("Unsupported conversion"));
    assert!(error_msg.contains("mina:signature -> mina:field"));
}

#[test]
fn test_path_conflict_error_message() {
    let error = RuntimeError::path_conflict("private.name");
    assert_eq!(error.to_string(), "Path conflict at private.name");
}

#[test]
fn test_invalid_link_error_message() {
    let error = RuntimeError::InvalidLink("uint64".to_string());
    assert!(error.to_string().contains("uint64"));
}

#[test]
fn test_unknown_node_type_error_message() {
    let error = RuntimeError::UnknownNodeType("mina:group".to_string());
    assert!(error.to_string().contains("Unknown conversion node type"));
}

#[test]
fn test_empty_errors_messages() {
    assert_eq!(RuntimeError::EmptyChain.to_string(), "Conversion chain must not be empty");
    assert_eq!(RuntimeError::EmptyPath.to_string(), "Path must not be empty");
}

#[test]
fn test_error_is_std_error() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&RuntimeError::EmptyChain);
}
