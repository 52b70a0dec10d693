//! Integration tests for error handling

use nvprobe_core::error::{NvprobeError, ResultExt};
use nvprobe_core::DriverVersion;

#[test]
fn test_error_context_chaining() {
    let base_error = NvprobeError::parse("no driver line");
    let with_context = base_error.with_context("Reading nvidia-smi output");

    let msg = format!("{}", with_context);
    assert!(msg.contains("Reading nvidia-smi output"));
    assert!(msg.contains("no driver line"));
}

#[test]
fn test_error_context_preserves_hint() {
    let base_error = NvprobeError::dataset("overlap");
    let hint_before = base_error.user_hint();

    let with_context = base_error.with_context("Loading dataset");
    let hint_after = with_context.user_hint();

    assert_eq!(hint_before, hint_after);
}

#[test]
fn test_result_ext_context() {
    let result: Result<(), NvprobeError> = Err(NvprobeError::not_found("nvidia-smi"));
    let with_context = result.context("Probing GPUs");

    let err = with_context.unwrap_err();
    assert!(format!("{}", err).starts_with("Probing GPUs: "));
}

#[test]
fn test_user_hints() {
    let err = NvprobeError::not_found("nvidia-smi");
    assert!(err.user_hint().unwrap().contains("NVIDIA driver"));

    let err = NvprobeError::UnsupportedDriver {
        major: 440,
        minor: 10,
    };
    assert!(err.user_hint().unwrap().contains("Update"));

    let err = NvprobeError::config("test");
    assert!(err.user_hint().unwrap().contains("config.toml"));

    assert!(NvprobeError::parse("test").user_hint().is_none());
}

#[test]
fn test_user_recoverable() {
    assert!(NvprobeError::not_found("nvidia-smi").is_user_recoverable());
    assert!(NvprobeError::UnsupportedDriver { major: 390, minor: 0 }.is_user_recoverable());
    assert!(NvprobeError::dataset("test").is_user_recoverable());
    assert!(NvprobeError::config("test").is_user_recoverable());

    assert!(!NvprobeError::parse("test").is_user_recoverable());
}

#[test]
fn test_error_display_format() {
    let err = NvprobeError::not_found("nvidia-smi");
    assert_eq!(format!("{}", err), "Command not found: nvidia-smi");

    let err = NvprobeError::UnsupportedDriver {
        major: 440,
        minor: 10,
    };
    assert_eq!(
        format!("{}", err),
        "Unsupported NVIDIA driver 440.10: driver must be 450.xx or newer"
    );

    let err = NvprobeError::CommandFailed {
        program: "nvidia-smi".to_string(),
        code: None,
        stderr: String::new(),
    };
    assert_eq!(format!("{}", err), "'nvidia-smi' returned code <signal>");
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: NvprobeError = io.into();
    assert!(matches!(err, NvprobeError::Io(_)));
    assert!(err.user_hint().unwrap().contains("readable"));
    assert!(err.is_user_recoverable());
}

#[test]
fn test_unsupported_driver_pads_minor_like_driver_version() {
    let err = NvprobeError::UnsupportedDriver { major: 450, minor: 0 };
    let version = DriverVersion::new(450, 0);

    assert_eq!(
        format!("{}", err),
        "Unsupported NVIDIA driver 450.00: driver must be 450.xx or newer"
    );
    assert!(format!("{}", err).contains(&version.to_string()));

    let err = NvprobeError::UnsupportedDriver { major: 390, minor: 7 };
    assert!(format!("{}", err).contains("390.07"));
}
