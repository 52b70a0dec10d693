//! Integration tests for nvidia-smi discovery and parsing

mod mocks;

use mocks::{smi_report, ScriptedRunner, SMI_PATH};
use nvprobe_core::locate::{find_command, LOCATOR};
use nvprobe_core::runner::CommandOutput;
use nvprobe_core::{DriverVersion, Enumeration, GpuRecord, NvprobeError, SmiProbe};
use std::path::PathBuf;

const TWO_GPUS: &str = "\
GPU 0: GeForce RTX 3080 (UUID: GPU-1234abcd)
GPU 1: Tesla T4 (UUID: GPU-5678-ef90)
";

#[test]
fn test_find_command_uses_locator() {
    let runner = ScriptedRunner::new().with_smi();
    assert_eq!(
        find_command(&runner, "nvidia-smi"),
        Some(PathBuf::from(SMI_PATH))
    );
    assert_eq!(runner.calls(), vec![format!("{} nvidia-smi", LOCATOR)]);
}

#[test]
fn test_tool_absent_yields_nothing() {
    let runner = ScriptedRunner::new().on(LOCATOR, &["nvidia-smi"], CommandOutput::failed(1, ""));
    let probe = SmiProbe::new(&runner);

    let enumeration = probe.enumerate_gpus();
    assert!(enumeration.driver.is_none());
    assert!(enumeration.is_empty());
    // nvidia-smi itself is never invoked
    assert_eq!(runner.calls().len(), 1);

    assert!(matches!(
        probe.try_enumerate_gpus(),
        Err(NvprobeError::CommandNotFound(_))
    ));
}

#[test]
fn test_enumerates_gpus() {
    let runner = ScriptedRunner::host("535.104.05", TWO_GPUS);
    let enumeration = SmiProbe::new(&runner).enumerate_gpus();

    assert_eq!(enumeration.driver, Some(DriverVersion::new(535, 104)));
    assert_eq!(
        enumeration.gpus,
        vec![
            GpuRecord::new(0, "GeForce RTX 3080", "GPU-1234abcd"),
            GpuRecord::new(1, "Tesla T4", "GPU-5678-ef90"),
        ]
    );
    assert_eq!(
        runner.calls(),
        vec![
            format!("{} nvidia-smi", LOCATOR),
            SMI_PATH.to_string(),
            format!("{} -L", SMI_PATH),
        ]
    );
}

#[test]
fn test_old_driver_is_gated() {
    let runner = ScriptedRunner::host("440.10", TWO_GPUS);
    let probe = SmiProbe::new(&runner);

    let enumeration = probe.enumerate_gpus();
    assert_eq!(enumeration.driver, Some(DriverVersion::new(440, 10)));
    assert!(enumeration.gpus.is_empty());
    // The listing is never requested
    assert!(!runner.calls().iter().any(|c| c.ends_with("-L")));

    match probe.try_enumerate_gpus() {
        Err(NvprobeError::UnsupportedDriver { major, minor }) => {
            assert_eq!((major, minor), (440, 10));
        }
        other => panic!("expected UnsupportedDriver, got {:?}", other),
    }
}

#[test]
fn test_driver_450_proceeds() {
    let runner = ScriptedRunner::host("450.00", TWO_GPUS);
    let enumeration = SmiProbe::new(&runner).enumerate_gpus();
    assert_eq!(enumeration.driver, Some(DriverVersion::new(450, 0)));
    assert_eq!(enumeration.gpus.len(), 2);
}

#[test]
fn test_smi_failure_yields_nothing() {
    let runner = ScriptedRunner::new().with_smi().on(
        SMI_PATH,
        &[],
        CommandOutput::failed(
            9,
            "NVIDIA-SMI has failed because it couldn't communicate with the NVIDIA driver.",
        ),
    );
    let probe = SmiProbe::new(&runner);

    assert_eq!(probe.enumerate_gpus(), Enumeration::default());
    let err = probe.try_enumerate_gpus().unwrap_err();
    assert!(matches!(err, NvprobeError::CommandFailed { code: Some(9), .. }));
}

#[test]
fn test_missing_driver_line_yields_nothing() {
    let runner = ScriptedRunner::new()
        .with_smi()
        .on(SMI_PATH, &[], CommandOutput::ok("No devices were found\n"));
    let probe = SmiProbe::new(&runner);

    assert_eq!(probe.enumerate_gpus(), Enumeration::default());
    assert!(matches!(
        probe.try_enumerate_gpus(),
        Err(NvprobeError::Parse(_))
    ));
}

#[test]
fn test_listing_failure_keeps_stderr() {
    let runner = ScriptedRunner::new()
        .with_smi()
        .on(SMI_PATH, &[], CommandOutput::ok(smi_report("470.57.02")))
        .on(SMI_PATH, &["-L"], CommandOutput::failed(2, "Unable to determine the device handle\n"));
    let probe = SmiProbe::new(&runner);

    assert!(probe.enumerate_gpus().gpus.is_empty());
    let msg = probe.try_enumerate_gpus().unwrap_err().to_string();
    assert!(msg.contains("failed to list up available GPUs"));
    assert!(msg.contains("Unable to determine the device handle"));
}

#[test]
fn test_malformed_listing_line_is_kept_as_unknown() {
    let listing = "GPU 0: GeForce RTX 3080 (UUID: GPU-1234abcd)\nGPU 1: GeForce RTX 3080\n";
    let runner = ScriptedRunner::host("535.54", listing);
    let gpus = SmiProbe::new(&runner).enumerate_gpus().gpus;

    assert_eq!(gpus.len(), 2);
    assert_eq!(gpus[1], GpuRecord::unknown());
}

#[test]
fn test_custom_command_name() {
    let runner = ScriptedRunner::new()
        .on(LOCATOR, &["nvidia-smi-570"], CommandOutput::ok("/opt/nv/nvidia-smi\n"))
        .on("/opt/nv/nvidia-smi", &[], CommandOutput::ok(smi_report("570.86.16")))
        .on("/opt/nv/nvidia-smi", &["-L"], CommandOutput::ok(TWO_GPUS));
    let probe = SmiProbe::new(&runner).with_command("nvidia-smi-570");

    assert_eq!(probe.command(), "nvidia-smi-570");
    assert_eq!(probe.enumerate_gpus().gpus.len(), 2);
}
