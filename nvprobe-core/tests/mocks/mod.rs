//! Mock infrastructure for testing
//!
//! Provides a scripted command runner that plays back canned `which` and
//! `nvidia-smi` output.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use nvprobe_core::locate::LOCATOR;
use nvprobe_core::runner::{CommandOutput, CommandRunner};
use nvprobe_core::NvprobeError;

/// Where the scripted locator says nvidia-smi lives
pub const SMI_PATH: &str = "/usr/bin/nvidia-smi";

/// Default `nvidia-smi` report with the given driver version string
pub fn smi_report(driver: &str) -> String {
    format!(
        "\
Tue Oct 14 09:12:44 2025
+-----------------------------------------------------------------------------------------+
| NVIDIA-SMI 550.54.14              Driver Version: {driver}      CUDA Version: 12.4     |
|-----------------------------------------+------------------------+----------------------+
| GPU  Name                 Persistence-M | Bus-Id          Disp.A | Volatile Uncorr. ECC |
|=========================================+========================+======================|
|   0  NVIDIA GeForce RTX 3080        Off |   00000000:01:00.0  On |                  N/A |
+-----------------------------------------+------------------------+----------------------+
"
    )
}

/// Plays back canned output keyed by program and arguments
///
/// Unscripted invocations fail to spawn, like a missing binary would.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<(String, Vec<String>), CommandOutput>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `program args...` with `output`
    pub fn on(mut self, program: &str, args: &[&str], output: CommandOutput) -> Self {
        self.responses.insert(
            (
                program.to_string(),
                args.iter().map(|a| a.to_string()).collect(),
            ),
            output,
        );
        self
    }

    /// Locator finds nvidia-smi at [`SMI_PATH`]
    pub fn with_smi(self) -> Self {
        self.on(
            LOCATOR,
            &["nvidia-smi"],
            CommandOutput::ok(format!("{}\n", SMI_PATH)),
        )
    }

    /// nvidia-smi reports `driver` and lists `listing` for `-L`
    pub fn host(driver: &str, listing: &str) -> Self {
        Self::new()
            .with_smi()
            .on(SMI_PATH, &[], CommandOutput::ok(smi_report(driver)))
            .on(SMI_PATH, &["-L"], CommandOutput::ok(listing))
    }

    /// Every invocation so far, as `program arg...`
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str]) -> nvprobe_core::Result<CommandOutput> {
        let mut call = program.to_string();
        for arg in args {
            call.push(' ');
            call.push_str(arg);
        }
        self.calls.borrow_mut().push(call);

        let key = (
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect::<Vec<_>>(),
        );
        self.responses
            .get(&key)
            .cloned()
            .ok_or_else(|| NvprobeError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not scripted"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unscripted_call_fails_to_spawn() {
        let runner = ScriptedRunner::new();
        assert!(runner.run("anything", &[]).is_err());
        assert_eq!(runner.calls(), vec!["anything"]);
    }

    #[test]
    fn test_smi_report_contains_driver_line() {
        assert!(smi_report("535.104.05").contains("Driver Version: 535.104.05"));
    }
}
