// src/recipe/kitchen/toolchain.rs

//! Toolchain runner: the configure / make / install protocol

use crate::error::{Error, Result};
use crate::platform::HostPlatform;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tracing::{debug, info};

/// Handle returned by a successful configure run
///
/// Later build and install actions run against this handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredToolchain {
    /// Directory holding the `configure` script
    pub configure_dir: PathBuf,
    /// Directory configure ran in (where the Makefiles live)
    pub build_dir: PathBuf,
    /// Arguments passed to configure
    pub args: Vec<String>,
}

/// Captured output of a toolchain action
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs the autotools build protocol
pub trait ToolchainRunner: Send + Sync {
    /// Run `configure` from `configure_dir` inside `build_dir`
    fn configure(
        &self,
        configure_dir: &Path,
        build_dir: &Path,
        args: &[String],
    ) -> Result<(ConfiguredToolchain, CommandOutput)>;

    /// Build (`make`)
    fn make(&self, configured: &ConfiguredToolchain) -> Result<CommandOutput>;

    /// Install (`make install`)
    fn install(&self, configured: &ConfiguredToolchain) -> Result<CommandOutput>;
}

/// Runs configure and make as child processes
///
/// On Windows hosts every command goes through `bash --login -c` with
/// paths translated by the host platform adapter.
#[derive(Debug, Clone)]
pub struct Autotools {
    platform: Arc<dyn HostPlatform>,
    shell: PathBuf,
    jobs: u32,
}

impl Autotools {
    /// Create a runner for the given platform
    ///
    /// `bash` overrides the shell used on Windows hosts; otherwise `bash`
    /// (Windows) or `sh` is looked up on `PATH`.
    pub fn new(platform: Arc<dyn HostPlatform>, bash: Option<PathBuf>, jobs: u32) -> Self {
        let default_shell = if platform.is_windows() { "bash" } else { "sh" };
        let shell = bash
            .filter(|_| platform.is_windows())
            .or_else(|| which::which(default_shell).ok())
            .unwrap_or_else(|| PathBuf::from(default_shell));

        Self {
            platform,
            shell,
            jobs: jobs.max(1),
        }
    }

    pub fn shell(&self) -> &Path {
        &self.shell
    }

    /// Build the shell command line for an action
    pub fn command_line(&self, workdir: &Path, command: &str) -> String {
        if self.platform.is_windows() {
            format!(
                "cd {} && {}",
                shell_quote(&self.platform.toolchain_path(workdir)),
                command
            )
        } else {
            command.to_string()
        }
    }

    /// Shell command invoking `configure` from `configure_dir`
    ///
    /// The script path goes through the platform adapter, so on Windows
    /// hosts the shell sees the subsystem path.
    pub fn configure_command(&self, configure_dir: &Path, args: &[String]) -> String {
        let script = self.platform.toolchain_path(&configure_dir.join("configure"));
        let mut command = shell_quote(&script);
        for arg in args {
            command.push(' ');
            command.push_str(&shell_quote(arg));
        }
        command
    }

    fn run(&self, phase: &str, workdir: &Path, command: &str) -> Result<CommandOutput> {
        info!("Running {} phase", phase);
        let line = self.command_line(workdir, command);
        debug!("Command: {}", line);

        let mut cmd = Command::new(&self.shell);
        if self.platform.is_windows() {
            cmd.arg("--login");
        }
        cmd.arg("-c").arg(&line).current_dir(workdir);

        let output = cmd
            .output()
            .map_err(|e| Error::IoError(format!("Failed to run {} phase: {}", phase, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(Error::CommandFailed {
                phase: phase.to_string(),
                code: output.status.code(),
                stderr,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

impl ToolchainRunner for Autotools {
    fn configure(
        &self,
        configure_dir: &Path,
        build_dir: &Path,
        args: &[String],
    ) -> Result<(ConfiguredToolchain, CommandOutput)> {
        let command = self.configure_command(configure_dir, args);
        let output = self.run("configure", build_dir, &command)?;

        Ok((
            ConfiguredToolchain {
                configure_dir: configure_dir.to_path_buf(),
                build_dir: build_dir.to_path_buf(),
                args: args.to_vec(),
            },
            output,
        ))
    }

    fn make(&self, configured: &ConfiguredToolchain) -> Result<CommandOutput> {
        self.run("make", &configured.build_dir, &format!("make -j{}", self.jobs))
    }

    fn install(&self, configured: &ConfiguredToolchain) -> Result<CommandOutput> {
        self.run("install", &configured.build_dir, "make install")
    }
}

/// Quote a word for a POSIX shell
pub fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:+,@%".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
