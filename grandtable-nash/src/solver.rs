//! Equilibrium solver port and the gambit-enummixed adapter
//!
//! Level 2 - Phases and Level 3 - Steps

use std::env;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::SolverError;

/// Executable name looked up when no explicit path is configured
pub const GAMBIT_EXECUTABLE: &str = "gambit-enummixed";

/// Synchronous text-in, text-out equilibrium solver
pub trait EquilibriumSolver {
    /// Solve an NFG game, returning the raw solver output
    fn solve(&self, nfg: &str) -> Result<String, SolverError>;
}

/// Runs `gambit-enummixed -q -d2` with the game on stdin
#[derive(Clone, Debug, Default)]
pub struct GambitEnumMixed {
    executable: Option<PathBuf>,
}

impl GambitEnumMixed {
    /// Discover the executable in the current directory, then on PATH
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit executable path
    pub fn with_executable(path: impl Into<PathBuf>) -> Self {
        Self {
            executable: Some(path.into()),
        }
    }

    /// Resolve the executable to run
    pub fn locate(&self) -> Result<PathBuf, SolverError> {
        if let Some(path) = &self.executable {
            return if path.is_file() {
                Ok(path.clone())
            } else {
                Err(SolverError::Unavailable(path.display().to_string()))
            };
        }

        let local = Path::new(".").join(GAMBIT_EXECUTABLE);
        if local.is_file() {
            return Ok(local);
        }

        env::var_os("PATH")
            .and_then(|paths| {
                env::split_paths(&paths)
                    .map(|dir| dir.join(GAMBIT_EXECUTABLE))
                    .find(|candidate| candidate.is_file())
            })
            .ok_or_else(|| SolverError::Unavailable(GAMBIT_EXECUTABLE.to_string()))
    }
}

impl EquilibriumSolver for GambitEnumMixed {
    fn solve(&self, nfg: &str) -> Result<String, SolverError> {
        let executable = self.locate()?;
        tracing::info!("Running {}", executable.display());

        let mut child = Command::new(&executable)
            .args(["-q", "-d2"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SolverError::Invocation(format!("spawn {}: {}", executable.display(), e)))?;

        // Stdin is closed when dropped so the solver sees end of input.
        // A solver that exits early closes the pipe; its exit status says why.
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(nfg.as_bytes()) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                    return Err(SolverError::Invocation(format!("write game: {}", e)));
                }
                _ => {}
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| SolverError::Invocation(format!("wait: {}", e)))?;

        if !output.status.success() {
            return Err(SolverError::Invocation(format!(
                "{} exited with {}: {}",
                executable.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim_end()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_missing_executable() {
        let solver = GambitEnumMixed::with_executable("/nonexistent/gambit-enummixed");
        let err = solver.solve("NFG").unwrap_err();
        assert_eq!(
            err,
            SolverError::Unavailable("/nonexistent/gambit-enummixed".to_string())
        );
        assert!(err.to_string().contains("not found"));
    }

    /// Executable script in its own scratch directory, removed when the guard drops
    #[cfg(unix)]
    fn fake_solver(script: &str) -> (tempfile::TempDir, PathBuf) {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(GAMBIT_EXECUTABLE);
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        (dir, path)
    }

    #[cfg(unix)]
    #[test]
    fn test_solver_process_roundtrip() {
        // Echo the flags, then the game read from stdin
        let (_dir, path) = fake_solver(
            "#!/bin/sh\necho \"$1 $2\"\ncat\necho\necho NE,0.00,1.00,0.00,1.00\n",
        );
        let solver = GambitEnumMixed::with_executable(&path);
        let output = solver.solve("NFG 1 R").unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "-q -d2");
        assert_eq!(lines[1], "NFG 1 R");
        assert_eq!(lines[2], "NE,0.00,1.00,0.00,1.00");

        let (_failing_dir, failing) = fake_solver("#!/bin/sh\ncat > /dev/null\necho 'bad game' >&2\nexit 3\n");
        let err = GambitEnumMixed::with_executable(&failing).solve("x").unwrap_err();
        match err {
            SolverError::Invocation(msg) => assert!(msg.contains("bad game"), "{}", msg),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
