use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an output file.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
}

/// Write `<output>.provenance.json` next to a written document or tool.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(output: P, payload: Payload) -> Result<PathBuf> {
    let output = output.as_ref();
    let path = sidecar_path(output);
    let callsite = Location::caller();
    let record = json!({
        "code_rev": current_git_rev(),
        "geocon": geocon::VERSION,
        "callsite": { "file": callsite.file(), "line": callsite.line() },
        "command": payload.command,
        "params": payload.params,
        "outputs": [output.to_string_lossy()]
    });
    fs::write(&path, serde_json::to_vec_pretty(&record)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".provenance.json");
    output.with_file_name(name)
}

pub fn current_git_rev() -> String {
    if let Some(rev) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return rev.to_string();
    }
    if let Ok(rev) = std::env::var("GIT_COMMIT") {
        if !rev.is_empty() {
            return rev;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_output() {
        let p = sidecar_path(Path::new("/tmp/tools/apex.json"));
        assert_eq!(p, Path::new("/tmp/tools/apex.provenance.json"));
    }

    #[test]
    fn sidecar_records_command_and_output() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("tool.json");
        fs::write(&out, "{}").unwrap();
        let payload = Payload {
            command: "build-tool",
            params: json!({"name": "apex"}),
        };
        let path = write_sidecar(&out, payload).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["command"], "build-tool");
        assert_eq!(parsed["outputs"][0], out.to_string_lossy().as_ref());
    }
}
