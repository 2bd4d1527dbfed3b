use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{GuardError, Result};
use crate::ir::{IntentFilter, PackageFacts};

static USES_PERMISSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^uses-permission(?:-sdk-23)?:\s*name='([^']+)'").unwrap()
});

static LAUNCHABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^launchable-activity:\s*name='([^']+)'").unwrap());

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Extracts facts by running `aapt dump badging` from the Android build tools.
///
/// Malformed or hostile packages can hang the tool, so every run is bounded
/// by `timeout` and the child is killed when it expires.
pub struct AaptExtractor {
    binary: PathBuf,
    timeout: Duration,
}

impl AaptExtractor {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Whether the configured binary starts and exits within `timeout`.
    pub fn is_available(&self) -> bool {
        let Ok(mut child) = Command::new(&self.binary)
            .arg("version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        else {
            return false;
        };
        match wait_with_deadline(&mut child, self.timeout) {
            Ok(Some(_)) => true,
            Ok(None) => {
                tracing::warn!(
                    binary = %self.binary.display(),
                    timeout = ?self.timeout,
                    "aapt version check timed out"
                );
                false
            }
            Err(_) => false,
        }
    }

    fn run(&self, apk: &Path) -> Result<String> {
        let fail = |message: String| GuardError::Extraction {
            path: apk.display().to_string(),
            message,
        };

        let mut child = Command::new(&self.binary)
            .args(["dump", "badging"])
            .arg(apk)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| fail(format!("cannot start {}: {e}", self.binary.display())))?;

        // Drain stdout on a separate thread so a full pipe cannot stall the child.
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| fail("no stdout handle".into()))?;
        let reader = std::thread::spawn(move || {
            let mut buf = String::new();
            stdout.read_to_string(&mut buf).map(|_| buf)
        });

        let status = wait_with_deadline(&mut child, self.timeout)
            .map_err(|e| fail(format!("waiting for aapt failed: {e}")))?
            .ok_or_else(|| fail(format!("timed out after {:?}", self.timeout)))?;

        let output = reader
            .join()
            .map_err(|_| fail("output reader panicked".into()))??;

        if !status.success() {
            return Err(fail(format!("aapt exited with {status}")));
        }
        Ok(output)
    }
}

/// Poll `child` until it exits or `timeout` passes.
///
/// Returns `Ok(None)` on timeout. On timeout or a wait error the child is
/// killed and reaped before returning.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Ok(None);
            }
            Ok(None) => std::thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        }
    }
}

impl Default for AaptExtractor {
    fn default() -> Self {
        Self::new("aapt", Duration::from_secs(60))
    }
}

impl super::Extractor for AaptExtractor {
    fn name(&self) -> &'static str {
        "aapt"
    }

    fn extract(&self, path: &Path) -> Result<PackageFacts> {
        let output = self.run(path)?;
        Ok(parse_badging(&output))
    }
}

/// Parse `aapt dump badging` output.
///
/// Permissions keep their order and duplicates. Each launchable activity
/// gets a MAIN/LAUNCHER filter, the only filter badging output exposes.
pub fn parse_badging(output: &str) -> PackageFacts {
    let permissions = USES_PERMISSION_RE
        .captures_iter(output)
        .map(|c| c[1].to_string())
        .collect();

    let mut intents = BTreeMap::new();
    for cap in LAUNCHABLE_RE.captures_iter(output) {
        intents.insert(
            cap[1].to_string(),
            IntentFilter {
                actions: vec!["android.intent.action.MAIN".into()],
                categories: vec!["android.intent.category.LAUNCHER".into()],
                data: vec![],
            },
        );
    }

    PackageFacts {
        permissions,
        intents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{extract_or_empty, Extractor};

    const BADGING: &str = "\
package: name='com.example.flashlight' versionCode='12' versionName='1.2'
sdkVersion:'21'
uses-permission: name='android.permission.INTERNET'
uses-permission: name='android.permission.CAMERA'
uses-permission: name='android.permission.READ_CONTACTS' maxSdkVersion='28'
uses-permission-sdk-23: name='android.permission.ACCESS_FINE_LOCATION'
uses-permission: name='android.permission.INTERNET'
application-label:'Flashlight'
launchable-activity: name='com.example.flashlight.MainActivity'  label='Flashlight' icon=''
";

    #[test]
    fn parses_permissions_in_order_with_duplicates() {
        let facts = parse_badging(BADGING);
        assert_eq!(
            facts.permissions,
            vec![
                "android.permission.INTERNET",
                "android.permission.CAMERA",
                "android.permission.READ_CONTACTS",
                "android.permission.ACCESS_FINE_LOCATION",
                "android.permission.INTERNET",
            ]
        );
    }

    #[test]
    fn launchable_activity_becomes_launcher_filter() {
        let facts = parse_badging(BADGING);
        let filter = &facts.intents["com.example.flashlight.MainActivity"];
        assert_eq!(filter.actions, vec!["android.intent.action.MAIN"]);
        assert_eq!(filter.categories, vec!["android.intent.category.LAUNCHER"]);
    }

    #[test]
    fn empty_output_gives_empty_facts() {
        assert!(parse_badging("").is_empty());
    }

    #[test]
    fn missing_binary_fails_soft() {
        let extractor = AaptExtractor::new(
            "/nonexistent/bin/aapt-missing",
            Duration::from_secs(1),
        );
        assert!(!extractor.is_available());
        assert!(extractor.extract(Path::new("x.apk")).is_err());
        assert!(extract_or_empty(&extractor, Path::new("x.apk")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn hung_child_is_killed_at_deadline() {
        let mut child = Command::new("sh")
            .args(["-c", "sleep 30"])
            .spawn()
            .unwrap();
        let started = Instant::now();
        let status = wait_with_deadline(&mut child, Duration::from_millis(200)).unwrap();
        assert!(status.is_none());
        assert!(started.elapsed() < Duration::from_secs(10));
        // Already reaped by the kill path.
        assert!(child.try_wait().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn prompt_child_reports_status() {
        let mut child = Command::new("sh").args(["-c", "exit 3"]).spawn().unwrap();
        let status = wait_with_deadline(&mut child, Duration::from_secs(10))
            .unwrap()
            .unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn binary_that_exits_is_available() {
        let extractor = AaptExtractor::new("true", Duration::from_secs(10));
        assert!(extractor.is_available());
    }
}
