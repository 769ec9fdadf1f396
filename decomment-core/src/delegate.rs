// decomment-core/src/delegate.rs
//! The PHP delegate: hands PHP source to the real PHP tokenizer
//! (`token_get_all`) in a subprocess and trusts its classification.
//!
//! The delegate is optional. When it is unavailable or fails, callers fall
//! back to the C-style scanner with hash comments enabled, which is less
//! accurate for heredocs and `?>` boundaries.
//!
//! License: MIT OR APACHE 2.0

use std::io;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, warn};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};

/// Default wall-clock limit for one delegate call.
pub const DEFAULT_PHP_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs under `php -r`. Reads source from stdin, keep patterns (JSON list)
/// from the first argument, and writes the source back with every comment
/// not matching a pattern blanked character by character.
const PHP_STRIP_SCRIPT: &str = r#"
$code = stream_get_contents(STDIN);
$keep = json_decode($argv[1] ?? '[]', true);
if (!is_array($keep)) { $keep = []; }
$out = '';
foreach (token_get_all($code) as $tok) {
    if (!is_array($tok)) { $out .= $tok; continue; }
    [$id, $text] = $tok;
    if ($id !== T_COMMENT && $id !== T_DOC_COMMENT) { $out .= $text; continue; }
    $kept = false;
    foreach ($keep as $pat) {
        if (@preg_match('~' . str_replace('~', '\~', $pat) . '~u', $text) === 1) { $kept = true; break; }
    }
    $out .= $kept ? $text : preg_replace('/[^\r\n]/u', ' ', $text);
}
fwrite(STDOUT, $out);
"#;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DelegateError {
    #[error("PHP interpreter is not available: {0}")]
    Unavailable(String),

    #[error("PHP tokenizer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("PHP tokenizer timed out after {0:?}")]
    TimedOut(Duration),

    #[error("I/O error while talking to the PHP tokenizer: {0}")]
    Io(#[from] io::Error),

    #[error("PHP tokenizer produced invalid UTF-8: {0}")]
    InvalidOutput(#[from] std::string::FromUtf8Error),

    #[error("Failed to encode keep patterns: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Strips comments from PHP source using a native tokenizer.
pub trait PhpDelegate: Send + Sync {
    /// `text` must be complete PHP source (starting with an open tag to be
    /// lexed as code). `keep_patterns` are forwarded verbatim.
    fn strip(&self, text: &str, keep_patterns: &[String]) -> Result<String, DelegateError>;
}

/// A delegate that is never available. Used when PHP support is switched
/// off and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPhpDelegate;

impl PhpDelegate for NoPhpDelegate {
    fn strip(&self, _text: &str, _keep_patterns: &[String]) -> Result<String, DelegateError> {
        Err(DelegateError::Unavailable("PHP delegate disabled".to_string()))
    }
}

/// Runs the `php` command line interpreter on a private tokio runtime.
#[derive(Debug)]
pub struct PhpCliDelegate {
    binary: String,
    timeout: Duration,
    runtime: Runtime,
    missing: AtomicBool,
}

impl PhpCliDelegate {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Result<Self, DelegateError> {
        let runtime = RuntimeBuilder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        Ok(Self {
            binary: binary.into(),
            timeout,
            runtime,
            missing: AtomicBool::new(false),
        })
    }

    async fn run(&self, text: &str, keep_json: String) -> Result<String, DelegateError> {
        let mut child = Command::new(&self.binary)
            .arg("-r")
            .arg(PHP_STRIP_SCRIPT)
            .arg("--")
            .arg(keep_json)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "PHP stdin unavailable"))?;
        let input = text.as_bytes().to_vec();
        let write = async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        };

        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;
        if !output.status.success() {
            return Err(DelegateError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        Ok(String::from_utf8(output.stdout)?)
    }

    fn spawn_error(&self, e: io::Error) -> DelegateError {
        if e.kind() != io::ErrorKind::NotFound {
            return DelegateError::Io(e);
        }
        if !self.missing.swap(true, Ordering::SeqCst) {
            warn!(
                "PHP interpreter '{}' not found; PHP comments will be stripped with the built-in scanner.",
                self.binary
            );
        }
        DelegateError::Unavailable(format!("'{}' not found", self.binary))
    }
}

impl PhpDelegate for PhpCliDelegate {
    fn strip(&self, text: &str, keep_patterns: &[String]) -> Result<String, DelegateError> {
        if self.missing.load(Ordering::SeqCst) {
            return Err(DelegateError::Unavailable(format!("'{}' not found", self.binary)));
        }
        let keep_json = serde_json::to_string(keep_patterns)?;
        debug!("Running PHP tokenizer on {} bytes.", text.len());

        self.runtime.block_on(async {
            match tokio::time::timeout(self.timeout, self.run(text, keep_json)).await {
                Ok(result) => result,
                Err(_) => Err(DelegateError::TimedOut(self.timeout)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_php_delegate_is_unavailable() {
        let err = NoPhpDelegate.strip("<?php // x", &[]).unwrap_err();
        assert!(matches!(err, DelegateError::Unavailable(_)));
    }

    #[test]
    fn test_missing_binary_is_remembered() {
        let delegate =
            PhpCliDelegate::new("decomment-no-such-php-binary", Duration::from_secs(1)).unwrap();
        let first = delegate.strip("<?php echo 1;", &[]).unwrap_err();
        assert!(matches!(first, DelegateError::Unavailable(_)), "{first}");
        assert!(delegate.missing.load(Ordering::SeqCst));
        let second = delegate.strip("<?php echo 1;", &[]).unwrap_err();
        assert!(matches!(second, DelegateError::Unavailable(_)));
    }

    /// Writes an executable shell script standing in for the interpreter.
    #[cfg(unix)]
    fn fake_php(dir: &tempfile::TempDir, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("php");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    #[test]
    fn test_reply_is_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let delegate =
            PhpCliDelegate::new(fake_php(&dir, "cat >/dev/null\nprintf 'stripped'"), DEFAULT_PHP_TIMEOUT)
                .unwrap();
        let out = delegate.strip("<?php // x", &["keep".to_string()]).unwrap();
        assert_eq!(out, "stripped");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let delegate =
            PhpCliDelegate::new(fake_php(&dir, "cat >/dev/null\necho boom >&2\nexit 1"), DEFAULT_PHP_TIMEOUT)
                .unwrap();
        match delegate.strip("<?php // x", &[]).unwrap_err() {
            DelegateError::Failed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error {other}"),
        }
        assert!(!delegate.missing.load(Ordering::SeqCst));
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_interpreter_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let timeout = Duration::from_millis(200);
        let delegate = PhpCliDelegate::new(fake_php(&dir, "exec sleep 5"), timeout).unwrap();
        let err = delegate.strip("<?php // x", &[]).unwrap_err();
        assert!(matches!(err, DelegateError::TimedOut(t) if t == timeout), "{err}");
    }
}
