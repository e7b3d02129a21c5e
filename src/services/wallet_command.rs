//! Wallet command backend
//!
//! Runs an external wallet program for each zap. The request is passed in
//! environment variables; the program reports on stdout with lines such as
//! `progress: 0.5`, `progress 50%` or `error: insufficient funds` and signals
//! the outcome through its exit status.

use crate::model::ZapRequest;
use crate::services::{PaymentBackend, ProgressReporter};
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::io::{BufRead, BufReader, Read};
use std::thread;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

/// Regex to match ANSI escape codes
static ANSI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").unwrap());

/// `progress: 0.5`, `progress=0.5`, `progress 50%`
static PROGRESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*progress\s*[:=]?\s*([0-9]*\.?[0-9]+)\s*(%)?\s*$").unwrap()
});

/// `error: something went wrong`
static ERROR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*error\s*:\s*(.+?)\s*$").unwrap());

/// A line of wallet output, interpreted
#[derive(Debug, Clone, PartialEq)]
pub enum WalletLine {
    Progress(f32),
    Error(String),
    Other(String),
}

/// Strip ANSI escape codes from a string
fn strip_ansi_codes(s: &str) -> String {
    ANSI_REGEX.replace_all(s, "").to_string()
}

/// Classify one line of wallet stdout
pub fn parse_wallet_line(line: &str) -> WalletLine {
    let clean = strip_ansi_codes(line);

    if let Some(caps) = PROGRESS_REGEX.captures(&clean) {
        if let Ok(value) = caps[1].parse::<f32>() {
            let fraction = if caps.get(2).is_some() {
                value / 100.0
            } else {
                value
            };
            return WalletLine::Progress(fraction);
        }
    }

    if let Some(caps) = ERROR_REGEX.captures(&clean) {
        return WalletLine::Error(caps[1].to_string());
    }

    WalletLine::Other(clean)
}

/// Payment backend that shells out to a wallet program
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
}

impl CommandBackend {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn build_command(&self, request: &ZapRequest) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .env("ZAP_NOTE_ID", &request.note.id)
            .env("ZAP_RECIPIENT", &request.note.author)
            .env("ZAP_AMOUNT_MSATS", request.amount_millisats.to_string())
            .env("ZAP_MESSAGE", &request.message)
            .env("ZAP_TYPE", request.zap_type.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        match &request.invoice {
            Some(invoice) => {
                command.env("ZAP_INVOICE", invoice);
            }
            None => {
                command.env_remove("ZAP_INVOICE");
            }
        }
        command
    }
}

impl PaymentBackend for CommandBackend {
    fn name(&self) -> &str {
        &self.program
    }

    fn send_zap(&self, request: &ZapRequest, progress: &ProgressReporter) -> Result<()> {
        let mut child = self
            .build_command(request)
            .spawn()
            .with_context(|| format!("Failed to launch wallet '{}'", self.program))?;

        // stderr must drain alongside stdout or a full pipe blocks the wallet
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut text = String::new();
                let _ = stderr.read_to_string(&mut text);
                text
            })
        });

        let mut last_error: Option<String> = None;

        if let Some(stdout) = child.stdout.take() {
            let reader = BufReader::new(stdout);
            for line in reader.lines().map_while(|l| l.ok()) {
                match parse_wallet_line(&line) {
                    WalletLine::Progress(fraction) => progress.progress(fraction),
                    WalletLine::Error(message) => last_error = Some(message),
                    WalletLine::Other(text) => {
                        if !text.trim().is_empty() {
                            tracing::debug!(wallet = %self.program, "{}", text);
                        }
                    }
                }
            }
        }

        let stderr_text = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for wallet '{}'", self.program))?;

        if status.success() {
            return Ok(());
        }

        let stderr_line = strip_ansi_codes(&stderr_text)
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string);

        let message = last_error.or(stderr_line).unwrap_or_else(|| match status.code() {
            Some(code) => format!("wallet command exited with status {}", code),
            None => "wallet command was terminated".to_string(),
        });
        Err(anyhow!(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_fraction() {
        assert_eq!(parse_wallet_line("progress: 0.5"), WalletLine::Progress(0.5));
        assert_eq!(parse_wallet_line("PROGRESS=1"), WalletLine::Progress(1.0));
        assert_eq!(parse_wallet_line("  progress .25  "), WalletLine::Progress(0.25));
    }

    #[test]
    fn test_parse_progress_percent() {
        assert_eq!(parse_wallet_line("progress 50%"), WalletLine::Progress(0.5));
        assert_eq!(parse_wallet_line("progress: 100 %"), WalletLine::Progress(1.0));
    }

    #[test]
    fn test_parse_error_line() {
        assert_eq!(
            parse_wallet_line("error: insufficient funds"),
            WalletLine::Error("insufficient funds".to_string())
        );
        assert_eq!(
            parse_wallet_line("\x1b[31mError: route not found\x1b[0m"),
            WalletLine::Error("route not found".to_string())
        );
    }

    #[test]
    fn test_other_lines_pass_through_without_ansi() {
        assert_eq!(
            parse_wallet_line("\x1b[1mfetching invoice\x1b[0m"),
            WalletLine::Other("fetching invoice".to_string())
        );
        assert_eq!(
            parse_wallet_line("progress report follows"),
            WalletLine::Other("progress report follows".to_string())
        );
    }

    #[cfg(unix)]
    mod process {
        use super::super::*;
        use crate::services::zapper::tests::{drain, request};
        use crate::services::zapper::ZapRunner;
        use crate::model::ZapEvent;
        use std::sync::Arc;

        fn sh(script: &str) -> CommandBackend {
            CommandBackend::new("sh", vec!["-c".to_string(), script.to_string()])
        }

        fn run(backend: CommandBackend) -> Vec<ZapEvent> {
            let mut runner = ZapRunner::new(Arc::new(backend));
            runner.dispatch(request(21_000));
            drain(&mut runner).into_iter().map(|(_, e)| e).collect()
        }

        #[test]
        fn test_successful_wallet_reports_progress() {
            let events = run(sh(
                "echo 'progress: 0.5'; echo \"amount $ZAP_AMOUNT_MSATS\"; echo 'progress: 1'",
            ));
            assert_eq!(
                events,
                vec![
                    ZapEvent::Progress(0.5),
                    ZapEvent::Progress(1.0),
                    ZapEvent::Completed
                ]
            );
        }

        #[test]
        fn test_request_is_passed_in_environment() {
            let events = run(sh(
                "test \"$ZAP_AMOUNT_MSATS\" = 21000 && test \"$ZAP_TYPE\" = public \
                 && test \"$ZAP_MESSAGE\" = gm && test \"$ZAP_NOTE_ID\" = note1 \
                 && test -z \"$ZAP_INVOICE\"",
            ));
            assert_eq!(events, vec![ZapEvent::Completed]);
        }

        #[test]
        fn test_error_line_wins_over_stderr() {
            let events = run(sh(
                "echo 'progress: 0.3'; echo 'error: insufficient funds'; echo boom >&2; exit 2",
            ));
            assert_eq!(
                events.last(),
                Some(&ZapEvent::Failed("insufficient funds".to_string()))
            );
        }

        #[test]
        fn test_stderr_used_when_no_error_line() {
            let events = run(sh("echo 'relay unreachable' >&2; exit 1"));
            assert_eq!(
                events,
                vec![ZapEvent::Failed("relay unreachable".to_string())]
            );
        }

        #[test]
        fn test_large_stderr_does_not_stall_wallet() {
            let events = run(sh(
                "head -c 200000 /dev/zero | tr '\\0' x >&2; echo 'progress: 1'",
            ));
            assert_eq!(
                events,
                vec![ZapEvent::Progress(1.0), ZapEvent::Completed]
            );
        }

        #[test]
        fn test_large_stderr_still_reported_on_failure() {
            let events = run(sh(
                "head -c 200000 /dev/zero | tr '\\0' x >&2; echo >&2; echo 'no route' >&2; exit 1",
            ));
            assert_eq!(events, vec![ZapEvent::Failed("no route".to_string())]);
        }

        #[test]
        fn test_exit_status_fallback() {
            let events = run(sh("exit 3"));
            assert_eq!(
                events,
                vec![ZapEvent::Failed("wallet command exited with status 3".to_string())]
            );
        }

        #[test]
        fn test_missing_program_fails() {
            let events = run(CommandBackend::new("/nonexistent/zap-wallet", vec![]));
            match events.as_slice() {
                [ZapEvent::Failed(message)] => {
                    assert!(message.contains("Failed to launch wallet"), "{}", message)
                }
                other => panic!("unexpected events: {:?}", other),
            }
        }
    }
}
