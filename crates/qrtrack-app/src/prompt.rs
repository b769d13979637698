use std::io::{self, BufRead};

use kanal::{AsyncSender, Sender};
use qrtrack_types::{Decision, ScanEvent};

/// Map one line of terminal input to a confirmation answer
pub fn parse_decision(line: &str) -> Decision {
    match line.trim().to_ascii_lowercase().as_str() {
        "q" | "quit" | "n" | "no" | "cancel" => Decision::Cancel,
        _ => Decision::Confirm,
    }
}

/// Forward stdin answers to the scan loop.
///
/// Runs on a plain thread: a blocking stdin read must not hold up runtime shutdown.
pub fn spawn_prompt(event_tx: &AsyncSender<ScanEvent>) {
    let tx = event_tx.clone().to_sync();

    std::thread::spawn(move || {
        let stdin = io::stdin();
        forward_decisions(stdin.lock(), &tx);
    });
}

/// Send one decision per input line until the input ends.
///
/// A closed or broken input answers `Cancel`, the same as dismissing the dialog;
/// otherwise a pending confirmation could never be answered.
pub fn forward_decisions(reader: impl BufRead, tx: &Sender<ScanEvent>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Prompt input failed: {}", e);
                break;
            }
        };
        let decision = parse_decision(&line);
        tracing::debug!("Prompt answer: {:?}", decision);
        if tx.send(ScanEvent::Decision(decision)).is_err() {
            // scan loop already gone
            return;
        }
    }

    tracing::info!("Prompt input closed, cancelling scan");
    let _ = tx.send(ScanEvent::Decision(Decision::Cancel));
}
