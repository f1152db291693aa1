use std::{
    io::{BufRead, BufReader, Read},
    process::Child,
    sync::{Arc, Mutex, mpsc},
    thread,
    time::Duration,
};

/// Block until `reader` produces a line containing `marker`.
///
/// Lines are consumed on a helper thread so a silent child can never hang the caller past
/// `timeout`. On failure the error carries everything the child printed so far.
pub(crate) fn wait_for_marker(
    reader: impl Read + Send + 'static,
    marker: &str,
    timeout: Duration,
    child: &mut Child,
) -> eyre::Result<()> {
    let wanted = marker.to_string();
    let (tx, rx) = mpsc::channel();
    let seen = Arc::new(Mutex::new(Vec::<String>::new()));
    let seen_writer = Arc::clone(&seen);

    thread::spawn(move || {
        let mut signalled = false;
        for line in BufReader::new(reader).lines() {
            let Ok(line) = line else {
                break;
            };
            let matched = !signalled && line.contains(&wanted);
            if let Ok(mut seen) = seen_writer.lock() {
                seen.push(line);
            }
            if matched {
                signalled = true;
                let _ = tx.send(());
            }
        }
    });

    let failure = match rx.recv_timeout(timeout) {
        Ok(()) => return Ok(()),
        Err(mpsc::RecvTimeoutError::Timeout) => format!("timed out after {timeout:?}"),
        Err(mpsc::RecvTimeoutError::Disconnected) => "output closed".to_string(),
    };

    let status = match child.try_wait() {
        Ok(Some(status)) => format!("exited with {status}"),
        Ok(None) => "still running".to_string(),
        Err(e) => format!("status unknown: {e}"),
    };
    let output = seen.lock().map(|o| o.join("\n")).unwrap_or_default();

    eyre::bail!(
        "terminal never printed '{marker}': {failure}, process {status}\nCollected output:\n{output}"
    )
}
