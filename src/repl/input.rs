//! REPL Input
//!
//! Line sources the REPL can read from. Stdin is read on its own OS thread
//! and forwarded over a channel, so dropping the receiver abandons a pending
//! read instead of blocking runtime shutdown on it.

use std::future::Future;
use std::io::{self, BufRead};
use std::thread;

use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::mpsc;
use tracing::debug;

/// Lines buffered between the stdin thread and the REPL
const STDIN_BUFFER: usize = 16;

// == Line Source ==
/// Something that yields input lines until end of input.
pub trait LineSource {
    /// Returns the next line without its terminator, or `None` at end of input.
    fn next_line(&mut self) -> impl Future<Output = io::Result<Option<String>>>;
}

impl<R: AsyncBufRead + Unpin> LineSource for Lines<R> {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        Lines::next_line(self).await
    }
}

impl LineSource for mpsc::Receiver<io::Result<String>> {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.recv().await.transpose()
    }
}

// == Stdin ==
/// Starts a thread that forwards stdin lines into the returned channel.
///
/// The thread ends at end of input, on a read error, or on its next line
/// after the receiver is dropped.
pub fn spawn_stdin_reader() -> io::Result<mpsc::Receiver<io::Result<String>>> {
    let (tx, rx) = mpsc::channel(STDIN_BUFFER);

    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
            debug!("Stdin reader finished");
        })?;

    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncBufReadExt;

    #[tokio::test]
    async fn test_reader_lines_source() {
        let input: &[u8] = b"map\nexplore pastoria-city-area\n";
        let mut lines = AsyncBufReadExt::lines(input);

        assert_eq!(LineSource::next_line(&mut lines).await.unwrap().as_deref(), Some("map"));
        assert_eq!(
            LineSource::next_line(&mut lines).await.unwrap().as_deref(),
            Some("explore pastoria-city-area")
        );
        assert_eq!(LineSource::next_line(&mut lines).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_channel_source_ends_when_sender_dropped() {
        let (tx, mut rx) = mpsc::channel(4);
        tx.send(Ok("help".to_string())).await.unwrap();
        drop(tx);

        assert_eq!(rx.next_line().await.unwrap().as_deref(), Some("help"));
        assert_eq!(rx.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_channel_source_surfaces_read_errors() {
        let (tx, mut rx) = mpsc::channel(4);
        tx.send(Err(io::Error::new(io::ErrorKind::InvalidData, "bad utf-8")))
            .await
            .unwrap();

        let err = rx.next_line().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
