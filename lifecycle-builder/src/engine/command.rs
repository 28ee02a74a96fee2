use crossbeam_utils::thread::ScopedJoinHandle;
use std::io::Write;
use std::{io, mem, panic, process, thread};

/// Extension trait for [`process::Command`] used to run buildpack executables.
pub(crate) trait CommandExt {
    /// Runs the command to completion while streaming its stdout and stderr to the given writers.
    ///
    /// Both streams are copied unbuffered and in parallel, so the operator can follow a
    /// buildpack's output while it runs. Only stderr is additionally captured.
    fn output_and_write_streams<OW: Write + Send, EW: Write + Send>(
        &mut self,
        stdout_write: OW,
        stderr_write: EW,
    ) -> io::Result<StreamedOutput>;
}

/// The outcome of a command whose output was streamed.
#[derive(Debug)]
pub(crate) struct StreamedOutput {
    pub(crate) status: process::ExitStatus,
    pub(crate) stderr: Vec<u8>,
}

impl CommandExt for process::Command {
    fn output_and_write_streams<OW: Write + Send, EW: Write + Send>(
        &mut self,
        stdout_write: OW,
        stderr_write: EW,
    ) -> io::Result<StreamedOutput> {
        let mut stderr_buffer = Vec::new();

        let mut child = self
            .stdin(process::Stdio::null())
            .stdout(process::Stdio::piped())
            .stderr(process::Stdio::piped())
            .spawn()?;

        copy_child_output(
            &mut child,
            stdout_write,
            Tee(&mut stderr_buffer, stderr_write),
        )?;

        child.wait().map(|status| StreamedOutput {
            status,
            stderr: stderr_buffer,
        })
    }
}

fn copy_child_output<OW: Write + Send, EW: Write + Send>(
    child: &mut process::Child,
    mut stdout_writer: OW,
    mut stderr_writer: EW,
) -> io::Result<()> {
    // Both streams are copied on their own thread, otherwise interleaved stdout and stderr output
    // would no longer be interleaved. Scoped threads allow writers that borrow local buffers.
    unwind_panic(crossbeam_utils::thread::scope(|scope| {
        let stdout_copy_thread = mem::take(&mut child.stdout)
            .map(|mut stdout| scope.spawn(move |_| io::copy(&mut stdout, &mut stdout_writer)));

        let stderr_copy_thread = mem::take(&mut child.stderr)
            .map(|mut stderr| scope.spawn(move |_| io::copy(&mut stderr, &mut stderr_writer)));

        let stdout_copy_result = stdout_copy_thread.map_or_else(|| Ok(0), join_and_unwind_panic);
        let stderr_copy_result = stderr_copy_thread.map_or_else(|| Ok(0), join_and_unwind_panic);

        stdout_copy_result.and(stderr_copy_result).map(|_| ())
    }))
}

fn join_and_unwind_panic<T>(handle: ScopedJoinHandle<T>) -> T {
    unwind_panic(handle.join())
}

fn unwind_panic<T>(result: thread::Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => panic::resume_unwind(error),
    }
}

/// Writes everything to both inner writers, like the UNIX `tee` command.
struct Tee<A, B>(A, B);

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_all(buf)?;
        self.1.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()?;
        self.1.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::CommandExt;
    use std::process::Command;

    #[test]
    #[cfg(unix)]
    fn stderr_is_captured_and_both_streams_are_written() {
        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();

        let output = Command::new("sh")
            .args(["-c", "printf out; printf err >&2; exit 3"])
            .output_and_write_streams(&mut stdout_buf, &mut stderr_buf)
            .unwrap();

        assert_eq!(stdout_buf, b"out");
        assert_eq!(stderr_buf, b"err");

        assert_eq!(output.status.code(), Some(3));
        assert_eq!(output.stderr, b"err");
    }

    #[test]
    fn missing_executable_fails_to_spawn() {
        let result = Command::new("/this/executable/does/not/exist")
            .output_and_write_streams(Vec::new(), Vec::new());

        assert!(result.is_err());
    }
}
