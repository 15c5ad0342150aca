use std::io;
use std::os::unix::io::AsRawFd;
use std::sync::Mutex;

use crate::{ConsoleError, ConsoleInput, ConsoleOutput, ConsoleResult, RawModeGuard, TerminalMode};

/// Apply the cbreak or raw discipline to a copy of the saved settings.
///
/// Output post-processing stays on so a bare `\n` still returns the carriage.
fn configure(termios: &mut libc::termios, mode: TerminalMode) {
    termios.c_lflag &= !(libc::ECHO | libc::ICANON);
    termios.c_iflag &= !(libc::ISTRIP
        | libc::INLCR
        | libc::ICRNL
        | libc::IGNCR
        | libc::IXON
        | libc::IXOFF);
    if mode == TerminalMode::Raw {
        termios.c_lflag &= !libc::ISIG;
    }
    termios.c_cc[libc::VMIN] = 1;
    termios.c_cc[libc::VTIME] = 0;
}

fn set_attributes(fd: i32, termios: &libc::termios) -> ConsoleResult<()> {
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) } != 0 {
        return Err(ConsoleError::TerminalError(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    Ok(())
}

pub struct UnixConsoleInput {
    stdin_fd: i32,
}

impl UnixConsoleInput {
    pub fn new() -> ConsoleResult<Self> {
        Ok(Self {
            stdin_fd: io::stdin().as_raw_fd(),
        })
    }
}

impl ConsoleInput for UnixConsoleInput {
    fn enable_raw_mode(&self, mode: TerminalMode) -> ConsoleResult<RawModeGuard> {
        let fd = self.stdin_fd;
        if unsafe { libc::isatty(fd) } == 0 {
            return Err(ConsoleError::TerminalError("stdin is not a TTY".to_string()));
        }

        let mut original_termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut original_termios) } != 0 {
            return Err(ConsoleError::TerminalError(format!(
                "tcgetattr failed: {}",
                io::Error::last_os_error()
            )));
        }
        let mut termios = original_termios;
        configure(&mut termios, mode);
        set_attributes(fd, &termios)?;
        log::debug!("stdin switched to {mode} mode");

        let restore_fn = move || set_attributes(fd, &original_termios);
        Ok(RawModeGuard::new(mode, restore_fn, crate::get_platform_info()))
    }

    fn read_byte(&self) -> ConsoleResult<u8> {
        let mut byte = 0u8;
        let result = unsafe {
            libc::read(
                self.stdin_fd,
                &mut byte as *mut u8 as *mut libc::c_void,
                1,
            )
        };
        match result {
            1 => Ok(byte),
            0 => Err(ConsoleError::EndOfStream),
            // EINTR included: a delivered signal ends the session.
            _ => Err(ConsoleError::IoError(io::Error::last_os_error())),
        }
    }
}

/// Terminal output on stdout.
///
/// Writes collect in memory until `flush`, so a redrawn line reaches the
/// terminal in one write.
pub struct UnixConsoleOutput {
    stdout_fd: i32,
    buffer: Mutex<Vec<u8>>,
}

impl UnixConsoleOutput {
    pub fn new() -> ConsoleResult<Self> {
        // Verify we have a TTY for output
        if unsafe { libc::isatty(libc::STDOUT_FILENO) } == 0 {
            return Err(ConsoleError::TerminalError("stdout is not a TTY".to_string()));
        }

        Ok(Self {
            stdout_fd: libc::STDOUT_FILENO,
            buffer: Mutex::new(Vec::new()),
        })
    }

    fn write_bytes_direct(&self, bytes: &[u8]) -> ConsoleResult<()> {
        let mut written = 0;
        while written < bytes.len() {
            let result = unsafe {
                libc::write(
                    self.stdout_fd,
                    bytes[written..].as_ptr() as *const libc::c_void,
                    bytes.len() - written,
                )
            };

            if result == -1 {
                let error = io::Error::last_os_error();
                match error.raw_os_error() {
                    Some(libc::EINTR) => continue, // Interrupted by signal, retry
                    _ => return Err(ConsoleError::IoError(error)),
                }
            }
            written += result as usize;
        }
        Ok(())
    }
}

impl ConsoleOutput for UnixConsoleOutput {
    fn write_bytes(&self, bytes: &[u8]) -> ConsoleResult<()> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| ConsoleError::TerminalError("output buffer lock poisoned".to_string()))?;
        buffer.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&self) -> ConsoleResult<()> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| ConsoleError::TerminalError("output buffer lock poisoned".to_string()))?;
        if !buffer.is_empty() {
            self.write_bytes_direct(&buffer)?;
            buffer.clear();
        }
        Ok(())
    }
}

impl Drop for UnixConsoleOutput {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_termios() -> libc::termios {
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        termios.c_lflag = libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN;
        termios.c_iflag = libc::ICRNL | libc::IXON | libc::ISTRIP | libc::BRKINT;
        termios.c_oflag = libc::OPOST;
        termios
    }

    #[test]
    fn test_cbreak_keeps_signals() {
        let mut termios = blank_termios();
        configure(&mut termios, TerminalMode::Cbreak);
        assert_eq!(termios.c_lflag & (libc::ECHO | libc::ICANON), 0);
        assert_ne!(termios.c_lflag & libc::ISIG, 0);
        assert_eq!(termios.c_iflag & (libc::ICRNL | libc::IXON | libc::ISTRIP), 0);
        assert_ne!(termios.c_iflag & libc::BRKINT, 0);
        assert_ne!(termios.c_oflag & libc::OPOST, 0);
        assert_eq!(termios.c_cc[libc::VMIN], 1);
        assert_eq!(termios.c_cc[libc::VTIME], 0);
    }

    #[test]
    fn test_raw_disables_signals() {
        let mut termios = blank_termios();
        configure(&mut termios, TerminalMode::Raw);
        assert_eq!(termios.c_lflag & libc::ISIG, 0);
        assert_ne!(termios.c_lflag & libc::IEXTEN, 0);
        assert_ne!(termios.c_oflag & libc::OPOST, 0);
    }
}
