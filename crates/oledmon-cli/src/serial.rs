//! Serial link to the display bridge.
//!
//! The bridge is a small microcontroller that takes raw 1024-byte frames on
//! its UART and pushes them to the panel over I2C. It never acknowledges a
//! good frame; it only ever talks back to report a fault, one line of text
//! per fault. So the protocol here is: write the frame, then poll the line
//! briefly and treat any readable byte as fatal.
//!
//! The bridge runs at 666666 baud, which is not a POSIX `Bn` constant, so the
//! port is configured through the `termios2` ioctls with `BOTHER` instead of
//! `tcsetattr`.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{debug, info};

use crate::error::Error;

/// How long a freshly opened bridge gets to come out of its bootloader
/// before the first frame. Opening the port toggles DTR, which resets the
/// board.
const BOOT_GRACE: Duration = Duration::from_secs(2);

/// Fault-readback polling after each frame.
const READBACK_POLLS: u32 = 10;
const READBACK_DELAY: Duration = Duration::from_millis(100);

/// An open serial connection to the display bridge.
pub struct Display {
    file: File,
    path: PathBuf,
}

fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Put the port into raw 8N1 mode at an arbitrary baud rate.
fn configure(file: &File, baud: u32) -> std::io::Result<()> {
    let fd = file.as_raw_fd();
    let mut config: libc::termios2 = unsafe { std::mem::zeroed() };

    // SAFETY: fd is a valid open descriptor for the lifetime of `file`, and
    // TCGETS2 writes a full termios2 struct into the pointed-to memory.
    if unsafe { libc::ioctl(fd, libc::TCGETS2, &mut config) } != 0 {
        return Err(std::io::Error::last_os_error());
    }

    // 8N1, no flow control, receiver on, modem lines ignored.
    config.c_cflag &= !(libc::PARENB | libc::CSTOPB | libc::CSIZE | libc::CRTSCTS);
    config.c_cflag |= libc::CS8 | libc::CLOCAL | libc::CREAD;

    // Fully raw: no line editing, echo, signals, or byte translation in
    // either direction. The frames are binary.
    config.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ECHOE | libc::ECHONL | libc::ISIG);
    config.c_iflag &= !(libc::IXON | libc::IXOFF | libc::IXANY);
    config.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL);
    config.c_oflag &= !(libc::OPOST | libc::ONLCR);

    // Non-blocking reads: the fault poll must return immediately when the
    // bridge has nothing to say.
    config.c_cc[libc::VMIN] = 0;
    config.c_cc[libc::VTIME] = 0;

    // BOTHER selects the literal c_ispeed/c_ospeed fields.
    config.c_cflag &= !libc::CBAUD;
    config.c_cflag |= libc::BOTHER;
    config.c_ispeed = baud;
    config.c_ospeed = baud;

    // SAFETY: same fd validity argument as above; TCSETS2 only reads the
    // struct we just populated.
    if unsafe { libc::ioctl(fd, libc::TCSETS2, &config) } != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Extract the most recent complete fault line from raw readback bytes,
/// replacing anything non-printable so line noise cannot mangle the terminal.
fn fault_message(bytes: &[u8]) -> String {
    let text: String = bytes
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' || b == b'\n' {
                b as char
            } else {
                '?'
            }
        })
        .collect();
    match text.trim_end_matches('\n').rsplit('\n').next() {
        Some(line) if !line.is_empty() => line.to_string(),
        _ => text.trim().to_string(),
    }
}

impl Display {
    /// Open and configure the bridge at `path`, then wait out its boot
    /// grace period so the first frame is not swallowed by the bootloader.
    pub fn open(path: &Path, baud: u32) -> Result<Display, Error> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| io_error(path, e))?;
        configure(&file, baud).map_err(|e| io_error(path, e))?;

        info!(
            "opened display bridge on `{}` at {baud} baud, waiting for boot",
            path.display()
        );
        thread::sleep(BOOT_GRACE);

        Ok(Display {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Send one packed frame, then listen briefly for a fault report. Any
    /// message from the bridge is fatal.
    pub fn send(&mut self, frame: &[u8]) -> Result<(), Error> {
        self.file
            .write_all(frame)
            .map_err(|e| io_error(&self.path, e))?;
        self.file.flush().map_err(|e| io_error(&self.path, e))?;
        debug!("sent {} byte frame", frame.len());
        self.check()
    }

    fn check(&mut self) -> Result<(), Error> {
        let mut received = Vec::new();
        for _ in 0..READBACK_POLLS {
            thread::sleep(READBACK_DELAY);
            let mut buf = [0u8; 128];
            let n = self
                .file
                .read(&mut buf)
                .map_err(|e| io_error(&self.path, e))?;
            if n == 0 {
                if received.is_empty() {
                    return Ok(());
                }
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }
        if received.is_empty() {
            return Ok(());
        }
        Err(Error::Device {
            message: fault_message(&received),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::fault_message;

    #[test]
    fn fault_message_takes_the_last_complete_line() {
        assert_eq!(fault_message(b"i2c write failed\n"), "i2c write failed");
        assert_eq!(
            fault_message(b"warmup\nframe too short\n"),
            "frame too short"
        );
    }

    #[test]
    fn fault_message_sanitizes_line_noise() {
        assert_eq!(fault_message(b"\x01bad\xfe frame\n"), "?bad? frame");
    }

    #[test]
    fn fault_message_copes_with_a_partial_line() {
        assert_eq!(fault_message(b"no terminator"), "no terminator");
    }
}
