//! Per-tick telemetry sampling from `/proc` and `/sys`.
//!
//! Throughput-style metrics (CPU busy time, network and disk byte counters)
//! are monotonic counters in the kernel, so the sampler keeps the previous
//! reading and reports the delta over the elapsed wall time. The first call
//! after startup therefore returns garbage; callers prime the sampler once
//! and discard that result before rendering anything.
//!
//! hwmon names are not persistent across boots or kernels, so every hwmon
//! path is configurable; the defaults match one particular desktop.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::debug;
use serde::Serialize;

use crate::error::Error;

/// Sector size used by `/sys/block/<dev>/stat`, independent of the actual
/// device geometry.
const SECTOR_SIZE: f64 = 512.0;

/// Where the sampler reads each metric from.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Interface under `/sys/class/net` for rx/tx byte counters.
    pub net_iface: String,
    /// Block devices under `/sys/block` whose throughput is summed.
    pub disks: Vec<String>,
    /// hwmon `temp*_input` file for the CPU temperature.
    pub cpu_temp: PathBuf,
    /// hwmon `temp*_input` file for the RAM temperature.
    pub ram_temp: PathBuf,
    /// hwmon directory holding `fan1_input` … `fan3_input`.
    pub fan_hwmon: PathBuf,
}

/// One tick's worth of telemetry, already in render-ready units.
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    /// CPU busy fraction over the last tick, in `[0, 1]`.
    pub cpu: f64,
    /// Used RAM fraction, in `[0, 1]`.
    pub ram: f64,
    /// CPU temperature in degrees Celsius.
    pub cpu_temp: f64,
    /// RAM temperature in degrees Celsius.
    pub ram_temp: f64,
    /// Fan speeds in RPM.
    pub fans: [f64; 3],
    /// Network receive rate in bytes per second.
    pub net_rx: f64,
    /// Network transmit rate in bytes per second.
    pub net_tx: f64,
    /// Disk read rate in bytes per second, summed over configured devices.
    pub disk_read: f64,
    /// Disk write rate in bytes per second, summed over configured devices.
    pub disk_write: f64,
    /// Whole days of uptime.
    pub uptime_days: u64,
    /// Hour-of-day component of uptime, `0..24`.
    pub uptime_hours: u64,
    /// Minute-of-hour component of uptime, `0..60`.
    pub uptime_minutes: u64,
}

pub struct Sampler {
    config: SamplerConfig,
    last_tick: Instant,
    prev_cpu: (u64, u64),
    prev_net: (u64, u64),
    prev_disk: (u64, u64),
}

fn read_text(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Busy and total jiffies from the aggregate `cpu` line of `/proc/stat`.
fn parse_cpu_line(text: &str) -> Option<(u64, u64)> {
    let mut fields = text.lines().next()?.split_whitespace();
    if fields.next()? != "cpu" {
        return None;
    }

    let mut values = [0u64; 10];
    for slot in values.iter_mut() {
        *slot = fields.next()?.parse().ok()?;
    }
    let [user, nice, system, idle, iowait, irq, softirq, steal, guest, guest_nice] = values;

    let busy = user + nice + system + irq + softirq + steal + guest + guest_nice;
    Some((busy, busy + idle + iowait))
}

/// Used-memory fraction from `MemTotal` and `MemAvailable` in `/proc/meminfo`.
fn parse_meminfo(text: &str) -> Option<f64> {
    let mut total = None;
    let mut available = None;
    for line in text.lines() {
        let mut fields = line.split_whitespace();
        match fields.next()? {
            "MemTotal:" => total = fields.next()?.parse::<f64>().ok(),
            "MemAvailable:" => available = fields.next()?.parse::<f64>().ok(),
            _ => continue,
        }
        if let (Some(total), Some(available)) = (total, available) {
            return Some((total - available) / total);
        }
    }
    None
}

/// First whitespace-delimited number in a single-value pseudo-file.
fn parse_first_number(text: &str) -> Option<f64> {
    text.split_whitespace().next()?.parse().ok()
}

/// Sectors read and written from `/sys/block/<dev>/stat` (fields 3 and 7,
/// 1-based).
fn parse_disk_stat(text: &str) -> Option<(u64, u64)> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    let read = fields.get(2)?.parse().ok()?;
    let written = fields.get(6)?.parse().ok()?;
    Some((read, written))
}

impl Sampler {
    pub fn new(config: SamplerConfig) -> Sampler {
        Sampler {
            config,
            last_tick: Instant::now(),
            prev_cpu: (0, 0),
            prev_net: (0, 0),
            prev_disk: (0, 0),
        }
    }

    fn read_number(&self, path: &Path) -> Result<f64, Error> {
        let text = read_text(path)?;
        parse_first_number(&text).ok_or_else(|| Error::Parse {
            path: path.to_path_buf(),
        })
    }

    fn cpu(&mut self) -> Result<f64, Error> {
        let path = Path::new("/proc/stat");
        let text = read_text(path)?;
        let (busy, total) = parse_cpu_line(&text).ok_or_else(|| Error::Parse {
            path: path.to_path_buf(),
        })?;

        // Kernel counters only move forward, but a reset (suspend, module
        // reload) must not panic a long-running daemon.
        let delta_busy = busy.saturating_sub(self.prev_cpu.0);
        let delta_total = total.saturating_sub(self.prev_cpu.1);
        self.prev_cpu = (busy, total);

        if delta_total == 0 {
            return Ok(0.0);
        }
        Ok(delta_busy as f64 / delta_total as f64)
    }

    fn ram(&self) -> Result<f64, Error> {
        let path = Path::new("/proc/meminfo");
        let text = read_text(path)?;
        parse_meminfo(&text).ok_or_else(|| Error::Parse {
            path: path.to_path_buf(),
        })
    }

    fn net_bytes(&self, direction: &str) -> Result<u64, Error> {
        let path = PathBuf::from(format!(
            "/sys/class/net/{}/statistics/{direction}_bytes",
            self.config.net_iface
        ));
        Ok(self.read_number(&path)? as u64)
    }

    fn disk_sectors(&self) -> Result<(u64, u64), Error> {
        let mut read_total = 0;
        let mut written_total = 0;
        for disk in &self.config.disks {
            let path = PathBuf::from(format!("/sys/block/{disk}/stat"));
            let text = read_text(&path)?;
            let (read, written) = parse_disk_stat(&text).ok_or_else(|| Error::Parse {
                path: path.clone(),
            })?;
            read_total += read;
            written_total += written;
        }
        Ok((read_total, written_total))
    }

    /// Collect one tick of telemetry. Any unreadable or unparsable source is
    /// fatal; there is no partial snapshot.
    pub fn sample(&mut self) -> Result<Stats, Error> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;
        // Rates degenerate to the raw delta on a zero-length tick.
        let elapsed = if elapsed > 0.0 { elapsed } else { 1.0 };

        let cpu = self.cpu()?;
        let ram = self.ram()?;

        // hwmon reports millidegrees.
        let cpu_temp = self.read_number(&self.config.cpu_temp)? / 1000.0;
        let ram_temp = self.read_number(&self.config.ram_temp)? / 1000.0;

        let mut fans = [0.0; 3];
        for (i, fan) in fans.iter_mut().enumerate() {
            let path = self.config.fan_hwmon.join(format!("fan{}_input", i + 1));
            *fan = self.read_number(&path)?;
        }

        let rx = self.net_bytes("rx")?;
        let tx = self.net_bytes("tx")?;
        let net_rx = rx.saturating_sub(self.prev_net.0) as f64 / elapsed;
        let net_tx = tx.saturating_sub(self.prev_net.1) as f64 / elapsed;
        self.prev_net = (rx, tx);

        let (read, written) = self.disk_sectors()?;
        let disk_read = read.saturating_sub(self.prev_disk.0) as f64 * SECTOR_SIZE / elapsed;
        let disk_write = written.saturating_sub(self.prev_disk.1) as f64 * SECTOR_SIZE / elapsed;
        self.prev_disk = (read, written);

        let uptime_path = Path::new("/proc/uptime");
        let uptime = self.read_number(uptime_path)?;
        if !uptime.is_finite() || uptime < 0.0 {
            return Err(Error::Parse {
                path: uptime_path.to_path_buf(),
            });
        }
        let uptime = uptime as u64;

        let stats = Stats {
            cpu,
            ram,
            cpu_temp,
            ram_temp,
            fans,
            net_rx,
            net_tx,
            disk_read,
            disk_write,
            uptime_days: uptime / 86_400,
            uptime_hours: uptime / 3_600 % 24,
            uptime_minutes: uptime / 60 % 60,
        };
        debug!("sampled {stats:?}");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_line_sums_busy_and_total_jiffies() {
        let text = "cpu  10 2 8 100 5 1 3 0 0 1\ncpu0 5 1 4 50 2 0 1 0 0 0\n";
        let (busy, total) = parse_cpu_line(text).unwrap();
        assert_eq!(busy, 10 + 2 + 8 + 1 + 3 + 0 + 0 + 1);
        assert_eq!(total, busy + 100 + 5);
    }

    #[test]
    fn cpu_line_requires_all_ten_fields() {
        assert!(parse_cpu_line("cpu 1 2 3\n").is_none());
        assert!(parse_cpu_line("intr 1 2 3 4 5 6 7 8 9 10\n").is_none());
    }

    #[test]
    fn meminfo_yields_used_fraction() {
        let text = "MemTotal:       16000 kB\nMemFree:         2000 kB\nMemAvailable:    4000 kB\n";
        let used = parse_meminfo(text).unwrap();
        assert!((used - 0.75).abs() < 1e-9);
    }

    #[test]
    fn meminfo_without_available_is_rejected() {
        assert!(parse_meminfo("MemTotal: 16000 kB\nMemFree: 1 kB\n").is_none());
    }

    #[test]
    fn single_value_files_parse_their_first_number() {
        assert_eq!(parse_first_number("42350\n"), Some(42350.0));
        assert_eq!(parse_first_number("123.45 678.9\n"), Some(123.45));
        assert_eq!(parse_first_number("\n"), None);
    }

    #[test]
    fn disk_stat_picks_sector_fields() {
        let text = "  8364   2438  351162  14216  12345  6789  987654  9999 0 8000 24000\n";
        let (read, written) = parse_disk_stat(text).unwrap();
        assert_eq!(read, 351_162);
        assert_eq!(written, 987_654);
    }

    #[test]
    fn uptime_decomposition_matches_render_fields() {
        // 3 days, 5 hours, 42 minutes, 7 seconds.
        let uptime = (3 * 86_400 + 5 * 3_600 + 42 * 60 + 7) as u64;
        assert_eq!(uptime / 86_400, 3);
        assert_eq!(uptime / 3_600 % 24, 5);
        assert_eq!(uptime / 60 % 60, 42);
    }
}
