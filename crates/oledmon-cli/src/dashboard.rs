//! The 128x64 dashboard layout.
//!
//! The layout is fixed at construction: the template bitmap (labels, dividers,
//! units) is painted once, and every live element gets a carved-out view and,
//! for the plots, a history ring sized to the view width. Each tick repaints
//! only the live views, so stale pixels cannot leak between elements.

use std::path::Path;

use oledmon_core::render;
use oledmon_core::{Canvas, Error, GlyphStore, Ring, View};

use crate::stats::Stats;

/// Panel dimensions in pixels.
pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;

/// Dimensions shared by all eight history plots.
const PLOT_WIDTH: usize = 38;
const PLOT_HEIGHT: usize = 10;

/// Width of a four-digit scalar field.
const SCALAR_WIDTH: usize = 11;
/// Width of a two-digit scalar field.
const SCALAR_2_WIDTH: usize = 7;

/// One history plot: its view plus the ring of retained samples.
struct Plot {
    view: View,
    ring: Ring,
}

impl Plot {
    fn new(root: View, x: usize, y: usize) -> Plot {
        Plot {
            view: root.subview(x, y, PLOT_WIDTH, PLOT_HEIGHT),
            ring: Ring::new(PLOT_WIDTH),
        }
    }
}

/// The full dashboard: canvas, glyphs, and every live element's view.
pub struct Dashboard {
    canvas: Canvas,
    glyphs: GlyphStore,

    cpu_plot: Plot,
    ram_plot: Plot,
    cpu_temp_plot: Plot,
    ram_temp_plot: Plot,
    net_tx_plot: Plot,
    net_rx_plot: Plot,
    disk_read_plot: Plot,
    disk_write_plot: Plot,

    cpu_field: View,
    cpu_temp_field: View,
    ram_temp_field: View,
    ram_field: View,

    net_tx_field: View,
    net_rx_field: View,
    disk_read_field: View,
    disk_write_field: View,

    uptime_days: View,
    uptime_hours: View,
    uptime_minutes: View,

    fan_fields: [View; 3],
}

impl Dashboard {
    /// Load the glyph set and template from `glyph_dir` and lay out every
    /// element. The template must be exactly 128x64.
    pub fn new(glyph_dir: &Path) -> Result<Dashboard, Error> {
        let glyphs = GlyphStore::load(glyph_dir)?;
        let template = oledmon_core::pbm::load(&glyph_dir.join("template.pbm"), WIDTH, HEIGHT)?;

        let mut canvas = Canvas::new(WIDTH, HEIGHT);
        let root = canvas.root();
        render::render_bitmap(&mut canvas, root, &template);

        Ok(Dashboard {
            glyphs,

            // Left column: CPU load, CPU temp, RAM temp, RAM usage.
            cpu_plot: Plot::new(root, 0, 0),
            cpu_temp_plot: Plot::new(root, 0, 12),
            ram_temp_plot: Plot::new(root, 0, 42),
            ram_plot: Plot::new(root, 0, 54),

            // Right column: network and disk throughput.
            net_tx_plot: Plot::new(root, 90, 0),
            net_rx_plot: Plot::new(root, 90, 12),
            disk_read_plot: Plot::new(root, 90, 42),
            disk_write_plot: Plot::new(root, 90, 54),

            cpu_field: root.subview(49, 6, SCALAR_WIDTH, 4),
            cpu_temp_field: root.subview(49, 12, SCALAR_WIDTH, 4),
            ram_temp_field: root.subview(49, 48, SCALAR_WIDTH, 4),
            ram_field: root.subview(49, 54, SCALAR_WIDTH, 4),

            net_tx_field: root.subview(53, 0, render::PREFIXED_WIDTH, 4),
            net_rx_field: root.subview(53, 18, render::PREFIXED_WIDTH, 4),
            disk_read_field: root.subview(53, 42, render::PREFIXED_WIDTH, 4),
            disk_write_field: root.subview(53, 60, render::PREFIXED_WIDTH, 4),

            uptime_days: root.subview(100, 25, SCALAR_WIDTH, 4),
            uptime_hours: root.subview(104, 30, SCALAR_2_WIDTH, 4),
            uptime_minutes: root.subview(104, 35, SCALAR_2_WIDTH, 4),

            fan_fields: [
                root.subview(0, 25, 15, 4),
                root.subview(0, 30, 15, 4),
                root.subview(0, 35, 15, 4),
            ],

            canvas,
        })
    }

    /// Fold one telemetry snapshot into the history rings and repaint every
    /// live element.
    pub fn update(&mut self, stats: &Stats) -> Result<(), Error> {
        self.cpu_plot.ring.push(stats.cpu);
        self.ram_plot.ring.push(stats.ram);
        self.cpu_temp_plot.ring.push(stats.cpu_temp);
        self.ram_temp_plot.ring.push(stats.ram_temp);
        self.net_tx_plot.ring.push(stats.net_tx);
        self.net_rx_plot.ring.push(stats.net_rx);
        self.disk_read_plot.ring.push(stats.disk_read);
        self.disk_write_plot.ring.push(stats.disk_write);

        let canvas = &mut self.canvas;
        let glyphs = &self.glyphs;

        render::render_scalar(
            canvas,
            self.cpu_field,
            glyphs,
            (stats.cpu * 100.0) as u64,
        )?;
        render::render_scalar(
            canvas,
            self.ram_field,
            glyphs,
            (stats.ram * 100.0) as u64,
        )?;
        render::render_scalar(canvas, self.cpu_temp_field, glyphs, stats.cpu_temp as u64)?;
        render::render_scalar(canvas, self.ram_temp_field, glyphs, stats.ram_temp as u64)?;

        for (view, rpm) in self.fan_fields.iter().zip(stats.fans) {
            render::render_scalar(canvas, *view, glyphs, rpm as u64)?;
        }

        render::render_scalar(canvas, self.uptime_days, glyphs, stats.uptime_days)?;
        render::render_scalar(canvas, self.uptime_hours, glyphs, stats.uptime_hours)?;
        render::render_scalar(canvas, self.uptime_minutes, glyphs, stats.uptime_minutes)?;

        render::render_scalar_prefixed(canvas, self.net_tx_field, glyphs, stats.net_tx as u64)?;
        render::render_scalar_prefixed(canvas, self.net_rx_field, glyphs, stats.net_rx as u64)?;
        render::render_scalar_prefixed(
            canvas,
            self.disk_read_field,
            glyphs,
            stats.disk_read as u64,
        )?;
        render::render_scalar_prefixed(
            canvas,
            self.disk_write_field,
            glyphs,
            stats.disk_write as u64,
        )?;

        // Load and usage are already fractions; temperatures fluctuate in a
        // narrow band, so they get the min/max window; raw byte rates are
        // scaled against their own recent peak.
        render::render_plot(canvas, self.cpu_plot.view, &self.cpu_plot.ring);
        render::render_plot(canvas, self.ram_plot.view, &self.ram_plot.ring);
        render::render_plot_fluct(canvas, self.cpu_temp_plot.view, &self.cpu_temp_plot.ring);
        render::render_plot_fluct(canvas, self.ram_temp_plot.view, &self.ram_temp_plot.ring);
        render::render_plot_norm(canvas, self.net_tx_plot.view, &self.net_tx_plot.ring);
        render::render_plot_norm(canvas, self.net_rx_plot.view, &self.net_rx_plot.ring);
        render::render_plot_norm(canvas, self.disk_read_plot.view, &self.disk_read_plot.ring);
        render::render_plot_norm(
            canvas,
            self.disk_write_plot.view,
            &self.disk_write_plot.ring,
        );

        Ok(())
    }

    /// The current canvas packed into the panel's wire format.
    pub fn frame(&self) -> Vec<u8> {
        self.canvas.pack()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}
