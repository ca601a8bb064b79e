//! Log-frequency spectrum of the scope buffer

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

const BINS: usize = 64;
const MIN_HZ: f32 = 20.0;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin read for each display point.
    bins: Vec<usize>,
    /// (log10 Hz, dB) per display point.
    points: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(size: usize, sample_rate: f32) -> Self {
        let size = size.max(2);
        let fft = FftPlanner::new().plan_fft_forward(size);

        let window = (0..size)
            .map(|i| {
                let t = i as f32 / (size - 1) as f32;
                0.5 * (1.0 - (std::f32::consts::TAU * t).cos())
            })
            .collect();

        let nyquist = (sample_rate * 0.5).max(MIN_HZ * 2.0);
        let last_bin = size / 2 - 1;
        let (bins, points) = (0..BINS)
            .map(|i| {
                let t = i as f32 / (BINS - 1) as f32;
                let hz = MIN_HZ * (nyquist / MIN_HZ).powf(t);
                let bin = ((hz * size as f32 / sample_rate).round() as usize).min(last_bin);
                (bin, ((hz as f64).log10(), FLOOR_DB))
            })
            .unzip();

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); size],
            bins,
            points,
        }
    }

    /// Recompute from the newest samples. Buffers of the wrong length are skipped.
    pub fn update(&mut self, samples: &[f32]) {
        if samples.len() != self.window.len() {
            return;
        }
        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(samples).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for (point, &bin) in self.points.iter_mut().zip(&self.bins) {
            let power = self.scratch[bin].norm_sqr().max(1e-12);
            point.1 = (10.0 * (power as f64).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.points
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, points: &[(f64, f64)]) {
    // Loudest display point, as a readout in the title.
    let peak = points
        .iter()
        .copied()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .filter(|&(_, db)| db > FLOOR_DB + 20.0);
    let title = match peak {
        Some((log_hz, _)) => format!(" Spectrum  peak {:.0} Hz ", 10f64.powf(log_hz)),
        None => " Spectrum ".to_string(),
    };

    let (min_x, max_x) = match (points.first(), points.last()) {
        (Some(first), Some(last)) if last.0 > first.0 => (first.0, last.0),
        _ => (0.0, 1.0),
    };

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(points);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 60.0])
                .labels(["-100", "-20", "60"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
