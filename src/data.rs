//! Bulk extraction of recorded traces.
//!
//! These walk a trace point by point through the engine and collect the
//! result into plain vectors, ready for plotting or post-processing.

use std::os::raw::c_int;

use serde::{Deserialize, Serialize};

use crate::client::Nl5Client;
use crate::error::{Error, Result};
use crate::ffi::EngineApi;

/// All recorded points of a transient trace. Time spacing follows the
/// solver's steps and is generally not uniform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub time: Vec<f64>,
    pub value: Vec<f64>,
}

impl TimeSeries {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            time: Vec::with_capacity(n),
            value: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, t: f64, v: f64) {
        self.time.push(t);
        self.value.push(v);
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// All points of an AC trace: frequency [Hz], magnitude and phase [deg].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcSeries {
    pub frequency: Vec<f64>,
    pub magnitude: Vec<f64>,
    pub phase: Vec<f64>,
}

impl AcSeries {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            frequency: Vec::with_capacity(n),
            magnitude: Vec::with_capacity(n),
            phase: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, f: f64, mag: f64, phase: f64) {
        self.frequency.push(f);
        self.magnitude.push(mag);
        self.phase.push(phase);
    }

    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// Frequency as log10(f), magnitude in dB (20·log10(m)). Phase is unchanged.
    pub fn into_log_scale(mut self) -> Self {
        for f in self.frequency.iter_mut() {
            *f = f.log10();
        }
        for m in self.magnitude.iter_mut() {
            *m = 20.0 * m.log10();
        }
        self
    }
}

/// Sample times `t_start + i * t_step` for `i` in `0..=floor((t_end - t_start) / t_step)`.
pub fn sample_times(t_start: f64, t_end: f64, t_step: f64) -> Result<Vec<f64>> {
    if !(t_step.is_finite() && t_step > 0.0) || !t_start.is_finite() || !t_end.is_finite() {
        return Err(Error::Value(format!(
            "invalid slice t_start={} t_end={} t_step={}",
            t_start, t_end, t_step
        )));
    }
    if t_end < t_start {
        return Ok(Vec::new());
    }
    let count = ((t_end - t_start) / t_step).floor() + 1.0;
    if !count.is_finite() || count > c_int::MAX as f64 {
        return Err(Error::Value(format!(
            "slice {}..{} by {} has too many points",
            t_start, t_end, t_step
        )));
    }
    let n = count as usize;
    Ok((0..n).map(|i| i as f64 * t_step + t_start).collect())
}

impl<E: EngineApi> Nl5Client<E> {
    /// Every recorded `(time, value)` point of trace `name`.
    pub fn get_timedata_vectors(&self, name: &str) -> Result<TimeSeries> {
        let ncir = self.ncir("get_timedata_vectors")?;
        let ntrace = self.trace_handle(ncir, name)?;
        let size = self.data_size(ncir, ntrace, name)?;

        let mut series = TimeSeries::with_capacity(size);
        for n in 0..size {
            let (t, v) = self.data_at(ncir, ntrace, name, n as c_int)?;
            series.push(t, v);
        }
        Ok(series)
    }

    /// Every `(frequency, magnitude, phase)` point of AC trace `name`,
    /// optionally as log10 frequency and dB magnitude.
    pub fn get_freqmagphase_vectors(&self, name: &str, log: bool) -> Result<AcSeries> {
        let ncir = self.ncir("get_freqmagphase_vectors")?;
        let ntrace = self.ac_trace_handle(ncir, name)?;
        let size = self.ac_data_size(ncir, ntrace, name)?;

        let mut series = AcSeries::with_capacity(size);
        for n in 0..size {
            let (f, m, p) = self.ac_data_at(ncir, ntrace, name, n as c_int)?;
            series.push(f, m, p);
        }
        Ok(if log { series.into_log_scale() } else { series })
    }

    /// Trace `name` resampled on a uniform grid from `t_start` to `t_end`.
    /// Points between recorded data are interpolated by the engine.
    pub fn get_data_slice(&self, name: &str, t_start: f64, t_end: f64, t_step: f64) -> Result<Vec<f64>> {
        let ncir = self.ncir("get_data_slice")?;
        let ntrace = self.trace_handle(ncir, name)?;
        sample_times(t_start, t_end, t_step)?
            .into_iter()
            .map(|t| self.data(ncir, ntrace, name, t))
            .collect()
    }
}
