//! NL5 engine client - typed calls over the raw entry points
//!
//! The client owns the single open document handle. Every per-document call
//! checks for it before touching the engine, and every negative status is
//! mapped to an [`Error`] at the call site that received it.

use std::ffi::{CStr, CString};
use std::os::raw::c_int;
use std::path::{Path, PathBuf};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::ffi::{EngineApi, NativeEngine, Status};
use crate::paths::{self, AC_DATA_EXT, CIRCUIT_EXT, LICENSE_EXT, TRANSIENT_DATA_EXT};

// ============================================================================
// Handles and Status Mapping
// ============================================================================

/// Engine handle of an open circuit document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentHandle(c_int);

/// Raw handle value reported when no document is open.
pub const NO_DOCUMENT: c_int = -1;

impl DocumentHandle {
    pub fn raw(self) -> c_int {
        self.0
    }
}

/// Result of a license check that the engine did not reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseStatus {
    /// License accepted, full features enabled.
    Licensed,
    /// No usable license; the engine runs in demo mode.
    Demo,
}

/// Pass non-negative statuses through, turn negative ones into `err()`.
pub(crate) fn check(status: Status, err: impl FnOnce() -> Error) -> Result<Status> {
    if status < 0 {
        let e = err();
        log::warn!("NL5 call failed with status {}: {}", status, e);
        Err(e)
    } else {
        Ok(status)
    }
}

pub(crate) fn cstring(s: &str) -> Result<CString> {
    CString::new(s).map_err(|_| Error::InvalidName(s.to_string()))
}

fn path_cstring(path: &Path) -> Result<CString> {
    let s = path
        .to_str()
        .ok_or_else(|| Error::InvalidName(path.to_string_lossy().into_owned()))?;
    cstring(s)
}

/// Text written by the engine, up to the first NUL.
fn decode_text(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

fn current_dir() -> Result<PathBuf> {
    Ok(std::env::current_dir()?)
}

// ============================================================================
// Client
// ============================================================================

/// Client over an NL5 engine. At most one circuit document is open at a time.
pub struct Nl5Client<E: EngineApi = NativeEngine> {
    engine: E,
    config: ClientConfig,
    library_dir: PathBuf,
    document: Option<DocumentHandle>,
}

impl Nl5Client<NativeEngine> {
    /// Load the native library named by `config` and wrap it.
    pub fn load(config: ClientConfig) -> Result<Self> {
        let cwd = current_dir()?;
        let library_dir = paths::resolve_dir(config.library_dir.as_deref(), &cwd)?;
        let library_path = library_dir.join(paths::library_file_name(&config.library_name));
        let engine = NativeEngine::load(&library_path)?;
        Ok(Self::with_engine(engine, library_dir, config))
    }

    /// Load `<dir>/<name>` with default settings otherwise.
    pub fn open_library(name: &str, dir: impl AsRef<Path>) -> Result<Self> {
        let config = ClientConfig {
            library_name: name.to_string(),
            library_dir: Some(dir.as_ref().to_path_buf()),
            ..ClientConfig::default()
        };
        Self::load(config)
    }
}

impl<E: EngineApi> Nl5Client<E> {
    /// Wrap an already loaded engine. `library_dir` is where licenses are
    /// looked up by default.
    pub fn with_engine(engine: E, library_dir: impl Into<PathBuf>, config: ClientConfig) -> Self {
        Self {
            engine,
            config,
            library_dir: library_dir.into(),
            document: None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn document(&self) -> Option<DocumentHandle> {
        self.document
    }

    /// Raw handle of the open document, or [`NO_DOCUMENT`].
    pub fn raw_handle(&self) -> c_int {
        self.document.map_or(NO_DOCUMENT, DocumentHandle::raw)
    }

    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    pub(crate) fn ncir(&self, operation: &'static str) -> Result<c_int> {
        self.document
            .map(DocumentHandle::raw)
            .ok_or(Error::NotOpen { operation })
    }

    // ========================================================================
    // Diagnostics and License
    // ========================================================================

    /// Text of the engine's last error, `"OK"` when there was none.
    ///
    /// Only meaningful until the next engine call.
    pub fn last_error(&self) -> String {
        self.engine.get_error()
    }

    /// Engine version and build date.
    pub fn info(&self) -> String {
        self.engine.get_info()
    }

    /// Check the license named in the config, next to the library unless
    /// the config says otherwise.
    pub fn license(&self) -> Result<LicenseStatus> {
        let name = self.config.license_name.clone();
        let dir = self.config.license_dir.clone();
        self.get_license(&name, dir.as_deref())
    }

    pub fn get_license(&self, name: &str, dir: Option<&Path>) -> Result<LicenseStatus> {
        let file = paths::resolve_file(name, LICENSE_EXT, dir, &self.library_dir)?;
        let c_file = path_cstring(&file)?;
        let status = check(self.engine.get_license(&c_file), || {
            Error::License(format!(
                "license {} does not have the DLL option activated",
                file.display()
            ))
        })?;
        let license = if status == 0 {
            LicenseStatus::Licensed
        } else {
            LicenseStatus::Demo
        };
        log::debug!("license {}: {:?}", file.display(), license);
        Ok(license)
    }

    // ========================================================================
    // Document Lifecycle
    // ========================================================================

    /// Open a circuit file, closing the current one first.
    ///
    /// `.nl5` is appended to `name` when missing; `dir` defaults to the
    /// current directory.
    pub fn open(&mut self, name: &str, dir: Option<&Path>) -> Result<DocumentHandle> {
        self.release();

        let file = paths::resolve_file(name, CIRCUIT_EXT, dir, &current_dir()?)?;
        let c_file = path_cstring(&file)?;
        let ncir = check(self.engine.open(&c_file), || {
            Error::Open(format!("cannot open circuit {}", file.display()))
        })?;
        let handle = DocumentHandle(ncir);
        self.document = Some(handle);
        log::debug!("opened {} as document {}", file.display(), ncir);

        if let Err(e) = self.apply_config() {
            log::warn!("closing {}: configured settings rejected", file.display());
            self.release();
            return Err(e);
        }
        Ok(handle)
    }

    fn apply_config(&self) -> Result<()> {
        if let Some(step) = self.config.step {
            self.set_step(step)?;
        }
        if let Some(timeout) = self.config.timeout {
            self.set_timeout(timeout)?;
        }
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        self.ncir("close")?;
        self.release();
        Ok(())
    }

    /// Close the open document, if any. The engine's status is not an error
    /// here: the handle is gone either way.
    fn release(&mut self) {
        if let Some(handle) = self.document.take() {
            let status = self.engine.close(handle.raw());
            log::debug!("closed document {} (status {})", handle.raw(), status);
        }
    }

    /// Save the document back to its own file.
    pub fn save(&self) -> Result<()> {
        let ncir = self.ncir("save")?;
        check(self.engine.save(ncir), || {
            Error::Save("cannot save the circuit file".to_string())
        })?;
        Ok(())
    }

    pub fn save_as(&self, name: &str, dir: Option<&Path>) -> Result<PathBuf> {
        let ncir = self.ncir("save_as")?;
        let file = paths::resolve_file(name, CIRCUIT_EXT, dir, &current_dir()?)?;
        let c_file = path_cstring(&file)?;
        check(self.engine.save_as(ncir, &c_file), || {
            Error::Save(format!("cannot save the circuit file as {}", file.display()))
        })?;
        Ok(file)
    }

    // ========================================================================
    // Component Values
    // ========================================================================

    /// Numeric value of `<component>.<parameter>`.
    ///
    /// Formulas and non-blank initial conditions read as numbers, two-state
    /// parameters (On/Off, High/Low, Yes/No) as 1/0 and text lists as the
    /// zero-based index of the selection.
    pub fn get_value(&self, name: &str) -> Result<f64> {
        let ncir = self.ncir("get_value")?;
        let c_name = cstring(name)?;
        let mut v = 0.0;
        check(self.engine.get_value(ncir, &c_name, &mut v), || {
            Error::Value(format!(
                "get_value: parameter {} not found or parameter type not supported",
                name
            ))
        })?;
        Ok(v)
    }

    /// Set `<component>.<parameter>`, using the same encoding as [`get_value`](Self::get_value).
    pub fn set_value(&self, name: &str, v: f64) -> Result<()> {
        let ncir = self.ncir("set_value")?;
        let c_name = cstring(name)?;
        check(self.engine.set_value(ncir, &c_name, v), || {
            Error::Value(format!(
                "set_value: parameter {} not found or parameter type not supported",
                name
            ))
        })?;
        Ok(())
    }

    /// Parameter value as shown in the components window.
    pub fn get_text(&self, name: &str) -> Result<String> {
        let ncir = self.ncir("get_text")?;
        let c_name = cstring(name)?;
        let mut buf = vec![0u8; self.config.text_buffer_size];
        check(self.engine.get_text(ncir, &c_name, &mut buf), || {
            Error::Value(format!(
                "get_text: parameter {} not found or parameter type not supported",
                name
            ))
        })?;
        Ok(decode_text(&buf))
    }

    /// Set a parameter from its display text. A formula starts with `=`.
    pub fn set_text(&self, name: &str, text: &str) -> Result<()> {
        let ncir = self.ncir("set_text")?;
        let c_name = cstring(name)?;
        let c_text = cstring(text)?;
        check(self.engine.set_text(ncir, &c_name, &c_text), || {
            Error::Value(format!("set_text: cannot set parameter {} to {:?}", name, text))
        })?;
        Ok(())
    }

    fn param_handle(&self, ncir: c_int, name: &str) -> Result<c_int> {
        let c_name = cstring(name)?;
        check(self.engine.get_param(ncir, &c_name), || Error::Param {
            name: name.to_string(),
        })
    }

    pub fn get_parameter_value(&self, name: &str) -> Result<f64> {
        let ncir = self.ncir("get_parameter_value")?;
        let npar = self.param_handle(ncir, name)?;
        let mut v = 0.0;
        check(self.engine.get_param_value(ncir, npar, &mut v), || {
            Error::Value(format!(
                "get_parameter_value: parameter {} type not supported",
                name
            ))
        })?;
        Ok(v)
    }

    pub fn set_parameter_value(&self, name: &str, v: f64) -> Result<()> {
        let ncir = self.ncir("set_parameter_value")?;
        let npar = self.param_handle(ncir, name)?;
        check(self.engine.set_param_value(ncir, npar, v), || {
            Error::Value(format!(
                "set_parameter_value: parameter {} type not supported or value {} invalid",
                name, v
            ))
        })?;
        Ok(())
    }

    pub fn get_parameter_text(&self, name: &str) -> Result<String> {
        let ncir = self.ncir("get_parameter_text")?;
        let npar = self.param_handle(ncir, name)?;
        let mut buf = vec![0u8; self.config.text_buffer_size];
        check(self.engine.get_param_text(ncir, npar, &mut buf), || {
            Error::Value(format!("get_parameter_text: cannot read parameter {}", name))
        })?;
        Ok(decode_text(&buf))
    }

    pub fn set_parameter_text(&self, name: &str, text: &str) -> Result<()> {
        let ncir = self.ncir("set_parameter_text")?;
        let npar = self.param_handle(ncir, name)?;
        let c_text = cstring(text)?;
        check(self.engine.set_param_text(ncir, npar, &c_text), || {
            Error::Value(format!(
                "set_parameter_text: cannot set parameter {} to {:?}",
                name, text
            ))
        })?;
        Ok(())
    }

    // ========================================================================
    // Transient Traces
    // ========================================================================

    fn add_trace(
        &self,
        operation: &'static str,
        what: &str,
        name: &str,
        add: impl FnOnce(&E, c_int, &CStr) -> Status,
    ) -> Result<()> {
        let ncir = self.ncir(operation)?;
        let c_name = cstring(name)?;
        check(add(&self.engine, ncir, c_name.as_c_str()), || {
            Error::Trace(format!("{}: cannot add {} trace for {}", operation, what, name))
        })?;
        Ok(())
    }

    /// Voltage trace of component `name`.
    pub fn add_voltage_trace(&self, name: &str) -> Result<()> {
        self.add_trace("add_voltage_trace", "voltage", name, E::add_v_trace)
    }

    pub fn add_current_trace(&self, name: &str) -> Result<()> {
        self.add_trace("add_current_trace", "current", name, E::add_i_trace)
    }

    pub fn add_power_trace(&self, name: &str) -> Result<()> {
        self.add_trace("add_power_trace", "power", name, E::add_p_trace)
    }

    /// Trace of schematic variable `name`.
    pub fn add_variable_trace(&self, name: &str) -> Result<()> {
        self.add_trace("add_variable_trace", "variable", name, E::add_var_trace)
    }

    /// Trace of an arbitrary function of other traces and variables.
    pub fn add_function_trace(&self, text: &str) -> Result<()> {
        self.add_trace("add_function_trace", "function", text, E::add_func_trace)
    }

    pub(crate) fn trace_handle(&self, ncir: c_int, name: &str) -> Result<c_int> {
        let c_name = cstring(name)?;
        check(self.engine.get_trace(ncir, &c_name), || {
            Error::Trace(format!("trace {} does not exist in circuit", name))
        })
    }

    pub(crate) fn ac_trace_handle(&self, ncir: c_int, name: &str) -> Result<c_int> {
        let c_name = cstring(name)?;
        check(self.engine.get_ac_trace(ncir, &c_name), || {
            Error::Trace(format!("AC trace {} does not exist in circuit", name))
        })
    }

    /// Raw trace handles are not exposed; use the name-based accessors.
    pub fn trace(&self, _name: &str) -> Result<c_int> {
        Err(Error::NotImplemented("trace"))
    }

    /// Raw AC trace handles are not exposed; use the name-based accessors.
    pub fn ac_trace(&self, _name: &str) -> Result<c_int> {
        Err(Error::NotImplemented("ac_trace"))
    }

    pub fn delete_trace(&self, name: &str) -> Result<()> {
        let ncir = self.ncir("delete_trace")?;
        let ntrace = self.trace_handle(ncir, name)?;
        check(self.engine.delete_trace(ncir, ntrace), || {
            Error::Delete(format!("cannot delete trace {}", name))
        })?;
        Ok(())
    }

    /// Number of recorded points of a transient trace.
    pub fn get_data_size(&self, name: &str) -> Result<usize> {
        let ncir = self.ncir("get_data_size")?;
        let ntrace = self.trace_handle(ncir, name)?;
        self.data_size(ncir, ntrace, name)
    }

    pub(crate) fn data_size(&self, ncir: c_int, ntrace: c_int, name: &str) -> Result<usize> {
        let size = check(self.engine.get_data_size(ncir, ntrace), || {
            Error::Value(format!("cannot read data size of trace {}", name))
        })?;
        Ok(size as usize)
    }

    /// Trace value at time `t`, linearly interpolated between the nearest
    /// recorded points. Negative times are taken by magnitude.
    pub fn get_data(&self, name: &str, t: f64) -> Result<f64> {
        let ncir = self.ncir("get_data")?;
        let ntrace = self.trace_handle(ncir, name)?;
        self.data(ncir, ntrace, name, t)
    }

    pub(crate) fn data(&self, ncir: c_int, ntrace: c_int, name: &str, t: f64) -> Result<f64> {
        let t = t.abs();
        let mut d = 0.0;
        check(self.engine.get_data(ncir, ntrace, t, &mut d), || {
            Error::Value(format!("trace {} has no data at t={} s", name, t))
        })?;
        Ok(d)
    }

    /// Most recent `(time, value)` point of a trace.
    pub fn get_last_data(&self, name: &str) -> Result<(f64, f64)> {
        let ncir = self.ncir("get_last_data")?;
        let ntrace = self.trace_handle(ncir, name)?;
        let (mut t, mut d) = (0.0, 0.0);
        check(self.engine.get_last_data(ncir, ntrace, &mut t, &mut d), || {
            Error::Value(format!("trace {} has no data", name))
        })?;
        Ok((t, d))
    }

    /// `(time, value)` of point `n` (zero-based).
    pub fn get_data_at(&self, name: &str, n: i64) -> Result<(f64, f64)> {
        let ncir = self.ncir("get_data_at")?;
        let ntrace = self.trace_handle(ncir, name)?;
        let size = self.data_size(ncir, ntrace, name)?;
        let idx = checked_index(n, size, name)?;
        self.data_at(ncir, ntrace, name, idx)
    }

    pub(crate) fn data_at(&self, ncir: c_int, ntrace: c_int, name: &str, n: c_int) -> Result<(f64, f64)> {
        let (mut t, mut d) = (0.0, 0.0);
        check(self.engine.get_data_at(ncir, ntrace, n, &mut t, &mut d), || {
            Error::Value(format!("trace {}: no data point at index {}", name, n))
        })?;
        Ok((t, d))
    }

    // ========================================================================
    // Inputs and Outputs
    // ========================================================================

    fn input_handle(&self, ncir: c_int, name: &str) -> Result<c_int> {
        let c_name = cstring(name)?;
        check(self.engine.get_input(ncir, &c_name), || {
            Error::Trace(format!("input {} does not exist in circuit", name))
        })
    }

    fn output_handle(&self, ncir: c_int, name: &str) -> Result<c_int> {
        let c_name = cstring(name)?;
        check(self.engine.get_output(ncir, &c_name), || {
            Error::Trace(format!("output {} does not exist in circuit", name))
        })
    }

    /// Drive the voltage or current of input `name`.
    pub fn set_input_value(&self, name: &str, v: f64) -> Result<()> {
        let ncir = self.ncir("set_input_value")?;
        let nin = self.input_handle(ncir, name)?;
        check(self.engine.set_input_value(ncir, nin, v), || {
            Error::Value(format!("input {} rejected value {}", name, v))
        })?;
        Ok(())
    }

    /// Drive input `name` to the high or low logical level from the
    /// transient settings.
    pub fn set_input_logical_value(&self, name: &str, high: bool) -> Result<()> {
        let ncir = self.ncir("set_input_logical_value")?;
        let nin = self.input_handle(ncir, name)?;
        check(
            self.engine.set_input_logical_value(ncir, nin, c_int::from(high)),
            || Error::Value(format!("input {} rejected logical value {}", name, high)),
        )?;
        Ok(())
    }

    pub fn get_output_value(&self, name: &str) -> Result<f64> {
        let ncir = self.ncir("get_output_value")?;
        let nout = self.output_handle(ncir, name)?;
        let mut v = 0.0;
        check(self.engine.get_output_value(ncir, nout, &mut v), || {
            Error::Value(format!("output {} not valid", name))
        })?;
        Ok(v)
    }

    /// True when output `name` is at or above the logical threshold.
    pub fn get_output_logical_value(&self, name: &str) -> Result<bool> {
        let ncir = self.ncir("get_output_logical_value")?;
        let nout = self.output_handle(ncir, name)?;
        let mut i: c_int = 0;
        check(self.engine.get_output_logical_value(ncir, nout, &mut i), || {
            Error::Value(format!("output {} not valid", name))
        })?;
        Ok(i != 0)
    }

    // ========================================================================
    // Simulation Control
    // ========================================================================

    /// Maximum calculation step. Without it the schematic's own step is used.
    pub fn set_step(&self, step: f64) -> Result<()> {
        let ncir = self.ncir("set_step")?;
        let step = step.abs();
        check(self.engine.set_step(ncir, step), || {
            Error::Value(format!("step {} not valid", step))
        })?;
        Ok(())
    }

    /// Time allowed for one simulation step, in seconds. 0 disables the check.
    pub fn set_timeout(&self, seconds: i32) -> Result<()> {
        let ncir = self.ncir("set_timeout")?;
        let seconds = seconds.saturating_abs();
        check(self.engine.set_timeout(ncir, seconds), || {
            Error::Value(format!("timeout {} not valid", seconds))
        })?;
        Ok(())
    }

    pub fn get_simulation_time(&self) -> Result<f64> {
        let ncir = self.ncir("get_simulation_time")?;
        let mut t = 0.0;
        check(self.engine.get_simulation_time(ncir, &mut t), || {
            Error::Value("cannot read simulation time".to_string())
        })?;
        Ok(t)
    }

    /// Reset the clock to 0, drop old data and compute the t=0 state.
    pub fn start(&self) -> Result<()> {
        let ncir = self.ncir("start")?;
        check(self.engine.start(ncir), || {
            Error::Simulate("cannot start simulation".to_string())
        })?;
        log::debug!("document {}: simulation started", ncir);
        Ok(())
    }

    /// Simulate at least `interval` seconds. The step is kept, so the last
    /// point may lie past the requested end.
    pub fn simulate(&self, interval: f64) -> Result<()> {
        let ncir = self.ncir("simulate")?;
        let interval = interval.abs();
        check(self.engine.simulate(ncir, interval), || {
            Error::Simulate(format!("simulate failed for interval={} s", interval))
        })?;
        Ok(())
    }

    /// Simulate exactly `interval` seconds, shrinking the last step if needed.
    pub fn simulate_interval(&self, interval: f64) -> Result<()> {
        let ncir = self.ncir("simulate_interval")?;
        let interval = interval.abs();
        check(self.engine.simulate_interval(ncir, interval), || {
            Error::Simulate(format!("simulate_interval failed for interval={} s", interval))
        })?;
        Ok(())
    }

    pub fn simulate_step(&self) -> Result<()> {
        let ncir = self.ncir("simulate_step")?;
        check(self.engine.simulate_step(ncir), || {
            Error::Simulate("cannot perform one simulation step".to_string())
        })?;
        Ok(())
    }

    /// AC analysis with the settings stored in the schematic.
    pub fn simulate_ac(&self) -> Result<()> {
        let ncir = self.ncir("simulate_ac")?;
        check(self.engine.calc_ac(ncir), || {
            Error::Simulate("cannot run AC simulation".to_string())
        })?;
        log::debug!("document {}: AC analysis done", ncir);
        Ok(())
    }

    /// Store current component states as their initial conditions.
    /// The schematic file itself is not written.
    pub fn save_ic(&self) -> Result<()> {
        let ncir = self.ncir("save_ic")?;
        check(self.engine.save_ic(ncir), || {
            Error::Save("cannot save initial conditions into components".to_string())
        })?;
        Ok(())
    }

    /// Drop all transient data but the last point.
    pub fn delete_old_data(&self) -> Result<()> {
        let ncir = self.ncir("delete_old_data")?;
        check(self.engine.delete_old_data(ncir), || {
            Error::Delete("cannot delete old data".to_string())
        })?;
        Ok(())
    }

    pub fn save_data(&self, name: &str, dir: Option<&Path>) -> Result<PathBuf> {
        let ncir = self.ncir("save_data")?;
        let file = paths::resolve_file(name, TRANSIENT_DATA_EXT, dir, &current_dir()?)?;
        let c_file = path_cstring(&file)?;
        check(self.engine.save_data(ncir, &c_file), || {
            Error::Save(format!("cannot save transient data to {}", file.display()))
        })?;
        Ok(file)
    }

    // ========================================================================
    // AC Traces
    // ========================================================================

    pub fn get_ac_data_size(&self, name: &str) -> Result<usize> {
        let ncir = self.ncir("get_ac_data_size")?;
        let ntrace = self.ac_trace_handle(ncir, name)?;
        self.ac_data_size(ncir, ntrace, name)
    }

    pub(crate) fn ac_data_size(&self, ncir: c_int, ntrace: c_int, name: &str) -> Result<usize> {
        let size = check(self.engine.get_ac_data_size(ncir, ntrace), || {
            Error::Value(format!("cannot read data size of AC trace {}", name))
        })?;
        Ok(size as usize)
    }

    /// `(frequency [Hz], magnitude, phase [deg])` of AC point `n`.
    pub fn get_ac_data_at(&self, name: &str, n: i64) -> Result<(f64, f64, f64)> {
        let ncir = self.ncir("get_ac_data_at")?;
        let ntrace = self.ac_trace_handle(ncir, name)?;
        let size = self.ac_data_size(ncir, ntrace, name)?;
        let idx = checked_index(n, size, name)?;
        self.ac_data_at(ncir, ntrace, name, idx)
    }

    pub(crate) fn ac_data_at(
        &self,
        ncir: c_int,
        ntrace: c_int,
        name: &str,
        n: c_int,
    ) -> Result<(f64, f64, f64)> {
        let (mut f, mut m, mut p) = (0.0, 0.0, 0.0);
        check(
            self.engine.get_ac_data_at(ncir, ntrace, n, &mut f, &mut m, &mut p),
            || Error::Value(format!("AC trace {}: no data point at index {}", name, n)),
        )?;
        Ok((f, m, p))
    }

    pub fn save_ac_data(&self, name: &str, dir: Option<&Path>) -> Result<PathBuf> {
        let ncir = self.ncir("save_ac_data")?;
        let file = paths::resolve_file(name, AC_DATA_EXT, dir, &current_dir()?)?;
        let c_file = path_cstring(&file)?;
        check(self.engine.save_ac_data(ncir, &c_file), || {
            Error::Save(format!("cannot save AC data to {}", file.display()))
        })?;
        Ok(file)
    }
}

impl<E: EngineApi> Drop for Nl5Client<E> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Validate a caller index against the trace size.
fn checked_index(n: i64, size: usize, name: &str) -> Result<c_int> {
    if n < 0 || n as u64 >= size as u64 {
        return Err(Error::Value(format!(
            "trace {}: index {} out of range, data size is {}",
            name, n, size
        )));
    }
    c_int::try_from(n).map_err(|_| Error::Value(format!("trace {}: index {} too large", name, n)))
}
