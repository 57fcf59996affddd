//! Foreign call table for the NL5 engine.
//!
//! [`EngineApi`] has one method per exported `NL5_*` entry point, with the
//! raw integer status passed straight through. [`NativeEngine`] implements it
//! over the dynamic library, resolving every symbol once at load time with
//! the exact C signature the engine exports.

use std::cell::Cell;
use std::ffi::CStr;
use std::marker::PhantomData;
use std::os::raw::{c_char, c_double, c_int};
use std::path::{Path, PathBuf};

use libloading::Library;

use crate::error::Result;

/// Raw engine status. Negative means failure; otherwise a handle, a count or 0.
pub type Status = c_int;

// ============================================================================
// Call Table
// ============================================================================

/// The engine's exported entry points, in call order of the C header.
///
/// Out-parameters are `&mut` references and text results are written into a
/// caller-sized byte buffer. Implementations must not interpret statuses;
/// that is the client's job.
pub trait EngineApi {
    fn get_error(&self) -> String;
    fn get_info(&self) -> String;
    fn get_license(&self, name: &CStr) -> Status;

    fn open(&self, name: &CStr) -> Status;
    fn close(&self, ncir: c_int) -> Status;
    fn save(&self, ncir: c_int) -> Status;
    fn save_as(&self, ncir: c_int, name: &CStr) -> Status;

    fn get_value(&self, ncir: c_int, name: &CStr, v: &mut f64) -> Status;
    fn set_value(&self, ncir: c_int, name: &CStr, v: f64) -> Status;
    fn get_text(&self, ncir: c_int, name: &CStr, text: &mut [u8]) -> Status;
    fn set_text(&self, ncir: c_int, name: &CStr, text: &CStr) -> Status;

    fn get_param(&self, ncir: c_int, name: &CStr) -> Status;
    fn get_param_value(&self, ncir: c_int, npar: c_int, v: &mut f64) -> Status;
    fn set_param_value(&self, ncir: c_int, npar: c_int, v: f64) -> Status;
    fn get_param_text(&self, ncir: c_int, npar: c_int, text: &mut [u8]) -> Status;
    fn set_param_text(&self, ncir: c_int, npar: c_int, text: &CStr) -> Status;

    fn get_trace(&self, ncir: c_int, name: &CStr) -> Status;
    fn add_v_trace(&self, ncir: c_int, name: &CStr) -> Status;
    fn add_i_trace(&self, ncir: c_int, name: &CStr) -> Status;
    fn add_p_trace(&self, ncir: c_int, name: &CStr) -> Status;
    fn add_var_trace(&self, ncir: c_int, name: &CStr) -> Status;
    fn add_func_trace(&self, ncir: c_int, text: &CStr) -> Status;
    fn delete_trace(&self, ncir: c_int, ntrace: c_int) -> Status;

    fn set_step(&self, ncir: c_int, step: f64) -> Status;
    fn set_timeout(&self, ncir: c_int, t: c_int) -> Status;
    fn get_simulation_time(&self, ncir: c_int, t: &mut f64) -> Status;
    fn start(&self, ncir: c_int) -> Status;
    fn simulate(&self, ncir: c_int, interval: f64) -> Status;
    fn simulate_interval(&self, ncir: c_int, interval: f64) -> Status;
    fn simulate_step(&self, ncir: c_int) -> Status;
    fn save_ic(&self, ncir: c_int) -> Status;

    fn get_data_size(&self, ncir: c_int, ntrace: c_int) -> Status;
    fn get_data_at(&self, ncir: c_int, ntrace: c_int, n: c_int, t: &mut f64, data: &mut f64) -> Status;
    fn get_last_data(&self, ncir: c_int, ntrace: c_int, t: &mut f64, data: &mut f64) -> Status;
    fn get_data(&self, ncir: c_int, ntrace: c_int, t: f64, data: &mut f64) -> Status;
    fn delete_old_data(&self, ncir: c_int) -> Status;
    fn save_data(&self, ncir: c_int, name: &CStr) -> Status;

    fn get_input(&self, ncir: c_int, name: &CStr) -> Status;
    fn set_input_value(&self, ncir: c_int, nin: c_int, v: f64) -> Status;
    fn set_input_logical_value(&self, ncir: c_int, nin: c_int, i: c_int) -> Status;
    fn get_output(&self, ncir: c_int, name: &CStr) -> Status;
    fn get_output_value(&self, ncir: c_int, nout: c_int, v: &mut f64) -> Status;
    fn get_output_logical_value(&self, ncir: c_int, nout: c_int, i: &mut c_int) -> Status;

    fn calc_ac(&self, ncir: c_int) -> Status;
    fn get_ac_trace(&self, ncir: c_int, name: &CStr) -> Status;
    fn get_ac_data_size(&self, ncir: c_int, ntrace: c_int) -> Status;
    fn get_ac_data_at(
        &self,
        ncir: c_int,
        ntrace: c_int,
        n: c_int,
        f: &mut f64,
        mag: &mut f64,
        phase: &mut f64,
    ) -> Status;
    fn save_ac_data(&self, ncir: c_int, name: &CStr) -> Status;
}

// ============================================================================
// Signature Table
// ============================================================================

type StrFn = unsafe extern "C" fn() -> *const c_char;
type NameFn = unsafe extern "C" fn(*const c_char) -> c_int;
type CirFn = unsafe extern "C" fn(c_int) -> c_int;
type CirNameFn = unsafe extern "C" fn(c_int, *const c_char) -> c_int;
type CirIntFn = unsafe extern "C" fn(c_int, c_int) -> c_int;
type CirDoubleFn = unsafe extern "C" fn(c_int, c_double) -> c_int;
type CirDoubleOutFn = unsafe extern "C" fn(c_int, *mut c_double) -> c_int;
type CirNameDoubleOutFn = unsafe extern "C" fn(c_int, *const c_char, *mut c_double) -> c_int;
type CirNameDoubleFn = unsafe extern "C" fn(c_int, *const c_char, c_double) -> c_int;
type CirNameTextOutFn = unsafe extern "C" fn(c_int, *const c_char, *mut c_char, c_int) -> c_int;
type CirNameTextFn = unsafe extern "C" fn(c_int, *const c_char, *const c_char) -> c_int;
type CirIdxDoubleOutFn = unsafe extern "C" fn(c_int, c_int, *mut c_double) -> c_int;
type CirIdxDoubleFn = unsafe extern "C" fn(c_int, c_int, c_double) -> c_int;
type CirIdxTextOutFn = unsafe extern "C" fn(c_int, c_int, *mut c_char, c_int) -> c_int;
type CirIdxTextFn = unsafe extern "C" fn(c_int, c_int, *const c_char) -> c_int;
type CirIdxIntFn = unsafe extern "C" fn(c_int, c_int, c_int) -> c_int;
type CirIdxIntOutFn = unsafe extern "C" fn(c_int, c_int, *mut c_int) -> c_int;
type DataAtFn = unsafe extern "C" fn(c_int, c_int, c_int, *mut c_double, *mut c_double) -> c_int;
type LastDataFn = unsafe extern "C" fn(c_int, c_int, *mut c_double, *mut c_double) -> c_int;
type DataFn = unsafe extern "C" fn(c_int, c_int, c_double, *mut c_double) -> c_int;
type AcDataAtFn =
    unsafe extern "C" fn(c_int, c_int, c_int, *mut c_double, *mut c_double, *mut c_double) -> c_int;

/// Function pointers resolved from the library. Only valid while the
/// `Library` they came from is alive.
struct Symbols {
    get_error: StrFn,
    get_info: StrFn,
    get_license: NameFn,
    open: NameFn,
    close: CirFn,
    save: CirFn,
    save_as: CirNameFn,
    get_value: CirNameDoubleOutFn,
    set_value: CirNameDoubleFn,
    get_text: CirNameTextOutFn,
    set_text: CirNameTextFn,
    get_param: CirNameFn,
    get_param_value: CirIdxDoubleOutFn,
    set_param_value: CirIdxDoubleFn,
    get_param_text: CirIdxTextOutFn,
    set_param_text: CirIdxTextFn,
    get_trace: CirNameFn,
    add_v_trace: CirNameFn,
    add_i_trace: CirNameFn,
    add_p_trace: CirNameFn,
    add_var_trace: CirNameFn,
    add_func_trace: CirNameFn,
    delete_trace: CirIntFn,
    set_step: CirDoubleFn,
    set_timeout: CirIntFn,
    get_simulation_time: CirDoubleOutFn,
    start: CirFn,
    simulate: CirDoubleFn,
    simulate_interval: CirDoubleFn,
    simulate_step: CirFn,
    save_ic: CirFn,
    get_data_size: CirIntFn,
    get_data_at: DataAtFn,
    get_last_data: LastDataFn,
    get_data: DataFn,
    delete_old_data: CirFn,
    save_data: CirNameFn,
    get_input: CirNameFn,
    set_input_value: CirIdxDoubleFn,
    set_input_logical_value: CirIdxIntFn,
    get_output: CirNameFn,
    get_output_value: CirIdxDoubleOutFn,
    get_output_logical_value: CirIdxIntOutFn,
    calc_ac: CirFn,
    get_ac_trace: CirNameFn,
    get_ac_data_size: CirIntFn,
    get_ac_data_at: AcDataAtFn,
    save_ac_data: CirNameFn,
}

/// Copy a function pointer out of the library.
///
/// # Safety
/// `T` must match the exported symbol's real signature.
unsafe fn resolve<T: Copy>(lib: &Library, name: &[u8]) -> Result<T> {
    let symbol: libloading::Symbol<T> = lib.get(name)?;
    Ok(*symbol)
}

impl Symbols {
    unsafe fn load(lib: &Library) -> Result<Self> {
        Ok(Self {
            get_error: resolve(lib, b"NL5_GetError\0")?,
            get_info: resolve(lib, b"NL5_GetInfo\0")?,
            get_license: resolve(lib, b"NL5_GetLicense\0")?,
            open: resolve(lib, b"NL5_Open\0")?,
            close: resolve(lib, b"NL5_Close\0")?,
            save: resolve(lib, b"NL5_Save\0")?,
            save_as: resolve(lib, b"NL5_SaveAs\0")?,
            get_value: resolve(lib, b"NL5_GetValue\0")?,
            set_value: resolve(lib, b"NL5_SetValue\0")?,
            get_text: resolve(lib, b"NL5_GetText\0")?,
            set_text: resolve(lib, b"NL5_SetText\0")?,
            get_param: resolve(lib, b"NL5_GetParam\0")?,
            get_param_value: resolve(lib, b"NL5_GetParamValue\0")?,
            set_param_value: resolve(lib, b"NL5_SetParamValue\0")?,
            get_param_text: resolve(lib, b"NL5_GetParamText\0")?,
            set_param_text: resolve(lib, b"NL5_SetParamText\0")?,
            get_trace: resolve(lib, b"NL5_GetTrace\0")?,
            add_v_trace: resolve(lib, b"NL5_AddVTrace\0")?,
            add_i_trace: resolve(lib, b"NL5_AddITrace\0")?,
            add_p_trace: resolve(lib, b"NL5_AddPTrace\0")?,
            add_var_trace: resolve(lib, b"NL5_AddVarTrace\0")?,
            add_func_trace: resolve(lib, b"NL5_AddFuncTrace\0")?,
            delete_trace: resolve(lib, b"NL5_DeleteTrace\0")?,
            set_step: resolve(lib, b"NL5_SetStep\0")?,
            set_timeout: resolve(lib, b"NL5_SetTimeout\0")?,
            get_simulation_time: resolve(lib, b"NL5_GetSimulationTime\0")?,
            start: resolve(lib, b"NL5_Start\0")?,
            simulate: resolve(lib, b"NL5_Simulate\0")?,
            simulate_interval: resolve(lib, b"NL5_SimulateInterval\0")?,
            simulate_step: resolve(lib, b"NL5_SimulateStep\0")?,
            save_ic: resolve(lib, b"NL5_SaveIC\0")?,
            get_data_size: resolve(lib, b"NL5_GetDataSize\0")?,
            get_data_at: resolve(lib, b"NL5_GetDataAt\0")?,
            get_last_data: resolve(lib, b"NL5_GetLastData\0")?,
            get_data: resolve(lib, b"NL5_GetData\0")?,
            delete_old_data: resolve(lib, b"NL5_DeleteOldData\0")?,
            save_data: resolve(lib, b"NL5_SaveData\0")?,
            get_input: resolve(lib, b"NL5_GetInput\0")?,
            set_input_value: resolve(lib, b"NL5_SetInputValue\0")?,
            set_input_logical_value: resolve(lib, b"NL5_SetInputLogicalValue\0")?,
            get_output: resolve(lib, b"NL5_GetOutput\0")?,
            get_output_value: resolve(lib, b"NL5_GetOutputValue\0")?,
            get_output_logical_value: resolve(lib, b"NL5_GetOutputLogicalValue\0")?,
            calc_ac: resolve(lib, b"NL5_CalcAC\0")?,
            get_ac_trace: resolve(lib, b"NL5_GetACTrace\0")?,
            get_ac_data_size: resolve(lib, b"NL5_GetACDataSize\0")?,
            get_ac_data_at: resolve(lib, b"NL5_GetACDataAt\0")?,
            save_ac_data: resolve(lib, b"NL5_SaveACData\0")?,
        })
    }
}

// ============================================================================
// Native Engine
// ============================================================================

/// The NL5 engine loaded from its dynamic library.
///
/// The engine keeps process-wide state, so this type is deliberately not
/// `Sync`.
pub struct NativeEngine {
    symbols: Symbols,
    path: PathBuf,
    // Dropped last: the symbol table points into it.
    _lib: Library,
    _not_sync: PhantomData<Cell<()>>,
}

impl NativeEngine {
    /// Load the library at `path` and resolve every entry point.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        log::debug!("loading NL5 engine from {}", path.display());
        // SAFETY: loading runs the library's initializers; the NL5 DLL has none
        // beyond its own state setup. Symbol types mirror the C header.
        let (lib, symbols) = unsafe {
            let lib = Library::new(&path)?;
            let symbols = Symbols::load(&lib)?;
            (lib, symbols)
        };
        log::info!("loaded NL5 engine from {}", path.display());
        Ok(Self {
            symbols,
            path,
            _lib: lib,
            _not_sync: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn text_len(buf: &[u8]) -> c_int {
    clamp_len(buf.len())
}

fn clamp_len(len: usize) -> c_int {
    c_int::try_from(len).unwrap_or(c_int::MAX)
}

/// Copy a static engine string. Null reads as empty.
unsafe fn engine_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

// SAFETY (all methods): arguments are valid NUL-terminated strings, live
// `&mut` out-parameters, or buffers whose real length is passed alongside.
impl EngineApi for NativeEngine {
    fn get_error(&self) -> String {
        unsafe { engine_string((self.symbols.get_error)()) }
    }

    fn get_info(&self) -> String {
        unsafe { engine_string((self.symbols.get_info)()) }
    }

    fn get_license(&self, name: &CStr) -> Status {
        unsafe { (self.symbols.get_license)(name.as_ptr()) }
    }

    fn open(&self, name: &CStr) -> Status {
        unsafe { (self.symbols.open)(name.as_ptr()) }
    }

    fn close(&self, ncir: c_int) -> Status {
        unsafe { (self.symbols.close)(ncir) }
    }

    fn save(&self, ncir: c_int) -> Status {
        unsafe { (self.symbols.save)(ncir) }
    }

    fn save_as(&self, ncir: c_int, name: &CStr) -> Status {
        unsafe { (self.symbols.save_as)(ncir, name.as_ptr()) }
    }

    fn get_value(&self, ncir: c_int, name: &CStr, v: &mut f64) -> Status {
        unsafe { (self.symbols.get_value)(ncir, name.as_ptr(), v) }
    }

    fn set_value(&self, ncir: c_int, name: &CStr, v: f64) -> Status {
        unsafe { (self.symbols.set_value)(ncir, name.as_ptr(), v) }
    }

    fn get_text(&self, ncir: c_int, name: &CStr, text: &mut [u8]) -> Status {
        let len = text_len(text);
        unsafe { (self.symbols.get_text)(ncir, name.as_ptr(), text.as_mut_ptr().cast(), len) }
    }

    fn set_text(&self, ncir: c_int, name: &CStr, text: &CStr) -> Status {
        unsafe { (self.symbols.set_text)(ncir, name.as_ptr(), text.as_ptr()) }
    }

    fn get_param(&self, ncir: c_int, name: &CStr) -> Status {
        unsafe { (self.symbols.get_param)(ncir, name.as_ptr()) }
    }

    fn get_param_value(&self, ncir: c_int, npar: c_int, v: &mut f64) -> Status {
        unsafe { (self.symbols.get_param_value)(ncir, npar, v) }
    }

    fn set_param_value(&self, ncir: c_int, npar: c_int, v: f64) -> Status {
        unsafe { (self.symbols.set_param_value)(ncir, npar, v) }
    }

    fn get_param_text(&self, ncir: c_int, npar: c_int, text: &mut [u8]) -> Status {
        let len = text_len(text);
        unsafe { (self.symbols.get_param_text)(ncir, npar, text.as_mut_ptr().cast(), len) }
    }

    fn set_param_text(&self, ncir: c_int, npar: c_int, text: &CStr) -> Status {
        unsafe { (self.symbols.set_param_text)(ncir, npar, text.as_ptr()) }
    }

    fn get_trace(&self, ncir: c_int, name: &CStr) -> Status {
        unsafe { (self.symbols.get_trace)(ncir, name.as_ptr()) }
    }

    fn add_v_trace(&self, ncir: c_int, name: &CStr) -> Status {
        unsafe { (self.symbols.add_v_trace)(ncir, name.as_ptr()) }
    }

    fn add_i_trace(&self, ncir: c_int, name: &CStr) -> Status {
        unsafe { (self.symbols.add_i_trace)(ncir, name.as_ptr()) }
    }

    fn add_p_trace(&self, ncir: c_int, name: &CStr) -> Status {
        unsafe { (self.symbols.add_p_trace)(ncir, name.as_ptr()) }
    }

    fn add_var_trace(&self, ncir: c_int, name: &CStr) -> Status {
        unsafe { (self.symbols.add_var_trace)(ncir, name.as_ptr()) }
    }

    fn add_func_trace(&self, ncir: c_int, text: &CStr) -> Status {
        unsafe { (self.symbols.add_func_trace)(ncir, text.as_ptr()) }
    }

    fn delete_trace(&self, ncir: c_int, ntrace: c_int) -> Status {
        unsafe { (self.symbols.delete_trace)(ncir, ntrace) }
    }

    fn set_step(&self, ncir: c_int, step: f64) -> Status {
        unsafe { (self.symbols.set_step)(ncir, step) }
    }

    fn set_timeout(&self, ncir: c_int, t: c_int) -> Status {
        unsafe { (self.symbols.set_timeout)(ncir, t) }
    }

    fn get_simulation_time(&self, ncir: c_int, t: &mut f64) -> Status {
        unsafe { (self.symbols.get_simulation_time)(ncir, t) }
    }

    fn start(&self, ncir: c_int) -> Status {
        unsafe { (self.symbols.start)(ncir) }
    }

    fn simulate(&self, ncir: c_int, interval: f64) -> Status {
        unsafe { (self.symbols.simulate)(ncir, interval) }
    }

    fn simulate_interval(&self, ncir: c_int, interval: f64) -> Status {
        unsafe { (self.symbols.simulate_interval)(ncir, interval) }
    }

    fn simulate_step(&self, ncir: c_int) -> Status {
        unsafe { (self.symbols.simulate_step)(ncir) }
    }

    fn save_ic(&self, ncir: c_int) -> Status {
        unsafe { (self.symbols.save_ic)(ncir) }
    }

    fn get_data_size(&self, ncir: c_int, ntrace: c_int) -> Status {
        unsafe { (self.symbols.get_data_size)(ncir, ntrace) }
    }

    fn get_data_at(&self, ncir: c_int, ntrace: c_int, n: c_int, t: &mut f64, data: &mut f64) -> Status {
        unsafe { (self.symbols.get_data_at)(ncir, ntrace, n, t, data) }
    }

    fn get_last_data(&self, ncir: c_int, ntrace: c_int, t: &mut f64, data: &mut f64) -> Status {
        unsafe { (self.symbols.get_last_data)(ncir, ntrace, t, data) }
    }

    fn get_data(&self, ncir: c_int, ntrace: c_int, t: f64, data: &mut f64) -> Status {
        unsafe { (self.symbols.get_data)(ncir, ntrace, t, data) }
    }

    fn delete_old_data(&self, ncir: c_int) -> Status {
        unsafe { (self.symbols.delete_old_data)(ncir) }
    }

    fn save_data(&self, ncir: c_int, name: &CStr) -> Status {
        unsafe { (self.symbols.save_data)(ncir, name.as_ptr()) }
    }

    fn get_input(&self, ncir: c_int, name: &CStr) -> Status {
        unsafe { (self.symbols.get_input)(ncir, name.as_ptr()) }
    }

    fn set_input_value(&self, ncir: c_int, nin: c_int, v: f64) -> Status {
        unsafe { (self.symbols.set_input_value)(ncir, nin, v) }
    }

    fn set_input_logical_value(&self, ncir: c_int, nin: c_int, i: c_int) -> Status {
        unsafe { (self.symbols.set_input_logical_value)(ncir, nin, i) }
    }

    fn get_output(&self, ncir: c_int, name: &CStr) -> Status {
        unsafe { (self.symbols.get_output)(ncir, name.as_ptr()) }
    }

    fn get_output_value(&self, ncir: c_int, nout: c_int, v: &mut f64) -> Status {
        unsafe { (self.symbols.get_output_value)(ncir, nout, v) }
    }

    fn get_output_logical_value(&self, ncir: c_int, nout: c_int, i: &mut c_int) -> Status {
        unsafe { (self.symbols.get_output_logical_value)(ncir, nout, i) }
    }

    fn calc_ac(&self, ncir: c_int) -> Status {
        unsafe { (self.symbols.calc_ac)(ncir) }
    }

    fn get_ac_trace(&self, ncir: c_int, name: &CStr) -> Status {
        unsafe { (self.symbols.get_ac_trace)(ncir, name.as_ptr()) }
    }

    fn get_ac_data_size(&self, ncir: c_int, ntrace: c_int) -> Status {
        unsafe { (self.symbols.get_ac_data_size)(ncir, ntrace) }
    }

    fn get_ac_data_at(
        &self,
        ncir: c_int,
        ntrace: c_int,
        n: c_int,
        f: &mut f64,
        mag: &mut f64,
        phase: &mut f64,
    ) -> Status {
        unsafe { (self.symbols.get_ac_data_at)(ncir, ntrace, n, f, mag, phase) }
    }

    fn save_ac_data(&self, ncir: c_int, name: &CStr) -> Status {
        unsafe { (self.symbols.save_ac_data)(ncir, name.as_ptr()) }
    }
}
