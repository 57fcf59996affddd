//! In-memory stand-in for the NL5 engine, used by the unit tests.
//!
//! It mimics the observable contract of the DLL: integer handles, negative
//! statuses on failure, a stepping clock, linear interpolation in
//! `get_data`, and a last-error string. Every entry point records its name
//! so tests can assert that no call reached the engine.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::CStr;
use std::os::raw::c_int;
use std::path::Path;
use std::rc::Rc;

use crate::ffi::{EngineApi, Status};

const DEFAULT_STEP: f64 = 0.1;
const LOGIC_HIGH: f64 = 5.0;
const LOGIC_THRESHOLD: f64 = 2.5;
const AC_POINTS: usize = 21;

#[derive(Debug, Clone)]
enum ParamKind {
    Formula,
    /// Initial condition; blank until set.
    Ic,
    Switch,
    List(Vec<&'static str>),
}

#[derive(Debug, Clone)]
struct Param {
    name: String,
    kind: ParamKind,
    value: Option<f64>,
    text: String,
}

impl Param {
    fn new(name: &str, kind: ParamKind, value: Option<f64>, text: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            value,
            text: text.to_string(),
        }
    }

    fn set_value(&mut self, v: f64) -> bool {
        match &self.kind {
            ParamKind::Formula | ParamKind::Ic => {
                self.value = Some(v);
                self.text = v.to_string();
                true
            }
            ParamKind::Switch if v == 0.0 || v == 1.0 => {
                self.value = Some(v);
                self.text = if v == 1.0 { "On" } else { "Off" }.to_string();
                true
            }
            ParamKind::List(items) if v >= 0.0 && (v as usize) < items.len() && v.fract() == 0.0 => {
                self.text = items[v as usize].to_string();
                self.value = Some(v);
                true
            }
            _ => false,
        }
    }

    fn set_text(&mut self, text: &str) -> bool {
        match self.kind.clone() {
            kind @ (ParamKind::Formula | ParamKind::Ic) => {
                if matches!(kind, ParamKind::Ic) && text.is_empty() {
                    self.value = None;
                    self.text.clear();
                    return true;
                }
                match text.trim_start_matches('=').parse::<f64>() {
                    Ok(v) => {
                        self.value = Some(v);
                        self.text = text.to_string();
                        true
                    }
                    Err(_) => false,
                }
            }
            ParamKind::Switch => match text {
                "On" => self.set_value(1.0),
                "Off" => self.set_value(0.0),
                _ => false,
            },
            ParamKind::List(items) => match items.iter().position(|item| *item == text) {
                Some(idx) => self.set_value(idx as f64),
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone)]
struct Trace {
    name: String,
    samples: Vec<(f64, f64)>,
}

#[derive(Debug, Clone)]
struct AcTrace {
    name: String,
    samples: Vec<(f64, f64, f64)>,
}

#[derive(Debug, Clone)]
struct Document {
    params: Vec<Param>,
    traces: Vec<Option<Trace>>,
    ac_traces: Vec<AcTrace>,
    input: f64,
    time: f64,
    started: bool,
    step: f64,
    timeout: c_int,
}

impl Document {
    fn new() -> Self {
        Self {
            params: vec![
                Param::new("R1.R", ParamKind::Formula, Some(1000.0), "1k"),
                Param::new("C1.C", ParamKind::Formula, Some(1e-6), "1u"),
                Param::new("C1.IC", ParamKind::Ic, None, ""),
                Param::new("S1.State", ParamKind::Switch, Some(1.0), "On"),
                Param::new("V1.Type", ParamKind::List(vec!["DC", "Pulse", "Sin"]), Some(0.0), "DC"),
            ],
            traces: Vec::new(),
            ac_traces: vec![AcTrace {
                name: "V(out)".to_string(),
                samples: Vec::new(),
            }],
            input: 0.0,
            time: 0.0,
            started: false,
            step: DEFAULT_STEP,
            timeout: 0,
        }
    }

    fn param(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    fn gain(&self) -> f64 {
        self.param("R1.R")
            .and_then(|idx| self.params[idx].value)
            .unwrap_or(1000.0)
            / 1000.0
    }

    fn trace(&self, name: &str) -> Option<usize> {
        self.traces
            .iter()
            .position(|t| t.as_ref().map_or(false, |t| t.name == name))
    }

    fn trace_mut(&mut self, ntrace: c_int) -> Option<&mut Trace> {
        usize::try_from(ntrace)
            .ok()
            .and_then(|idx| self.traces.get_mut(idx))
            .and_then(Option::as_mut)
    }

    fn trace_ref(&self, ntrace: c_int) -> Option<&Trace> {
        usize::try_from(ntrace)
            .ok()
            .and_then(|idx| self.traces.get(idx))
            .and_then(Option::as_ref)
    }

    fn add_trace(&mut self, name: String) -> Status {
        if self.trace(&name).is_none() {
            self.traces.push(Some(Trace {
                name,
                samples: Vec::new(),
            }));
        }
        0
    }

    fn record(&mut self) {
        let t = self.time;
        let v = self.gain() * t * t;
        for trace in self.traces.iter_mut().flatten() {
            trace.samples.push((t, v));
        }
    }

    fn start(&mut self) {
        self.time = 0.0;
        self.started = true;
        for trace in self.traces.iter_mut().flatten() {
            trace.samples.clear();
        }
        self.record();
    }

    fn ensure_started(&mut self) {
        if !self.started {
            self.start();
        }
    }

    fn advance(&mut self, dt: f64) {
        self.time += dt;
        self.record();
    }
}

#[derive(Debug)]
struct MockState {
    calls: Vec<&'static str>,
    documents: HashMap<c_int, Document>,
    next_handle: c_int,
    opened: Vec<String>,
    closed: Vec<c_int>,
    saved: Vec<String>,
    licenses: Vec<String>,
    last_error: String,
    fail_simulation: bool,
}

/// Cloning shares state, so a test can keep a view after the client is dropped.
#[derive(Debug, Clone)]
pub struct MockEngine {
    state: Rc<RefCell<MockState>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn text(s: &CStr) -> String {
    s.to_string_lossy().into_owned()
}

fn stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState {
                calls: Vec::new(),
                documents: HashMap::new(),
                next_handle: 0,
                opened: Vec::new(),
                closed: Vec::new(),
                saved: Vec::new(),
                licenses: Vec::new(),
                last_error: "OK".to_string(),
                fail_simulation: false,
            })),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.borrow().calls.clone()
    }

    pub fn opened_paths(&self) -> Vec<String> {
        self.state.borrow().opened.clone()
    }

    pub fn closed_handles(&self) -> Vec<c_int> {
        self.state.borrow().closed.clone()
    }

    pub fn saved_paths(&self) -> Vec<String> {
        self.state.borrow().saved.clone()
    }

    pub fn license_paths(&self) -> Vec<String> {
        self.state.borrow().licenses.clone()
    }

    pub fn step(&self, ncir: c_int) -> Option<f64> {
        self.state.borrow().documents.get(&ncir).map(|d| d.step)
    }

    pub fn timeout(&self, ncir: c_int) -> Option<c_int> {
        self.state.borrow().documents.get(&ncir).map(|d| d.timeout)
    }

    pub fn fail_simulation(&self, fail: bool) {
        self.state.borrow_mut().fail_simulation = fail;
    }

    /// Run `f` on document `ncir`; unknown handles and `false` results fail
    /// with `err` as the engine's last error.
    fn with_doc<T>(
        &self,
        call: &'static str,
        ncir: c_int,
        err: &str,
        f: impl FnOnce(&mut Document) -> Option<T>,
    ) -> Result<T, Status> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        let result = match state.documents.get_mut(&ncir) {
            Some(doc) => f(doc),
            None => None,
        };
        match result {
            Some(v) => {
                state.last_error = "OK".to_string();
                Ok(v)
            }
            None => {
                state.last_error = err.to_string();
                Err(-1)
            }
        }
    }

    fn status(&self, call: &'static str, ncir: c_int, err: &str, f: impl FnOnce(&mut Document) -> bool) -> Status {
        match self.with_doc(call, ncir, err, |doc| f(doc).then_some(())) {
            Ok(()) => 0,
            Err(s) => s,
        }
    }

    fn simulation(&self, call: &'static str, ncir: c_int, f: impl FnOnce(&mut Document) -> bool) -> Status {
        let fail = self.state.borrow().fail_simulation;
        self.status(call, ncir, "Simulation failed: timeout at S1", |doc| !fail && f(doc))
    }

    fn save_file(&self, call: &'static str, ncir: c_int, name: &CStr) -> Status {
        let path = text(name);
        let ok = !path.contains("readonly");
        let status = self.status(call, ncir, "Cannot write file", |_| ok);
        if status == 0 {
            self.state.borrow_mut().saved.push(path);
        }
        status
    }
}

fn write_text(buf: &mut [u8], s: &str) {
    if buf.is_empty() {
        return;
    }
    let n = s.len().min(buf.len() - 1);
    buf[..n].copy_from_slice(&s.as_bytes()[..n]);
    buf[n] = 0;
}

fn interpolate(samples: &[(f64, f64)], t: f64) -> Option<f64> {
    let first = samples.first()?;
    if t < first.0 {
        return None;
    }
    for pair in samples.windows(2) {
        let ((t0, v0), (t1, v1)) = (pair[0], pair[1]);
        if t >= t0 && t <= t1 {
            if t1 == t0 {
                return Some(v0);
            }
            return Some(v0 + (v1 - v0) * (t - t0) / (t1 - t0));
        }
    }
    let last = samples.last()?;
    (t == last.0).then_some(last.1)
}

impl EngineApi for MockEngine {
    fn get_error(&self) -> String {
        self.state.borrow().last_error.clone()
    }

    fn get_info(&self) -> String {
        "NL5 DLL (mock) v3.0".to_string()
    }

    fn get_license(&self, name: &CStr) -> Status {
        let path = text(name);
        let mut state = self.state.borrow_mut();
        state.calls.push("get_license");
        let status = match stem(&path).as_str() {
            "demo" => 1,
            "revoked" => -1,
            _ => 0,
        };
        state.licenses.push(path);
        status
    }

    fn open(&self, name: &CStr) -> Status {
        let path = text(name);
        let mut state = self.state.borrow_mut();
        state.calls.push("open");
        if stem(&path).starts_with("missing") {
            state.last_error = format!("Cannot open file {}", path);
            return -1;
        }
        let ncir = state.next_handle;
        state.next_handle += 1;
        state.documents.insert(ncir, Document::new());
        state.opened.push(path);
        ncir
    }

    fn close(&self, ncir: c_int) -> Status {
        let mut state = self.state.borrow_mut();
        state.calls.push("close");
        match state.documents.remove(&ncir) {
            Some(_) => {
                state.closed.push(ncir);
                0
            }
            None => -1,
        }
    }

    fn save(&self, ncir: c_int) -> Status {
        self.status("save", ncir, "Cannot save", |_| true)
    }

    fn save_as(&self, ncir: c_int, name: &CStr) -> Status {
        self.save_file("save_as", ncir, name)
    }

    fn get_value(&self, ncir: c_int, name: &CStr, v: &mut f64) -> Status {
        let name = text(name);
        match self.with_doc("get_value", ncir, "Parameter not found", |doc| {
            doc.param(&name).and_then(|idx| doc.params[idx].value)
        }) {
            Ok(value) => {
                *v = value;
                0
            }
            Err(s) => s,
        }
    }

    fn set_value(&self, ncir: c_int, name: &CStr, v: f64) -> Status {
        let name = text(name);
        self.status("set_value", ncir, "Parameter not found", |doc| {
            doc.param(&name).map_or(false, |idx| doc.params[idx].set_value(v))
        })
    }

    fn get_text(&self, ncir: c_int, name: &CStr, buf: &mut [u8]) -> Status {
        let name = text(name);
        match self.with_doc("get_text", ncir, "Parameter not found", |doc| {
            doc.param(&name).map(|idx| doc.params[idx].text.clone())
        }) {
            Ok(s) => {
                write_text(buf, &s);
                0
            }
            Err(s) => s,
        }
    }

    fn set_text(&self, ncir: c_int, name: &CStr, value: &CStr) -> Status {
        let (name, value) = (text(name), text(value));
        self.status("set_text", ncir, "Parameter not found", |doc| {
            doc.param(&name).map_or(false, |idx| doc.params[idx].set_text(&value))
        })
    }

    fn get_param(&self, ncir: c_int, name: &CStr) -> Status {
        let name = text(name);
        match self.with_doc("get_param", ncir, "Parameter not found", |doc| doc.param(&name)) {
            Ok(idx) => idx as c_int,
            Err(s) => s,
        }
    }

    fn get_param_value(&self, ncir: c_int, npar: c_int, v: &mut f64) -> Status {
        match self.with_doc("get_param_value", ncir, "Bad parameter", |doc| {
            doc.params.get(npar as usize).and_then(|p| p.value)
        }) {
            Ok(value) => {
                *v = value;
                0
            }
            Err(s) => s,
        }
    }

    fn set_param_value(&self, ncir: c_int, npar: c_int, v: f64) -> Status {
        self.status("set_param_value", ncir, "Bad parameter", |doc| {
            doc.params.get_mut(npar as usize).map_or(false, |p| p.set_value(v))
        })
    }

    fn get_param_text(&self, ncir: c_int, npar: c_int, buf: &mut [u8]) -> Status {
        match self.with_doc("get_param_text", ncir, "Bad parameter", |doc| {
            doc.params.get(npar as usize).map(|p| p.text.clone())
        }) {
            Ok(s) => {
                write_text(buf, &s);
                0
            }
            Err(s) => s,
        }
    }

    fn set_param_text(&self, ncir: c_int, npar: c_int, value: &CStr) -> Status {
        let value = text(value);
        self.status("set_param_text", ncir, "Bad parameter", |doc| {
            doc.params.get_mut(npar as usize).map_or(false, |p| p.set_text(&value))
        })
    }

    fn get_trace(&self, ncir: c_int, name: &CStr) -> Status {
        let name = text(name);
        match self.with_doc("get_trace", ncir, "Trace not found", |doc| doc.trace(&name)) {
            Ok(idx) => idx as c_int,
            Err(s) => s,
        }
    }

    fn add_v_trace(&self, ncir: c_int, name: &CStr) -> Status {
        let name = text(name);
        self.status("add_v_trace", ncir, "Bad trace", |doc| {
            !name.is_empty() && doc.add_trace(format!("V({})", name)) == 0
        })
    }

    fn add_i_trace(&self, ncir: c_int, name: &CStr) -> Status {
        let name = text(name);
        self.status("add_i_trace", ncir, "Bad trace", |doc| {
            !name.is_empty() && doc.add_trace(format!("I({})", name)) == 0
        })
    }

    fn add_p_trace(&self, ncir: c_int, name: &CStr) -> Status {
        let name = text(name);
        self.status("add_p_trace", ncir, "Bad trace", |doc| {
            !name.is_empty() && doc.add_trace(format!("P({})", name)) == 0
        })
    }

    fn add_var_trace(&self, ncir: c_int, name: &CStr) -> Status {
        let name = text(name);
        self.status("add_var_trace", ncir, "Bad trace", |doc| {
            !name.is_empty() && doc.add_trace(name) == 0
        })
    }

    fn add_func_trace(&self, ncir: c_int, value: &CStr) -> Status {
        let value = text(value);
        self.status("add_func_trace", ncir, "Bad trace", |doc| {
            !value.is_empty() && doc.add_trace(value) == 0
        })
    }

    fn delete_trace(&self, ncir: c_int, ntrace: c_int) -> Status {
        self.status("delete_trace", ncir, "Bad trace", |doc| {
            match usize::try_from(ntrace).ok().and_then(|idx| doc.traces.get_mut(idx)) {
                Some(slot) => slot.take().is_some(),
                None => false,
            }
        })
    }

    fn set_step(&self, ncir: c_int, step: f64) -> Status {
        self.status("set_step", ncir, "Bad step", |doc| {
            if step > 0.0 {
                doc.step = step;
                true
            } else {
                false
            }
        })
    }

    fn set_timeout(&self, ncir: c_int, t: c_int) -> Status {
        self.status("set_timeout", ncir, "Bad timeout", |doc| {
            doc.timeout = t;
            t >= 0
        })
    }

    fn get_simulation_time(&self, ncir: c_int, t: &mut f64) -> Status {
        match self.with_doc("get_simulation_time", ncir, "Bad circuit", |doc| Some(doc.time)) {
            Ok(time) => {
                *t = time;
                0
            }
            Err(s) => s,
        }
    }

    fn start(&self, ncir: c_int) -> Status {
        self.simulation("start", ncir, |doc| {
            doc.start();
            true
        })
    }

    fn simulate(&self, ncir: c_int, interval: f64) -> Status {
        self.simulation("simulate", ncir, |doc| {
            doc.ensure_started();
            let target = doc.time + interval;
            while doc.time < target {
                let step = doc.step;
                doc.advance(step);
            }
            true
        })
    }

    fn simulate_interval(&self, ncir: c_int, interval: f64) -> Status {
        self.simulation("simulate_interval", ncir, |doc| {
            doc.ensure_started();
            let target = doc.time + interval;
            while target - doc.time > 1e-12 {
                let dt = doc.step.min(target - doc.time);
                doc.advance(dt);
            }
            doc.time = target;
            true
        })
    }

    fn simulate_step(&self, ncir: c_int) -> Status {
        self.simulation("simulate_step", ncir, |doc| {
            doc.ensure_started();
            let step = doc.step;
            doc.advance(step);
            true
        })
    }

    fn save_ic(&self, ncir: c_int) -> Status {
        self.status("save_ic", ncir, "Cannot save IC", |_| true)
    }

    fn get_data_size(&self, ncir: c_int, ntrace: c_int) -> Status {
        match self.with_doc("get_data_size", ncir, "Bad trace", |doc| {
            doc.trace_ref(ntrace).map(|t| t.samples.len())
        }) {
            Ok(n) => n as c_int,
            Err(s) => s,
        }
    }

    fn get_data_at(&self, ncir: c_int, ntrace: c_int, n: c_int, t: &mut f64, data: &mut f64) -> Status {
        match self.with_doc("get_data_at", ncir, "Index out of range", |doc| {
            let idx = usize::try_from(n).ok()?;
            doc.trace_ref(ntrace).and_then(|tr| tr.samples.get(idx).copied())
        }) {
            Ok((time, value)) => {
                *t = time;
                *data = value;
                0
            }
            Err(s) => s,
        }
    }

    fn get_last_data(&self, ncir: c_int, ntrace: c_int, t: &mut f64, data: &mut f64) -> Status {
        match self.with_doc("get_last_data", ncir, "No data", |doc| {
            doc.trace_ref(ntrace).and_then(|tr| tr.samples.last().copied())
        }) {
            Ok((time, value)) => {
                *t = time;
                *data = value;
                0
            }
            Err(s) => s,
        }
    }

    fn get_data(&self, ncir: c_int, ntrace: c_int, t: f64, data: &mut f64) -> Status {
        match self.with_doc("get_data", ncir, "No data at time", |doc| {
            doc.trace_ref(ntrace).and_then(|tr| interpolate(&tr.samples, t))
        }) {
            Ok(value) => {
                *data = value;
                0
            }
            Err(s) => s,
        }
    }

    fn delete_old_data(&self, ncir: c_int) -> Status {
        self.status("delete_old_data", ncir, "Cannot delete", |doc| {
            for idx in 0..doc.traces.len() {
                if let Some(trace) = doc.trace_mut(idx as c_int) {
                    let keep = trace.samples.len().saturating_sub(1);
                    trace.samples.drain(..keep);
                }
            }
            true
        })
    }

    fn save_data(&self, ncir: c_int, name: &CStr) -> Status {
        self.save_file("save_data", ncir, name)
    }

    fn get_input(&self, ncir: c_int, name: &CStr) -> Status {
        let name = text(name);
        self.status("get_input", ncir, "Input not found", |_| name == "in")
    }

    fn set_input_value(&self, ncir: c_int, nin: c_int, v: f64) -> Status {
        self.status("set_input_value", ncir, "Bad input", |doc| {
            doc.input = v;
            nin == 0
        })
    }

    fn set_input_logical_value(&self, ncir: c_int, nin: c_int, i: c_int) -> Status {
        self.status("set_input_logical_value", ncir, "Bad input", |doc| {
            doc.input = if i != 0 { LOGIC_HIGH } else { 0.0 };
            nin == 0
        })
    }

    fn get_output(&self, ncir: c_int, name: &CStr) -> Status {
        let name = text(name);
        self.status("get_output", ncir, "Output not found", |_| name == "out")
    }

    fn get_output_value(&self, ncir: c_int, nout: c_int, v: &mut f64) -> Status {
        match self.with_doc("get_output_value", ncir, "Bad output", |doc| {
            (nout == 0).then_some(2.0 * doc.input)
        }) {
            Ok(value) => {
                *v = value;
                0
            }
            Err(s) => s,
        }
    }

    fn get_output_logical_value(&self, ncir: c_int, nout: c_int, i: &mut c_int) -> Status {
        match self.with_doc("get_output_logical_value", ncir, "Bad output", |doc| {
            (nout == 0).then_some(2.0 * doc.input >= LOGIC_THRESHOLD)
        }) {
            Ok(high) => {
                *i = c_int::from(high);
                0
            }
            Err(s) => s,
        }
    }

    fn calc_ac(&self, ncir: c_int) -> Status {
        self.simulation("calc_ac", ncir, |doc| {
            let r = doc.gain() * 1000.0;
            let fc = 1.0 / (2.0 * std::f64::consts::PI * r * 1e-6);
            for trace in doc.ac_traces.iter_mut() {
                trace.samples = (0..AC_POINTS)
                    .map(|i| {
                        let f = 10f64.powf(i as f64 / 4.0);
                        let ratio = f / fc;
                        let mag = 1.0 / (1.0 + ratio * ratio).sqrt();
                        let phase = -ratio.atan().to_degrees();
                        (f, mag, phase)
                    })
                    .collect();
            }
            true
        })
    }

    fn get_ac_trace(&self, ncir: c_int, name: &CStr) -> Status {
        let name = text(name);
        match self.with_doc("get_ac_trace", ncir, "AC trace not found", |doc| {
            doc.ac_traces.iter().position(|t| t.name == name)
        }) {
            Ok(idx) => idx as c_int,
            Err(s) => s,
        }
    }

    fn get_ac_data_size(&self, ncir: c_int, ntrace: c_int) -> Status {
        match self.with_doc("get_ac_data_size", ncir, "Bad AC trace", |doc| {
            doc.ac_traces.get(ntrace as usize).map(|t| t.samples.len())
        }) {
            Ok(n) => n as c_int,
            Err(s) => s,
        }
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
        match self.with_doc("get_ac_data_at", ncir, "Index out of range", |doc| {
            let idx = usize::try_from(n).ok()?;
            doc.ac_traces
                .get(ntrace as usize)
                .and_then(|t| t.samples.get(idx).copied())
        }) {
            Ok((freq, m, p)) => {
                *f = freq;
                *mag = m;
                *phase = p;
                0
            }
            Err(s) => s,
        }
    }

    fn save_ac_data(&self, ncir: c_int, name: &CStr) -> Status {
        self.save_file("save_ac_data", ncir, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate() {
        let samples = [(0.0, 0.0), (1.0, 10.0), (2.0, 30.0)];
        assert_eq!(interpolate(&samples, 0.5), Some(5.0));
        assert_eq!(interpolate(&samples, 1.5), Some(20.0));
        assert_eq!(interpolate(&samples, 2.0), Some(30.0));
        assert_eq!(interpolate(&samples, 2.5), None);
        assert_eq!(interpolate(&[(0.0, 4.0)], 0.0), Some(4.0));
    }

    #[test]
    fn test_write_text_truncates() {
        let mut buf = [0xffu8; 4];
        write_text(&mut buf, "abcdef");
        assert_eq!(&buf, b"abc\0");
    }
}
