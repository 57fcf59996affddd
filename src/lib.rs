//! NL5 circuit simulator client
//!
//! Loads the NL5 DLL (`nl5_dll.so` / `nl5_dll.dll`), resolves its `NL5_*`
//! entry points, and exposes them as typed, checked calls on [`Nl5Client`].
//! The solver itself lives in the closed-source library; this crate only
//! marshals names, paths, numbers and text across the boundary and maps the
//! engine's integer statuses to [`Error`].
//!
//! ```no_run
//! use nl5_client::{ClientConfig, Nl5Client};
//!
//! # fn main() -> nl5_client::Result<()> {
//! let mut nl5 = Nl5Client::load(ClientConfig::default())?;
//! nl5.license()?;
//! nl5.open("rc_filter", None)?;
//! nl5.add_voltage_trace("out")?;
//! for r in [10.0, 100.0, 1e3] {
//!     nl5.set_value("R1.R", r)?;
//!     nl5.start()?;
//!     nl5.simulate(10.0)?;
//!     println!("R={} V(out)@5s={}", r, nl5.get_data("V(out)", 5.0)?);
//! }
//! nl5.close()?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod ffi;
pub mod paths;

#[cfg(test)]
mod mock;

pub use client::{DocumentHandle, LicenseStatus, Nl5Client};
pub use config::ClientConfig;
pub use data::{AcSeries, TimeSeries};
pub use error::{Error, ErrorKind, Result};
pub use ffi::{EngineApi, NativeEngine};
