//! NVS (Non-Volatile Storage) adapter for the program library.
//!
//! Implements [`ProgramStorePort`]: the whole library is one postcard blob
//! under a single key, rewritten on every save.  Loading fails soft — a
//! missing or undecodable blob yields an empty library and a log line,
//! never an error the operator can get stuck on.
//!
//! On ESP-IDF the blob lives in an NVS namespace (commits are atomic per
//! `nvs_commit`); on host targets an in-memory map simulates the partition.

use log::{info, warn};

use crate::app::ports::ProgramStorePort;
use crate::error::PersistenceError;
use crate::program::Program;

#[cfg(not(target_os = "espidf"))]
use std::cell::RefCell;
#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const NAMESPACE: &str = "uvoven";
const KEY: &str = "programs";

/// Generous ceiling for the serialized library (99 programs of a few steps
/// fit in a fraction of this).
const MAX_BLOB_SIZE: usize = 16 * 1024;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: RefCell<HashMap<String, Vec<u8>>>,
    #[cfg(not(target_os = "espidf"))]
    fail_saves: bool,
}

impl NvsAdapter {
    /// Create the adapter and initialise NVS flash.
    ///
    /// On first boot or after a partition-version mismatch the NVS
    /// partition is erased and re-initialised automatically.
    pub fn new() -> crate::error::Result<Self> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(PersistenceError::IoError.into());
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(PersistenceError::IoError.into());
                }
            } else if ret != ESP_OK {
                return Err(PersistenceError::IoError.into());
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: RefCell::new(HashMap::new()),
            #[cfg(not(target_os = "espidf"))]
            fail_saves: false,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key() -> String {
        format!("{}::{}", NAMESPACE, KEY)
    }

    /// Open the NVS namespace, run a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut ns_buf = [0u8; 16];
        let ns_bytes = NAMESPACE.as_bytes();
        ns_buf[..ns_bytes.len()].copy_from_slice(ns_bytes);

        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(ns_buf.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    #[cfg(target_os = "espidf")]
    fn read_blob(&self) -> Result<Vec<u8>, PersistenceError> {
        let result = Self::with_nvs_handle(false, |handle| {
            let key_cstr = b"programs\0";
            let mut size: usize = 0;

            // First call: get size.
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    key_cstr.as_ptr() as *const _,
                    core::ptr::null_mut(),
                    &mut size,
                )
            };
            if ret != ESP_OK || size == 0 || size > MAX_BLOB_SIZE {
                return Err(ret);
            }

            let mut buf = vec![0u8; size];
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    key_cstr.as_ptr() as *const _,
                    buf.as_mut_ptr() as *mut _,
                    &mut size,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(buf)
        });
        result.map_err(|e| {
            if e == ESP_ERR_NVS_NOT_FOUND {
                PersistenceError::NotFound
            } else {
                PersistenceError::IoError
            }
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_blob(&self) -> Result<Vec<u8>, PersistenceError> {
        self.store
            .borrow()
            .get(&Self::composite_key())
            .cloned()
            .ok_or(PersistenceError::NotFound)
    }

    #[cfg(target_os = "espidf")]
    fn write_blob(&mut self, bytes: &[u8]) -> Result<(), PersistenceError> {
        let result = Self::with_nvs_handle(true, |handle| {
            let key_cstr = b"programs\0";
            let ret = unsafe {
                nvs_set_blob(
                    handle,
                    key_cstr.as_ptr() as *const _,
                    bytes.as_ptr() as *const _,
                    bytes.len(),
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        });
        result.map_err(|e| {
            if e == ESP_ERR_NVS_NOT_ENOUGH_SPACE {
                PersistenceError::Full
            } else {
                PersistenceError::IoError
            }
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_blob(&mut self, bytes: &[u8]) -> Result<(), PersistenceError> {
        if self.fail_saves {
            return Err(PersistenceError::IoError);
        }
        self.store
            .borrow_mut()
            .insert(Self::composite_key(), bytes.to_vec());
        Ok(())
    }

    // ── Simulation hooks ──────────────────────────────────────

    /// Plant a raw blob, e.g. garbage to exercise the corrupt-load path.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_put_blob(&mut self, bytes: &[u8]) {
        self.store
            .borrow_mut()
            .insert(Self::composite_key(), bytes.to_vec());
    }

    /// Make subsequent saves fail, to exercise the non-fatal save path.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }
}

impl Default for NvsAdapter {
    /// Last-resort fallback when flash init fails: the adapter still
    /// satisfies the port, loads come back empty, saves report `IoError`.
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            #[cfg(not(target_os = "espidf"))]
            store: RefCell::new(HashMap::new()),
            #[cfg(not(target_os = "espidf"))]
            fail_saves: false,
        })
    }
}

impl ProgramStorePort for NvsAdapter {
    fn load_programs(&self) -> Vec<Program> {
        let bytes = match self.read_blob() {
            Ok(b) => b,
            Err(PersistenceError::NotFound) => {
                info!("NvsAdapter: no stored programs");
                return Vec::new();
            }
            Err(e) => {
                warn!("NvsAdapter: program load failed ({e}), starting empty");
                return Vec::new();
            }
        };
        match postcard::from_bytes::<Vec<Program>>(&bytes) {
            Ok(programs) => {
                info!("NvsAdapter: loaded {} programs", programs.len());
                programs
            }
            Err(_) => {
                warn!("NvsAdapter: stored programs corrupted, starting empty");
                Vec::new()
            }
        }
    }

    fn save_programs(&mut self, programs: &[Program]) -> Result<(), PersistenceError> {
        let bytes =
            postcard::to_allocvec(programs).map_err(|_| PersistenceError::IoError)?;
        if bytes.len() > MAX_BLOB_SIZE {
            return Err(PersistenceError::Full);
        }
        self.write_blob(&bytes)?;
        info!(
            "NvsAdapter: saved {} programs ({} bytes)",
            programs.len(),
            bytes.len()
        );
        Ok(())
    }
}
