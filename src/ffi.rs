//! C FFI bindings for sii-stc.
//!
//! Provides a simple blocking API for querying the SII tax status from C,
//! Python, Go, etc.
//!
//! # Example (C)
//!
//! ```c
//! #include "sii_stc.h"
//!
//! int main() {
//!     char* json = stc_situacion_tributaria_json("76795561", "8", NULL);
//!     if (json) {
//!         printf("Result: %s\n", json);
//!         stc_free_string(json);
//!     }
//!     return 0;
//! }
//! ```

use std::ffi::{c_char, CStr, CString};
use std::future::Future;
use std::ptr;

use crate::{Result, SiiClient, StcError};

/// Convert Rust String to C string pointer.
fn string_to_ptr(s: String) -> *mut c_char {
    CString::new(s)
        .map(|cs| cs.into_raw())
        .unwrap_or(ptr::null_mut())
}

/// Convert C string to Rust String, returns None if null or invalid UTF-8.
unsafe fn ptr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

fn error_json(message: impl std::fmt::Display) -> String {
    serde_json::json!({
        "success": false,
        "error": message.to_string()
    })
    .to_string()
}

/// Validate arguments, build a client and run `query` on a fresh runtime.
///
/// Returns the JSON envelope as a Rust string.
unsafe fn run_query<F, Fut>(
    rut: *const c_char,
    dv: *const c_char,
    proxy: *const c_char,
    query: F,
) -> String
where
    F: FnOnce(SiiClient, String, String) -> Fut,
    Fut: Future<Output = Result<serde_json::Value>>,
{
    let rut = match ptr_to_string(rut) {
        Some(s) if !s.is_empty() => s,
        _ => return error_json("rut is required"),
    };

    let dv = match ptr_to_string(dv) {
        Some(s) if !s.is_empty() => s,
        _ => return error_json("dv is required"),
    };

    let mut builder = SiiClient::builder();
    if let Some(p) = ptr_to_string(proxy) {
        builder = builder.proxy(p);
    }

    let client = match builder.build() {
        Ok(c) => c,
        Err(e) => return error_json(format!("Failed to build client: {}", e)),
    };

    // Create tokio runtime for blocking call
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => return error_json(format!("Failed to create runtime: {}", e)),
    };

    match runtime.block_on(query(client, rut, dv)) {
        Ok(data) => serde_json::json!({ "success": true, "data": data }).to_string(),
        Err(e) => error_json(format!("Query failed: {}", e)),
    }
}

/// Query the tax status of a RUT and return it as JSON (blocking).
///
/// # Returns
///
/// A JSON string on success:
/// ```json
/// {"success": true, "data": {"rut": "76795561-8", "legal_name": "...", ...}}
/// ```
///
/// Or on error:
/// ```json
/// {"success": false, "error": "error message"}
/// ```
///
/// The caller must free the string with `stc_free_string`.
///
/// # Safety
///
/// - `rut` must be a valid null-terminated C string
/// - `dv` must be a valid null-terminated C string
/// - `proxy` must be NULL or a valid null-terminated C string
#[no_mangle]
pub unsafe extern "C" fn stc_situacion_tributaria_json(
    rut: *const c_char,
    dv: *const c_char,
    proxy: *const c_char,
) -> *mut c_char {
    let json = run_query(rut, dv, proxy, |client, rut, dv| async move {
        let status = client.situacion_tributaria(&rut, &dv).await?;
        Ok::<_, StcError>(serde_json::to_value(status)?)
    });
    string_to_ptr(json)
}

/// Fetch the raw STC HTML page of a RUT (blocking).
///
/// Returns the same JSON envelope as `stc_situacion_tributaria_json`, with
/// the page under `data`. The caller must free the string with
/// `stc_free_string`.
///
/// # Safety
///
/// Same requirements as `stc_situacion_tributaria_json`.
#[no_mangle]
pub unsafe extern "C" fn stc_get_html(
    rut: *const c_char,
    dv: *const c_char,
    proxy: *const c_char,
) -> *mut c_char {
    let json = run_query(rut, dv, proxy, |client, rut, dv| async move {
        let html = client.fetch_stc(&rut, &dv).await?;
        Ok::<_, StcError>(serde_json::Value::String(html))
    });
    string_to_ptr(json)
}

/// Free a string returned by sii-stc FFI functions.
///
/// # Safety
///
/// - `s` must be NULL or a valid pointer previously returned by sii-stc
/// - Each string must only be freed once
#[no_mangle]
pub unsafe extern "C" fn stc_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

/// Get the library version.
///
/// # Returns
///
/// A static string with the version number. Do NOT free this string.
#[no_mangle]
pub extern "C" fn stc_version() -> *const c_char {
    // This is a static string, no need to free
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}
