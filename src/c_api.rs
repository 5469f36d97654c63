// C entry points. Results cross the boundary as JSON strings owned by Rust;
// callers hand them back to `altenglish_free_string`.
use crate::core::converter::transliterate_str;
use crate::core::features::FeatureTable;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

const EMPTY_RESULT: &str = r#"{"symbols":[],"diagnostics":[]}"#;

fn into_c_string(json: String) -> *mut c_char {
    match CString::new(json) {
        Ok(s) => s.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Forces the feature table to build. Returns `false` if validation failed.
#[no_mangle]
pub extern "C" fn altenglish_init() -> bool {
    let result = catch_unwind(|| FeatureTable::global().len());
    match result {
        Ok(count) => {
            tracing::debug!(phonemes = count, "feature table ready");
            true
        }
        Err(_) => {
            eprintln!("[altenglish FATAL] feature table failed to initialize.");
            false
        }
    }
}

/// Transliterates a whitespace-separated ARPAbet line such as `"DH IH1 S"`
/// and returns the result as JSON.
///
/// # Safety
/// `phones` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn altenglish_transliterate(phones: *const c_char) -> *mut c_char {
    if phones.is_null() {
        return into_c_string(EMPTY_RESULT.to_string());
    }
    let line = CStr::from_ptr(phones).to_string_lossy();
    let result = catch_unwind(AssertUnwindSafe(|| {
        let result = transliterate_str(&line);
        serde_json::to_string(&result).unwrap_or_else(|_| EMPTY_RESULT.to_string())
    }));
    let json = result.unwrap_or_else(|_| {
        eprintln!("[altenglish FATAL] Panic in transliterate.");
        EMPTY_RESULT.to_string()
    });
    into_c_string(json)
}

/// Releases a string returned by this library.
///
/// # Safety
/// `s` must be null or a pointer previously returned by this library and not
/// yet freed.
#[no_mangle]
pub unsafe extern "C" fn altenglish_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(input: Option<&str>) -> serde_json::Value {
        let owned = input.map(|s| CString::new(s).unwrap());
        let arg = owned.as_ref().map_or(ptr::null(), |s| s.as_ptr());
        unsafe {
            let out = altenglish_transliterate(arg);
            assert!(!out.is_null());
            let json = CStr::from_ptr(out).to_str().unwrap().to_string();
            altenglish_free_string(out);
            serde_json::from_str(&json).unwrap()
        }
    }

    #[test]
    fn init_succeeds() {
        assert!(altenglish_init());
    }

    #[test]
    fn returns_symbols_as_json() {
        let value = call(Some("DH IH1 S"));
        assert_eq!(value["symbols"], serde_json::json!(["∆~·", "▲|ˈ", "⊣~"]));
        assert_eq!(value["diagnostics"], serde_json::json!([]));
    }

    #[test]
    fn diagnostics_are_tagged() {
        let value = call(Some("K S1"));
        assert_eq!(value["diagnostics"][0]["position"], 1);
        assert_eq!(value["diagnostics"][0]["error"]["kind"], "stress_on_consonant");
    }

    #[test]
    fn null_input_yields_empty_result() {
        let value = call(None);
        assert_eq!(value["symbols"], serde_json::json!([]));
    }

    #[test]
    fn free_accepts_null() {
        unsafe { altenglish_free_string(ptr::null_mut()) };
    }
}
