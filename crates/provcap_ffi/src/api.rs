//! C ABI exports.
//!
//! # Responsibility
//! - Hand manifests to foreign callers as owned, NUL-terminated UTF-8 strings.
//! - Take those strings back through the one matching release export.
//!
//! # Invariants
//! - Every `char*` returned here is a `CString` allocation and must be
//!   released with `provcap_free_string` exactly once.
//! - Failure is the NULL sentinel; no allocation happens on that path.
//! - No export unwinds: bodies run under `catch_unwind` and a caught panic
//!   degrades to the failure sentinel.
//!
//! # See also
//! - include/provcap.h

use log::{error, warn};
use provcap_core::{builtin_registry, init_logging, render_comparison, ProviderId};
use std::ffi::{c_char, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Returns the manifest for the provider with ABI code `provider`.
///
/// Codes: `0` = openai, `1` = anthropic.
///
/// # FFI contract
/// - Sync call, non-blocking, safe to call from any thread.
/// - Returns an owned string on success; release with `provcap_free_string`.
/// - Returns NULL for unknown codes or render failures.
/// - Never unwinds.
#[no_mangle]
pub extern "C" fn provcap_get_manifest(provider: u32) -> *mut c_char {
    guard("get_manifest", ptr::null_mut(), || {
        match ProviderId::from_code(provider) {
            Some(id) => render_manifest(id),
            None => {
                warn!(
                    "event=ffi_get_manifest module=ffi status=absent error_code=unknown_provider code={}",
                    provider
                );
                ptr::null_mut()
            }
        }
    })
}

/// Returns the OpenAI manifest. Same contract as `provcap_get_manifest`.
#[no_mangle]
pub extern "C" fn provcap_get_openai_manifest() -> *mut c_char {
    provcap_get_manifest(ProviderId::OpenAi.code())
}

/// Returns the Anthropic manifest. Same contract as `provcap_get_manifest`.
#[no_mangle]
pub extern "C" fn provcap_get_anthropic_manifest() -> *mut c_char {
    provcap_get_manifest(ProviderId::Anthropic.code())
}

/// Returns one model's capability block as JSON.
///
/// `provider` is a string id (`openai|anthropic`, case-insensitive) and
/// `model_id` a manifest model key such as `gpt-4-turbo`.
///
/// # FFI contract
/// - Returns NULL when either argument is NULL or not UTF-8, or when the
///   provider or model is unknown.
/// - Non-NULL results must be released with `provcap_free_string`.
///
/// # Safety
/// Non-NULL arguments must point to NUL-terminated strings that stay valid for
/// the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn provcap_get_model_capabilities(
    provider: *const c_char,
    model_id: *const c_char,
) -> *mut c_char {
    guard("get_model_capabilities", ptr::null_mut(), || {
        // SAFETY: argument validity is the caller's documented obligation.
        let (Some(provider), Some(model_id)) =
            (unsafe { borrow_str(provider) }, unsafe { borrow_str(model_id) })
        else {
            return ptr::null_mut();
        };
        let Ok(provider) = ProviderId::parse(provider) else {
            return ptr::null_mut();
        };
        match builtin_registry().render_model_capabilities(provider, model_id) {
            Ok(json) => into_owned_c_string("get_model_capabilities", json),
            Err(err) => {
                warn!(
                    "event=ffi_get_model_capabilities module=ffi status=absent provider={} error={}",
                    provider, err
                );
                ptr::null_mut()
            }
        }
    })
}

/// Compares two capability documents and returns the lossiness report as JSON.
///
/// Both arguments are capability blocks in the shape returned by
/// `provcap_get_model_capabilities`. The comparison reads `source_json` as
/// where a request comes from and `target_json` as where it is sent.
///
/// # FFI contract
/// - Returns NULL when either argument is NULL, not UTF-8, or not a
///   capability document.
/// - Non-NULL results must be released with `provcap_free_string`.
///
/// # Safety
/// Non-NULL arguments must point to NUL-terminated strings that stay valid for
/// the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn provcap_compare_capabilities(
    source_json: *const c_char,
    target_json: *const c_char,
) -> *mut c_char {
    guard("compare_capabilities", ptr::null_mut(), || {
        // SAFETY: argument validity is the caller's documented obligation.
        let (Some(source), Some(target)) =
            (unsafe { borrow_str(source_json) }, unsafe { borrow_str(target_json) })
        else {
            return ptr::null_mut();
        };
        match render_comparison(source, target) {
            Ok(json) => into_owned_c_string("compare_capabilities", json),
            Err(err) => {
                warn!(
                    "event=ffi_compare_capabilities module=ffi status=absent error={}",
                    err
                );
                ptr::null_mut()
            }
        }
    })
}

/// Starts rolling file logs.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Returns NULL on success.
/// - Returns an owned error message on failure; release it with
///   `provcap_free_string`.
/// - Safe to repeat with the same arguments.
///
/// # Safety
/// Non-NULL arguments must point to NUL-terminated strings that stay valid for
/// the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn provcap_init_logging(
    level: *const c_char,
    log_dir: *const c_char,
) -> *mut c_char {
    guard("init_logging", ptr::null_mut(), || {
        // SAFETY: argument validity is the caller's documented obligation.
        let Some(level) = (unsafe { borrow_str(level) }) else {
            return into_owned_c_string(
                "init_logging",
                "level must be a non-null UTF-8 string".to_string(),
            );
        };
        let Some(log_dir) = (unsafe { borrow_str(log_dir) }) else {
            return into_owned_c_string(
                "init_logging",
                "log_dir must be a non-null UTF-8 string".to_string(),
            );
        };
        match init_logging(level, log_dir) {
            Ok(()) => ptr::null_mut(),
            Err(message) => into_owned_c_string("init_logging", message),
        }
    })
}

/// Returns the library version.
///
/// The result is static: never release it.
#[no_mangle]
pub extern "C" fn provcap_version() -> *const c_char {
    VERSION.as_ptr().cast()
}

/// Releases a string returned by any other `provcap_*` export.
///
/// NULL is accepted and ignored.
///
/// # Safety
/// `s` must be NULL or a pointer previously returned by a `provcap_*` export
/// that has not been released yet. It must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn provcap_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    guard("free_string", (), || {
        // SAFETY: caller guarantees `s` came from `CString::into_raw` here
        // and is released only once.
        drop(unsafe { CString::from_raw(s) });
    })
}

fn render_manifest(provider: ProviderId) -> *mut c_char {
    match builtin_registry().render(provider) {
        Ok(json) => into_owned_c_string("get_manifest", json),
        Err(_) => ptr::null_mut(),
    }
}

fn into_owned_c_string(op: &'static str, text: String) -> *mut c_char {
    match CString::new(text) {
        Ok(owned) => owned.into_raw(),
        Err(err) => {
            error!(
                "event=ffi_{} module=ffi status=error error_code=interior_nul position={}",
                op,
                err.nul_position()
            );
            ptr::null_mut()
        }
    }
}

/// Borrows a caller-owned C string as `&str`. NULL or non-UTF-8 yields `None`.
///
/// # Safety
/// Non-NULL `ptr` must point to a NUL-terminated string valid for `'a`.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn guard<T>(op: &'static str, fallback: T, body: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => value,
        Err(_) => {
            error!(
                "event=ffi_panic module=ffi status=error op={} fallback=sentinel",
                op
            );
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        guard, provcap_compare_capabilities, provcap_free_string, provcap_get_anthropic_manifest,
        provcap_get_manifest, provcap_get_model_capabilities, provcap_get_openai_manifest,
        provcap_init_logging, provcap_version,
    };
    use provcap_core::{core_version, ProviderId};
    use std::ffi::{c_char, CStr, CString};

    fn take_owned(ptr: *mut c_char) -> Option<String> {
        if ptr.is_null() {
            return None;
        }
        let text = unsafe { CStr::from_ptr(ptr) }
            .to_str()
            .expect("exports return UTF-8")
            .to_string();
        unsafe { provcap_free_string(ptr) };
        Some(text)
    }

    #[test]
    fn every_known_code_returns_an_info_prefixed_manifest() {
        for provider in ProviderId::all() {
            let json = take_owned(provcap_get_manifest(provider.code()))
                .expect("known provider must not be absent");
            assert!(json.starts_with("{\"info\""), "{provider}");
        }
    }

    #[test]
    fn per_provider_exports_match_the_parameterized_export() {
        let openai = take_owned(provcap_get_openai_manifest()).expect("openai");
        let anthropic = take_owned(provcap_get_anthropic_manifest()).expect("anthropic");
        assert_eq!(
            Some(openai),
            take_owned(provcap_get_manifest(ProviderId::OpenAi.code()))
        );
        assert_eq!(
            Some(anthropic),
            take_owned(provcap_get_manifest(ProviderId::Anthropic.code()))
        );
    }

    #[test]
    fn unknown_code_returns_null() {
        assert!(provcap_get_manifest(7).is_null());
        assert!(provcap_get_manifest(u32::MAX).is_null());
    }

    #[test]
    fn free_string_accepts_null() {
        unsafe { provcap_free_string(std::ptr::null_mut()) };
    }

    #[test]
    fn model_capabilities_resolve_known_models_only() {
        let provider = CString::new("OpenAI").expect("cstring");
        let model = CString::new("gpt-4-turbo").expect("cstring");
        let json = take_owned(unsafe {
            provcap_get_model_capabilities(provider.as_ptr(), model.as_ptr())
        })
        .expect("known model");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(value["features"]["vision"], true);

        let unknown = CString::new("gpt-9").expect("cstring");
        assert!(unsafe { provcap_get_model_capabilities(provider.as_ptr(), unknown.as_ptr()) }
            .is_null());

        let bad_provider = CString::new("mistral").expect("cstring");
        assert!(unsafe {
            provcap_get_model_capabilities(bad_provider.as_ptr(), model.as_ptr())
        }
        .is_null());

        assert!(unsafe { provcap_get_model_capabilities(std::ptr::null(), model.as_ptr()) }
            .is_null());
    }

    fn model_capabilities_json(provider: &str, model: &str) -> CString {
        let provider = CString::new(provider).expect("cstring");
        let model = CString::new(model).expect("cstring");
        let json = take_owned(unsafe {
            provcap_get_model_capabilities(provider.as_ptr(), model.as_ptr())
        })
        .expect("known model");
        CString::new(json).expect("cstring")
    }

    #[test]
    fn compare_capabilities_reports_losses_between_models() {
        let gpt4 = model_capabilities_json("openai", "gpt-4-turbo");
        let gpt35 = model_capabilities_json("openai", "gpt-3.5-turbo");

        let json = take_owned(unsafe { provcap_compare_capabilities(gpt4.as_ptr(), gpt35.as_ptr()) })
            .expect("both inputs are capability documents");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(value["lossiness_report"]["is_lossy"], true);
        assert_eq!(value["lossiness_report"]["severity"], "critical");

        let json = take_owned(unsafe { provcap_compare_capabilities(gpt35.as_ptr(), gpt4.as_ptr()) })
            .expect("upgrade comparison");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(value["lossiness_report"]["is_lossy"], false);
    }

    #[test]
    fn compare_capabilities_returns_null_for_bad_input() {
        let gpt4 = model_capabilities_json("openai", "gpt-4-turbo");
        let garbage = CString::new("{\"info\":{}}").expect("cstring");
        let not_utf8 = CString::new(vec![0xff_u8, 0xfe]).expect("cstring");

        assert!(unsafe { provcap_compare_capabilities(std::ptr::null(), gpt4.as_ptr()) }.is_null());
        assert!(unsafe { provcap_compare_capabilities(gpt4.as_ptr(), std::ptr::null()) }.is_null());
        assert!(unsafe { provcap_compare_capabilities(garbage.as_ptr(), gpt4.as_ptr()) }.is_null());
        assert!(unsafe { provcap_compare_capabilities(gpt4.as_ptr(), not_utf8.as_ptr()) }.is_null());
    }

    #[test]
    fn init_logging_returns_owned_error_messages() {
        let level = CString::new("verbose").expect("cstring");
        let dir = CString::new("/tmp/provcap-logs").expect("cstring");
        let error = take_owned(unsafe { provcap_init_logging(level.as_ptr(), dir.as_ptr()) })
            .expect("unsupported level must be reported");
        assert!(error.contains("unsupported log level"));

        let error = take_owned(unsafe { provcap_init_logging(std::ptr::null(), dir.as_ptr()) })
            .expect("null level must be reported");
        assert!(error.contains("level"));

        let info = CString::new("info").expect("cstring");
        let relative = CString::new("logs").expect("cstring");
        let error = take_owned(unsafe { provcap_init_logging(info.as_ptr(), relative.as_ptr()) })
            .expect("relative dir must be reported");
        assert!(error.contains("absolute"));
    }

    #[test]
    fn version_is_static_and_matches_core() {
        let version = unsafe { CStr::from_ptr(provcap_version()) }
            .to_str()
            .expect("utf-8 version");
        assert_eq!(version, core_version());
    }

    #[test]
    fn guard_converts_panics_into_the_fallback() {
        let value = guard("test_panic", 0_u8, || panic!("boom"));
        assert_eq!(value, 0);
    }
}
