//! Consumer-side ownership of producer-allocated strings.
//!
//! # Responsibility
//! - Wrap a raw `char*` together with the release function of the allocator
//!   that produced it.
//! - Expose content only through a borrowing view.
//!
//! # Invariants
//! - A `ForeignString` is the single owner of its buffer: it is neither
//!   `Clone` nor `Copy`, and its fields are private.
//! - The buffer is released exactly once, by the paired release function,
//!   when the value is consumed by [`ForeignString::release`] or dropped.
//! - Views borrow the handle, so none can outlive the release.

use crate::api::{provcap_free_string, provcap_get_manifest};
use log::debug;
use provcap_core::ProviderId;
use std::ffi::{c_char, CStr};
use std::fmt::{Debug, Formatter};
use std::ptr::NonNull;
use std::str::Utf8Error;

/// Producer release operation paired with a handle.
pub type ReleaseFn = unsafe extern "C" fn(*mut c_char);

/// Owned, NUL-terminated string allocated on the producer side of the ABI.
pub struct ForeignString {
    ptr: NonNull<c_char>,
    release: ReleaseFn,
}

impl ForeignString {
    /// Takes ownership of `ptr`. Returns `None` for the null sentinel.
    ///
    /// # Safety
    /// - `ptr` is null, or points to a NUL-terminated buffer that stays valid
    ///   until `release` is called on it.
    /// - `release` is the release operation of the allocator that produced
    ///   `ptr`.
    /// - No other owner exists; the caller must not use or release `ptr`
    ///   after this call.
    pub unsafe fn from_raw(ptr: *mut c_char, release: ReleaseFn) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr, release })
    }

    /// Borrows the buffer content without affecting ownership.
    pub fn view(&self) -> ManifestView<'_> {
        // SAFETY: `from_raw` requires a live NUL-terminated buffer, and the
        // returned view borrows `self`, so it cannot outlive the release.
        let text = unsafe { CStr::from_ptr(self.ptr.as_ptr()) };
        ManifestView { text }
    }

    /// Returns the buffer to its producer. The handle cannot be used afterwards.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ForeignString {
    fn drop(&mut self) {
        debug!(
            "event=handle_release module=ffi status=ok bytes={}",
            self.view().len()
        );
        // SAFETY: `release` is paired with `ptr` by `from_raw`, and `drop`
        // runs at most once for this value.
        unsafe { (self.release)(self.ptr.as_ptr()) }
    }
}

impl Debug for ForeignString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForeignString")
            .field("len", &self.view().len())
            .finish()
    }
}

/// Read-only view of a [`ForeignString`]'s bytes, excluding the terminator.
#[derive(Debug, Clone, Copy)]
pub struct ManifestView<'a> {
    text: &'a CStr,
}

impl<'a> ManifestView<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        self.text.to_bytes()
    }

    pub fn to_str(&self) -> Result<&'a str, Utf8Error> {
        self.text.to_str()
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Releases `handle` if present. The absent sentinel is a no-op.
pub fn release_handle(handle: Option<ForeignString>) {
    if let Some(handle) = handle {
        handle.release();
    }
}

/// Fetches `provider`'s manifest through this library's own C exports.
pub fn get_manifest(provider: ProviderId) -> Option<ForeignString> {
    let raw = provcap_get_manifest(provider.code());
    // SAFETY: pointers from `provcap_get_manifest` are fresh `CString`
    // allocations (or null) reclaimed by `provcap_free_string`.
    unsafe { ForeignString::from_raw(raw, provcap_free_string) }
}

#[cfg(test)]
mod tests {
    use super::{get_manifest, release_handle, ForeignString};
    use crate::api::provcap_free_string;
    use provcap_core::ProviderId;
    use std::ffi::{c_char, CString};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn null_pointer_is_the_absent_sentinel() {
        let handle = unsafe { ForeignString::from_raw(std::ptr::null_mut(), provcap_free_string) };
        assert!(handle.is_none());
        release_handle(handle);
    }

    #[test]
    fn release_runs_paired_function_exactly_once() {
        static RELEASED: AtomicUsize = AtomicUsize::new(0);
        unsafe extern "C" fn counting_release(ptr: *mut c_char) {
            RELEASED.fetch_add(1, Ordering::SeqCst);
            provcap_free_string(ptr);
        }

        let raw = CString::new("{\"info\":{}}").expect("cstring").into_raw();
        let handle = unsafe { ForeignString::from_raw(raw, counting_release) }.expect("non-null");
        assert_eq!(handle.view().as_bytes(), b"{\"info\":{}}");
        assert_eq!(RELEASED.load(Ordering::SeqCst), 0);

        handle.release();
        assert_eq!(RELEASED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_an_unreleased_handle_still_releases_once() {
        static RELEASED: AtomicUsize = AtomicUsize::new(0);
        unsafe extern "C" fn counting_release(ptr: *mut c_char) {
            RELEASED.fetch_add(1, Ordering::SeqCst);
            provcap_free_string(ptr);
        }

        {
            let raw = CString::new("payload").expect("cstring").into_raw();
            let _handle = unsafe { ForeignString::from_raw(raw, counting_release) };
        }
        assert_eq!(RELEASED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn views_are_repeatable_and_report_length() {
        let handle = get_manifest(ProviderId::Anthropic).expect("anthropic manifest");
        let first = handle.view();
        let second = handle.view();
        assert_eq!(first.as_bytes(), second.as_bytes());
        assert_eq!(first.len(), first.to_str().expect("utf-8").len());
        assert!(!first.is_empty());
        handle.release();
    }
}
