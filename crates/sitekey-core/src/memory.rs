//! Holders for pass phrase copies, derived keys and seed arrays.
//!
//! [`SecretBuffer`] (heap, any length) and [`SecretBytes`] (inline, fixed
//! length) both zero their contents on drop, can be zeroed early through
//! [`Zeroize`] and print as `***`. Only [`SecretBuffer`] locks its pages:
//! its heap address is stable, while an inline value moves with its owner.
//!
//! Copies made outside these types (terminal line buffers, a GUI text field,
//! allocator slack) are out of reach. Zeroing here narrows exposure only.

use std::fmt;
use std::sync::Once;

use secrecy::{ExposeSecret, ExposeSecretMut, SecretSlice};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Implement `Debug` and `Display` as a fixed mask.
macro_rules! masked_fmt {
    ([const $n:ident] $ty:ty, $($mask:tt)+) => {
        impl<const $n: usize> fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, $($mask)+)
            }
        }

        impl<const $n: usize> fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, $($mask)+)
            }
        }
    };
    ($ty:ty, $($mask:tt)+) => {
        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, $($mask)+)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, $($mask)+)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Page locking
// ---------------------------------------------------------------------------

/// Keeps a byte range `mlock`ed for as long as it lives.
///
/// Locking is best effort. When the OS refuses (typically `RLIMIT_MEMLOCK`)
/// the secret is still usable and still zeroed; one warning is logged per
/// process.
pub struct PageLock {
    start: *const u8,
    len: usize,
    held: bool,
}

// SAFETY: `start` is handed only to mlock/munlock and never dereferenced.
unsafe impl Send for PageLock {}
unsafe impl Sync for PageLock {}

static MLOCK_WARNING: Once = Once::new();

impl PageLock {
    fn acquire(start: *const u8, len: usize) -> Self {
        let held = len == 0 || sys::lock_pages(start, len);
        if !held {
            MLOCK_WARNING.call_once(|| {
                tracing::warn!("mlock refused; derived keys may reach swap");
            });
        }
        Self { start, len, held }
    }

    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.held && self.len > 0
    }
}

impl Drop for PageLock {
    fn drop(&mut self) {
        if self.is_held() {
            sys::unlock_pages(self.start, self.len);
        }
    }
}

// ---------------------------------------------------------------------------
// SecretBuffer
// ---------------------------------------------------------------------------

/// Heap secret of any length: pass phrase copies, PBKDF2 output, decrypted
/// cache plaintext.
pub struct SecretBuffer {
    bytes: SecretSlice<u8>,
    pages: PageLock,
}

impl SecretBuffer {
    /// Copy `data` into a fresh allocation. The caller still owns and should
    /// zero `data`.
    #[must_use]
    pub fn new(data: &[u8]) -> Self {
        let bytes: SecretSlice<u8> = data.to_vec().into();
        let view = bytes.expose_secret();
        let pages = PageLock::acquire(view.as_ptr(), view.len());
        Self { bytes, pages }
    }

    /// Move `data` in, zeroing the vector it came from.
    #[must_use]
    pub fn from_vec(mut data: Vec<u8>) -> Self {
        let buffer = Self::new(&data);
        data.zeroize();
        buffer
    }

    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.bytes.expose_secret()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.expose().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }

    /// `true` if the OS agreed to keep these pages resident.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.pages.is_held()
    }
}

impl Zeroize for SecretBuffer {
    fn zeroize(&mut self) {
        self.bytes.expose_secret_mut().zeroize();
    }
}

masked_fmt!(SecretBuffer, "SecretBuffer(***)");

// ---------------------------------------------------------------------------
// SecretBytes<N>
// ---------------------------------------------------------------------------

/// Inline secret of fixed length, used for the 32-byte seed array.
///
/// Zeroed on drop. The mapper zeroes it explicitly as soon as the output is
/// built, so drop only matters on early-return paths. Not page-locked, since
/// the bytes move with every move of the value.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> SecretBytes<N> {
    /// Take ownership of `data`.
    #[must_use]
    pub const fn new(data: [u8; N]) -> Self {
        Self { bytes: data }
    }

    #[must_use]
    pub const fn expose(&self) -> &[u8; N] {
        &self.bytes
    }

    /// `true` once every byte is zero.
    #[must_use]
    pub fn is_zeroed(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

masked_fmt!([const N] SecretBytes<N>, "SecretBytes<{}>(***)", N);

impl<const N: usize> From<[u8; N]> for SecretBytes<N> {
    fn from(data: [u8; N]) -> Self {
        Self::new(data)
    }
}

// ---------------------------------------------------------------------------
// Process hardening
// ---------------------------------------------------------------------------

/// Set `RLIMIT_CORE` to zero so a crash cannot write the pass phrase to a
/// core file. No-op off Unix.
///
/// # Errors
///
/// Returns the OS error from `setrlimit`.
pub fn disable_core_dumps() -> std::io::Result<()> {
    sys::zero_core_limit()
}

#[cfg(unix)]
mod sys {
    pub(super) fn lock_pages(start: *const u8, len: usize) -> bool {
        // SAFETY: mlock validates the range itself and reports failure.
        unsafe { libc::mlock(start.cast(), len) == 0 }
    }

    pub(super) fn unlock_pages(start: *const u8, len: usize) {
        // SAFETY: same range that was locked; failure is ignored.
        unsafe {
            libc::munlock(start.cast(), len);
        }
    }

    pub(super) fn zero_core_limit() -> std::io::Result<()> {
        let none = libc::rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        // SAFETY: plain POSIX call on a stack value.
        match unsafe { libc::setrlimit(libc::RLIMIT_CORE, &none) } {
            0 => Ok(()),
            _ => Err(std::io::Error::last_os_error()),
        }
    }
}

#[cfg(not(unix))]
mod sys {
    pub(super) const fn lock_pages(_start: *const u8, _len: usize) -> bool {
        false
    }

    pub(super) const fn unlock_pages(_start: *const u8, _len: usize) {}

    pub(super) const fn zero_core_limit() -> std::io::Result<()> {
        Ok(())
    }
}
