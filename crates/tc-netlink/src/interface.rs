//! Interface name and index translation via libc.

use std::ffi::{CStr, CString};

use crate::error::ChannelError;

/// Returns the kernel index of `name`.
pub(crate) fn index_of(name: &str) -> Result<u32, ChannelError> {
    let c_name = CString::new(name).map_err(|_| ChannelError::unknown_device(name))?;
    // SAFETY: `c_name` is a valid NUL-terminated string for the duration of
    // the call.
    let index = unsafe { libc::if_nametoindex(c_name.as_ptr()) };
    if index == 0 {
        return Err(ChannelError::unknown_device(name));
    }
    Ok(index)
}

/// Returns the name of the interface with `index`, if any.
pub(crate) fn name_of(index: u32) -> Option<String> {
    let mut buf = [0 as libc::c_char; libc::IF_NAMESIZE];
    // SAFETY: `buf` holds IF_NAMESIZE bytes as required by if_indextoname.
    let ptr = unsafe { libc::if_indextoname(index, buf.as_mut_ptr()) };
    if ptr.is_null() {
        return None;
    }
    // SAFETY: on success the buffer holds a NUL-terminated name.
    let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
    name.to_str().ok().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_round_trips() {
        let Ok(index) = index_of("lo") else {
            return;
        };
        assert_eq!(name_of(index).as_deref(), Some("lo"));
    }

    #[test]
    fn missing_device_is_reported_by_name() {
        let err = index_of("no-such-dev0").expect_err("interface should not exist");
        assert_eq!(err.to_string(), "Cannot find device \"no-such-dev0\"");
    }

    #[test]
    fn interior_nul_is_an_unknown_device() {
        assert!(matches!(
            index_of("e\0th0"),
            Err(ChannelError::UnknownDevice { .. })
        ));
    }
}
