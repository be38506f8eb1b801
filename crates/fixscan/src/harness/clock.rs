//! Process CPU time.
//!
//! Timing uses CPU time consumed by this process rather than wall time, so
//! unrelated activity on the machine does not leak into the measurement.

use std::{io, time::Duration};

/// CPU time consumed by the whole process so far.
///
/// # Errors
///
/// Returns the OS error if the clock cannot be read.
#[cfg(unix)]
pub fn process_cpu_time() -> io::Result<Duration> {
    use core::mem::MaybeUninit;

    let mut ts = MaybeUninit::<libc::timespec>::uninit();
    // SAFETY: `ts` is valid for writes of one `timespec`.
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_PROCESS_CPUTIME_ID, ts.as_mut_ptr()) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: `clock_gettime` succeeded and initialized `ts`.
    let ts = unsafe { ts.assume_init() };

    let secs = u64::try_from(ts.tv_sec).map_err(|_| io::Error::from(io::ErrorKind::InvalidData))?;
    let nanos =
        u32::try_from(ts.tv_nsec).map_err(|_| io::Error::from(io::ErrorKind::InvalidData))?;
    Ok(Duration::new(secs, nanos))
}

/// Monotonic time since the first call.
///
/// Targets without a per-process CPU clock fall back to wall time, which
/// also counts time the process spent descheduled.
///
/// # Errors
///
/// Never fails; the signature matches the unix variant.
#[cfg(not(unix))]
pub fn process_cpu_time() -> io::Result<Duration> {
    use std::{sync::OnceLock, time::Instant};

    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    Ok(ORIGIN.get_or_init(Instant::now).elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let start = process_cpu_time().unwrap();
        let mut spin = 0u64;
        for i in 0..100_000u64 {
            spin = std::hint::black_box(spin.wrapping_add(i));
        }
        let end = process_cpu_time().unwrap();
        assert!(end >= start, "{end:?} < {start:?}");
    }
}
