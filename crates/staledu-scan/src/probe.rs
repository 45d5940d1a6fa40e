//! Open file descriptor budget.

use staledu_core::ScanError;

/// Source of the descriptor budget handed to the walker.
pub trait ResourceBudgetProbe {
    /// Number of file descriptors the walk may hold open at once.
    fn probe(&self) -> Result<u64, ScanError>;
}

/// Counts the descriptors that are currently free below the process limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorProbe;

impl ResourceBudgetProbe for DescriptorProbe {
    fn probe(&self) -> Result<u64, ScanError> {
        probe_fd_budget()
    }
}

/// A fixed budget, for callers that already know their limits.
#[derive(Debug, Clone, Copy)]
pub struct FixedBudget(pub u64);

impl ResourceBudgetProbe for FixedBudget {
    fn probe(&self) -> Result<u64, ScanError> {
        match self.0 {
            0 => Err(ScanError::NoFreeDescriptors { ceiling: 0 }),
            n => Ok(n),
        }
    }
}

/// Query `RLIMIT_NOFILE`, then poll every descriptor number below it and
/// count the ones reported invalid, i.e. not open.
#[cfg(unix)]
pub fn probe_fd_budget() -> Result<u64, ScanError> {
    let ceiling = descriptor_ceiling()?;
    let count = usize::try_from(ceiling)
        .ok()
        .filter(|&n| n <= libc::c_int::MAX as usize)
        .ok_or(ScanError::ProbeAllocation { ceiling })?;

    let mut fds: Vec<libc::pollfd> = Vec::new();
    fds.try_reserve_exact(count)
        .map_err(|_| ScanError::ProbeAllocation { ceiling })?;
    fds.extend((0..count).map(|fd| libc::pollfd {
        fd: fd as libc::c_int,
        events: 0,
        revents: 0,
    }));

    // SAFETY: `fds` holds `count` initialised pollfd records and a zero
    // timeout never blocks.
    let rc = unsafe { libc::poll(fds.as_mut_ptr(), count as libc::nfds_t, 0) };
    if rc < 0 {
        return Err(ScanError::Probe {
            source: std::io::Error::last_os_error(),
        });
    }

    let free = fds.iter().filter(|p| p.revents == libc::POLLNVAL).count() as u64;
    tracing::debug!(ceiling, free, "probed file descriptor budget");

    if free == 0 {
        return Err(ScanError::NoFreeDescriptors { ceiling });
    }
    Ok(free)
}

#[cfg(unix)]
fn descriptor_ceiling() -> Result<u64, ScanError> {
    let mut limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: `limit` is a valid, writable rlimit.
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut limit) } != 0 {
        return Err(ScanError::DescriptorLimit {
            source: std::io::Error::last_os_error(),
        });
    }
    Ok(limit.rlim_cur as u64)
}

/// Budget used where descriptors cannot be probed.
#[cfg(not(unix))]
pub const FALLBACK_FD_BUDGET: u64 = 512;

#[cfg(not(unix))]
pub fn probe_fd_budget() -> Result<u64, ScanError> {
    Ok(FALLBACK_FD_BUDGET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use staledu_core::ErrorClass;

    #[test]
    fn test_probe_reports_free_descriptors() {
        let budget = probe_fd_budget().unwrap();
        assert!(budget > 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_budget_below_ceiling() {
        let ceiling = descriptor_ceiling().unwrap();
        let budget = DescriptorProbe.probe().unwrap();
        // stdin/stdout/stderr are open in the test process.
        assert!(budget < ceiling);
    }

    #[test]
    fn test_fixed_budget() {
        assert_eq!(FixedBudget(8).probe().unwrap(), 8);
        let err = FixedBudget(0).probe().unwrap_err();
        assert_eq!(err.class(), ErrorClass::ResourceLimit);
    }
}
