// lingo-live/src/platform/process.rs

// ============================================================================
// PROCESSOS - Verificar se um PID está vivo e encerrá-lo
// ============================================================================

/// O processo com esse PID ainda existe?
#[cfg(unix)]
pub fn is_alive(pid: u32) -> bool {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return false;
    };
    if pid <= 0 {
        return false;
    }

    // Sinal 0 só verifica existência/permissão
    let result = unsafe { libc::kill(pid, 0) };
    if result == 0 {
        return true;
    }

    // EPERM: existe, mas é de outro usuário
    std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

/// Encerra o processo à força. `true` se o sinal foi entregue.
#[cfg(unix)]
pub fn kill(pid: u32) -> bool {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return false;
    };
    if pid <= 0 {
        return false;
    }

    unsafe { libc::kill(pid, libc::SIGKILL) == 0 }
}

#[cfg(windows)]
pub fn is_alive(pid: u32) -> bool {
    use winapi::shared::minwindef::{DWORD, FALSE};
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::minwinbase::STILL_ACTIVE;
    use winapi::um::processthreadsapi::{GetExitCodeProcess, OpenProcess};
    use winapi::um::winnt::PROCESS_QUERY_LIMITED_INFORMATION;

    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, FALSE, pid);
        if handle.is_null() {
            return false;
        }

        let mut exit_code: DWORD = 0;
        let ok = GetExitCodeProcess(handle, &mut exit_code);
        CloseHandle(handle);

        ok != 0 && exit_code == STILL_ACTIVE
    }
}

#[cfg(windows)]
pub fn kill(pid: u32) -> bool {
    use winapi::shared::minwindef::FALSE;
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{OpenProcess, TerminateProcess};
    use winapi::um::winnt::PROCESS_TERMINATE;

    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, FALSE, pid);
        if handle.is_null() {
            return false;
        }

        let ok = TerminateProcess(handle, 1);
        CloseHandle(handle);
        ok != 0
    }
}
