// lingo-live/src/instance.rs

// ============================================================================
// MÓDULO INSTANCE - Instância única (lock file com PID)
// ============================================================================
//
// O arquivo `<temp>/lingo_live.lock` guarda o PID de quem está rodando.
// Se o dono ainda estiver vivo, ele é encerrado e a aquisição é repetida
// depois de 500ms. Arquivo de um processo morto é simplesmente reescrito.
//
// ============================================================================

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::platform::process;

pub const LOCK_FILE_NAME: &str = "lingo_live.lock";

/// Espera depois de encerrar a instância antiga
const KILL_GRACE: Duration = Duration::from_millis(500);

/// Caminho padrão do lock file
pub fn default_lock_path() -> PathBuf {
    std::env::temp_dir().join(LOCK_FILE_NAME)
}

/// Mantém o lock enquanto existir. O drop apaga o arquivo.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
    pid: u32,
}

impl InstanceLock {
    /// Adquire o lock, encerrando uma instância antiga se necessário
    pub fn acquire(path: &Path) -> Result<Self> {
        Self::acquire_with(path, std::process::id(), process::is_alive, process::kill)
    }

    fn acquire_with(
        path: &Path,
        pid: u32,
        is_alive: impl Fn(u32) -> bool,
        kill: impl Fn(u32) -> bool,
    ) -> Result<Self> {
        if let Some(old_pid) = read_pid(path) {
            if old_pid != pid && is_alive(old_pid) {
                warn!("⚠️  Outra instância rodando (PID {}), encerrando...", old_pid);
                if !kill(old_pid) {
                    warn!("⚠️  Não foi possível encerrar o PID {}", old_pid);
                }
                thread::sleep(KILL_GRACE);
            } else {
                debug!("🔒 Lock antigo (PID {}) sem dono, reescrevendo", old_pid);
            }
        }

        fs::write(path, pid.to_string())
            .with_context(|| format!("Falha ao escrever lock {:?}", path))?;

        info!("🔒 Instância única garantida (PID {})", pid);

        Ok(InstanceLock {
            path: path.to_path_buf(),
            pid,
        })
    }

    /// Libera o lock. Só apaga o arquivo se ele ainda for nosso.
    pub fn release(&self) {
        if read_pid(&self.path) != Some(self.pid) {
            return;
        }

        match fs::remove_file(&self.path) {
            Ok(()) => debug!("🔓 Lock liberado"),
            Err(e) => warn!("⚠️  Falha ao apagar lock {:?}: {}", self.path, e),
        }
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        self.release();
    }
}

fn read_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}
